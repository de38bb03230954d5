use alloc::vec::Vec;
use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
};

use crate::Sds;

// Size hints come from the input, so only this much is reserved up front.
const MAX_PREALLOC_HINT: usize = 4096;

impl Serialize for Sds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

struct SdsVisitor;

impl<'de> Visitor<'de> for SdsVisitor {
    type Value = Sds;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Sds, E> {
        Sds::new_len(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Sds, E> {
        self.visit_bytes(v.as_bytes())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Sds, A::Error> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC_HINT))
            .map_err(de::Error::custom)?;
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        self.visit_bytes(&bytes)
    }
}

impl<'de> Deserialize<'de> for Sds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_bytes(SdsVisitor)
    }
}
