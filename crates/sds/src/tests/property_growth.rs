use alloc::{format, string::ToString, vec, vec::Vec};

use quickcheck::{Arbitrary, Gen, QuickCheck};

use crate::{Sds, cat_fmt, cat_printf};

pub(super) fn test_count() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: the stored payload is exactly the input, zeros included.
#[test]
fn new_len_stores_bytes_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let s = Sds::new_len(&bytes).unwrap();
        s.assert_invariants();
        s.len() == bytes.len() && s.as_bytes() == bytes.as_slice()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: after reserving `k`, `avail() >= k`; reserving `k` again is free.
#[test]
fn make_room_for_is_idempotent_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(init: Vec<u8>, k: u16) -> bool {
        let k = usize::from(k);
        let mut s = Sds::new_len(&init).unwrap();
        s.make_room_for(k).unwrap();
        let first = s.avail() >= k;
        let size = s.alloc_size();
        s.make_room_for(k).unwrap();
        s.assert_invariants();
        first && s.avail() >= k && s.alloc_size() == size && s.as_bytes() == init.as_slice()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, u16) -> bool);
}

/// Property: appending buffers one by one equals creating the concatenation.
#[test]
fn append_matches_concatenation_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(a: Vec<u8>, b: Vec<u8>, c: Vec<u8>) -> bool {
        let mut s = Sds::new_len(&a).unwrap();
        s.cat_sds(&Sds::new_len(&b).unwrap()).unwrap();
        s.cat_sds(&Sds::new_len(&c).unwrap()).unwrap();
        s.assert_invariants();
        let whole = [a, b, c].concat();
        s == Sds::new_len(&whole).unwrap()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, Vec<u8>, Vec<u8>) -> bool);
}

#[derive(Debug, Clone)]
enum Op {
    Cat(Vec<u8>),
    Cpy(Vec<u8>),
    Clear,
    MakeRoom(u16),
    RemoveFreeSpace,
    GrowZero(u16),
    SpareWrite(u8),
    Trim(Vec<u8>),
    Range(i16, i16),
    TrimEnd(u8),
    UpdateLen,
    ToUpper,
    FmtInt(i64),
    Printf(u32),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 14 {
            0 => Op::Cat(Vec::arbitrary(g)),
            1 => Op::Cpy(Vec::arbitrary(g)),
            2 => Op::Clear,
            3 => Op::MakeRoom(u16::arbitrary(g)),
            4 => Op::RemoveFreeSpace,
            5 => Op::GrowZero(u16::arbitrary(g) % 512),
            6 => Op::SpareWrite(u8::arbitrary(g)),
            7 => Op::Trim(Vec::arbitrary(g)),
            8 => Op::Range(i16::arbitrary(g), i16::arbitrary(g)),
            9 => Op::TrimEnd(u8::arbitrary(g)),
            10 => Op::UpdateLen,
            11 => Op::ToUpper,
            12 => Op::FmtInt(i64::arbitrary(g)),
            _ => Op::Printf(u32::arbitrary(g)),
        }
    }
}

fn model_range(model: &[u8], start: isize, end: isize) -> Vec<u8> {
    let len = isize::try_from(model.len()).unwrap();
    if len == 0 {
        return Vec::new();
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { (len + end).max(0) } else { end }.min(len - 1);
    if start > end || start >= len {
        return Vec::new();
    }
    model[start.unsigned_abs()..=end.unsigned_abs()].to_vec()
}

fn model_trim(model: &[u8], cset: &[u8]) -> Vec<u8> {
    let mut slice = model;
    while let [first, rest @ ..] = slice {
        if !cset.contains(first) {
            break;
        }
        slice = rest;
    }
    while let [rest @ .., last] = slice {
        if !cset.contains(last) {
            break;
        }
        slice = rest;
    }
    slice.to_vec()
}

fn apply(s: &mut Sds, model: &mut Vec<u8>, op: &Op) {
    match op {
        Op::Cat(bytes) => {
            s.cat(bytes).unwrap();
            model.extend_from_slice(bytes);
        }
        Op::Cpy(bytes) => {
            s.cpy(bytes).unwrap();
            model.clone_from(bytes);
        }
        Op::Clear => {
            s.clear();
            model.clear();
        }
        Op::MakeRoom(k) => {
            s.make_room_for(usize::from(*k)).unwrap();
            assert!(s.avail() >= usize::from(*k));
        }
        Op::RemoveFreeSpace => {
            s.remove_free_space().unwrap();
            assert_eq!(s.avail(), 0);
        }
        Op::GrowZero(n) => {
            let n = usize::from(*n);
            s.grow_zero(n).unwrap();
            if n > model.len() {
                model.resize(n, 0);
            }
        }
        Op::SpareWrite(n) => {
            let n = usize::from(*n);
            s.make_room_for(n).unwrap();
            s.spare_mut()[..n].fill(0xab);
            s.incr_len(isize::try_from(n).unwrap());
            model.extend(core::iter::repeat_n(0xab, n));
        }
        Op::Trim(cset) => {
            s.trim(cset);
            *model = model_trim(model, cset);
        }
        Op::Range(start, end) => {
            s.range(isize::from(*start), isize::from(*end));
            *model = model_range(model, isize::from(*start), isize::from(*end));
        }
        Op::TrimEnd(n) => {
            let n = usize::from(*n).min(model.len());
            s.incr_len(-isize::try_from(n).unwrap());
            model.truncate(model.len() - n);
        }
        Op::UpdateLen => {
            s.update_len();
            if let Some(zero) = model.iter().position(|&b| b == 0) {
                model.truncate(zero);
            }
        }
        Op::ToUpper => {
            s.to_upper();
            model.make_ascii_uppercase();
        }
        Op::FmtInt(v) => {
            cat_fmt!(s, "[%I]", *v).unwrap();
            model.extend_from_slice(format!("[{v}]").as_bytes());
        }
        Op::Printf(v) => {
            cat_printf!(s, "<{:08x}>", v).unwrap();
            model.extend_from_slice(format!("<{v:08x}>").as_bytes());
        }
    }
}

/// Property: any operation sequence keeps the layout invariants and agrees
/// with a plain `Vec<u8>` model.
#[test]
fn operation_sequences_match_model_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(init: Vec<u8>, ops: Vec<Op>) -> bool {
        let mut s = Sds::new_len(&init).unwrap();
        let mut model = init;
        for op in &ops {
            apply(&mut s, &mut model, op);
            s.assert_invariants();
            if s.as_bytes() != model.as_slice() {
                return false;
            }
        }
        true
    }

    QuickCheck::new()
        .tests(test_count() / 4)
        .quickcheck(prop as fn(Vec<u8>, Vec<Op>) -> bool);
}

#[test]
fn clear_keeps_footprint_after_growth() {
    let mut s = Sds::empty().unwrap();
    let mut sizes = vec![];
    for i in 0..64 {
        s.cat(&i.to_string()).unwrap();
        sizes.push(s.alloc_size());
    }
    let before = s.alloc_size();
    s.clear();
    s.cat("z").unwrap();
    assert_eq!(s.alloc_size(), before);
    // Geometric growth: far fewer distinct sizes than appends.
    sizes.dedup();
    assert!(sizes.len() < 10, "{sizes:?}");
}
