//! In-place editing helpers. None of these reallocate except `cat_repr`.

use crate::{
    Sds,
    error::{Error, Result},
};

// Bytes `cat_repr` appends for `p`, quotes included.
fn repr_len(p: &[u8]) -> Option<usize> {
    p.iter().try_fold(2usize, |acc, &byte| {
        let width = match byte {
            b'\\' | b'"' | b'\n' | b'\r' | b'\t' | 0x07 | 0x08 => 2,
            b' '..=b'~' => 1,
            _ => 4,
        };
        acc.checked_add(width)
    })
}

impl Sds {
    /// Removes every leading and trailing byte that appears in `cset`.
    ///
    /// ```rust
    /// let mut s = sds::Sds::try_from("xxciaoyyy")?;
    /// s.trim(b"xy");
    /// assert_eq!(s, "ciao");
    /// # Ok::<(), sds::Error>(())
    /// ```
    pub fn trim(&mut self, cset: &[u8]) {
        let bytes = self.as_bytes();
        let start = bytes.iter().position(|b| !cset.contains(b));
        let Some(start) = start else {
            self.set_len(0);
            return;
        };
        // A non-member exists, so `rposition` finds one at or after `start`.
        let end = bytes.iter().rposition(|b| !cset.contains(b)).unwrap_or(start) + 1;
        self.keep(start, end - start);
    }

    /// Keeps only the inclusive byte range `start..=end`.
    ///
    /// Negative indices count from the end, `-1` being the last byte.
    /// Indices are clamped to the string; a range that ends before it starts
    /// leaves the string empty.
    ///
    /// ```rust
    /// let mut s = sds::Sds::try_from("Hello World")?;
    /// s.range(1, -1);
    /// assert_eq!(s, "ello World");
    /// s.range(-5, -1);
    /// assert_eq!(s, "World");
    /// # Ok::<(), sds::Error>(())
    /// ```
    pub fn range(&mut self, start: isize, end: isize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let resolve = |idx: isize| -> usize {
            if idx < 0 {
                len.saturating_sub(idx.unsigned_abs())
            } else {
                idx.unsigned_abs()
            }
        };
        let start = resolve(start);
        let end = resolve(end).min(len - 1);
        if start >= len || start > end {
            self.set_len(0);
            return;
        }
        self.keep(start, end - start + 1);
    }

    /// Lowercases ASCII letters in place.
    pub fn to_lower(&mut self) {
        self.as_mut_bytes().make_ascii_lowercase();
    }

    /// Uppercases ASCII letters in place.
    pub fn to_upper(&mut self) {
        self.as_mut_bytes().make_ascii_uppercase();
    }

    /// Replaces each byte equal to `from[i]` with `to[i]`. The first match in
    /// `from` wins; bytes of the longer set without a partner are ignored.
    ///
    /// ```rust
    /// let mut s = sds::Sds::try_from("hello")?;
    /// s.map_chars(b"ho", b"01");
    /// assert_eq!(s, "0ell1");
    /// # Ok::<(), sds::Error>(())
    /// ```
    pub fn map_chars(&mut self, from: &[u8], to: &[u8]) {
        for byte in self.as_mut_bytes() {
            let current = *byte;
            if let Some((_, &replacement)) = from.iter().zip(to).find(|&(&f, _)| f == current) {
                *byte = replacement;
            }
        }
    }

    /// Appends `p` as a double-quoted literal with C-style escapes, so that
    /// any byte string can be printed and read back by
    /// [`split_args`](crate::split_args).
    ///
    /// ```rust
    /// let mut s = sds::Sds::empty()?;
    /// s.cat_repr(b"a\"b\n\x01")?;
    /// assert_eq!(s, r#""a\"b\n\x01""#);
    /// # Ok::<(), sds::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] or [`Error::CapacityOverflow`]; the string is left
    /// unchanged.
    pub fn cat_repr(&mut self, p: &[u8]) -> Result<()> {
        let start = self.len();
        let result = self.cat_repr_inner(p);
        if result.is_err() {
            self.set_len(start);
        }
        result
    }

    fn cat_repr_inner(&mut self, p: &[u8]) -> Result<()> {
        const HEX: &[u8; 16] = b"0123456789abcdef";

        // One reservation up front; the appends below never reallocate.
        self.make_room_for(repr_len(p).ok_or(Error::CapacityOverflow)?)?;
        self.cat_len(b"\"")?;
        for &byte in p {
            match byte {
                b'\\' | b'"' => self.cat_len(&[b'\\', byte])?,
                b'\n' => self.cat_len(b"\\n")?,
                b'\r' => self.cat_len(b"\\r")?,
                b'\t' => self.cat_len(b"\\t")?,
                0x07 => self.cat_len(b"\\a")?,
                0x08 => self.cat_len(b"\\b")?,
                b' '..=b'~' => self.cat_len(&[byte])?,
                _ => self.cat_len(&[
                    b'\\',
                    b'x',
                    HEX[usize::from(byte >> 4)],
                    HEX[usize::from(byte & 0xf)],
                ])?,
            }
        }
        self.cat_len(b"\"")
    }

    // Moves `count` bytes from `start` to the front and makes them the whole
    // string.
    fn keep(&mut self, start: usize, count: usize) {
        if start > 0 && count > 0 {
            self.as_mut_bytes().copy_within(start..start + count, 0);
        }
        self.set_len(count);
    }
}
