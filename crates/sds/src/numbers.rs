//! Integer to decimal text without going through `core::fmt`.

use crate::{Sds, error::Result};

/// Scratch size that fits any 64-bit integer: 20 characters (the sign plus
/// 19 digits of `i64::MIN`, or the 20 digits of `u64::MAX`) and a NUL.
pub const LLSTR_SIZE: usize = 21;

/// Writes the decimal form of `value` into `buf`, NUL-terminated, and
/// returns the length excluding the terminator.
///
/// ```rust
/// let mut buf = [0u8; sds::LLSTR_SIZE];
/// let n = sds::ll2str(&mut buf, -42);
/// assert_eq!(&buf[..=n], b"-42\0");
/// ```
pub fn ll2str(buf: &mut [u8; LLSTR_SIZE], value: i64) -> usize {
    let mut len = write_digits_reversed(buf, value.unsigned_abs());
    if value < 0 {
        buf[len] = b'-';
        len += 1;
    }
    buf[len] = 0;
    buf[..len].reverse();
    len
}

/// Unsigned counterpart of [`ll2str`].
pub fn ull2str(buf: &mut [u8; LLSTR_SIZE], value: u64) -> usize {
    let len = write_digits_reversed(buf, value);
    buf[len] = 0;
    buf[..len].reverse();
    len
}

impl Sds {
    /// Creates a string holding the decimal form of `value`.
    ///
    /// ```rust
    /// assert_eq!(sds::Sds::from_longlong(i64::MIN)?, "-9223372036854775808");
    /// # Ok::<(), sds::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// An allocation error.
    pub fn from_longlong(value: i64) -> Result<Self> {
        let mut buf = [0u8; LLSTR_SIZE];
        let len = ll2str(&mut buf, value);
        Self::new_len(&buf[..len])
    }

    /// Unsigned counterpart of [`Sds::from_longlong`].
    ///
    /// # Errors
    ///
    /// An allocation error.
    pub fn from_ulonglong(value: u64) -> Result<Self> {
        let mut buf = [0u8; LLSTR_SIZE];
        let len = ull2str(&mut buf, value);
        Self::new_len(&buf[..len])
    }
}

// Least significant digit first; always emits at least one digit.
fn write_digits_reversed(buf: &mut [u8; LLSTR_SIZE], mut v: u64) -> usize {
    let mut len = 0;
    loop {
        #[expect(clippy::cast_possible_truncation)]
        let digit = (v % 10) as u8;
        buf[len] = b'0' + digit;
        len += 1;
        v /= 10;
        if v == 0 {
            break len;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use rstest::rstest;

    use super::*;

    fn render_signed(value: i64) -> (alloc::vec::Vec<u8>, usize) {
        let mut buf = [0xffu8; LLSTR_SIZE];
        let n = ll2str(&mut buf, value);
        (buf[..=n].to_vec(), n)
    }

    #[rstest]
    #[case(0, "0")]
    #[case(7, "7")]
    #[case(-7, "-7")]
    #[case(10, "10")]
    #[case(-100, "-100")]
    #[case(i64::MAX, "9223372036854775807")]
    #[case(i64::MIN, "-9223372036854775808")]
    fn signed_cases(#[case] value: i64, #[case] expected: &str) {
        let (bytes, n) = render_signed(value);
        assert_eq!(n, expected.len());
        assert_eq!(&bytes[..n], expected.as_bytes());
        assert_eq!(bytes[n], 0, "terminator follows the digits");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(1, "1")]
    #[case(4_294_967_295, "4294967295")]
    #[case(u64::MAX, "18446744073709551615")]
    fn unsigned_cases(#[case] value: u64, #[case] expected: &str) {
        let mut buf = [0xffu8; LLSTR_SIZE];
        let n = ull2str(&mut buf, value);
        assert_eq!(&buf[..n], expected.as_bytes());
        assert_eq!(buf[n], 0);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(-1, "-1")]
    #[case(i64::MIN, "-9223372036854775808")]
    fn from_longlong_has_no_spare_room(#[case] value: i64, #[case] expected: &str) {
        let s = Sds::from_longlong(value).unwrap();
        assert_eq!(s, expected);
        assert_eq!(s.avail(), 0);
        let magnitude = Sds::from_ulonglong(value.unsigned_abs()).unwrap();
        assert_eq!(magnitude, expected.trim_start_matches('-'));
    }

    #[test]
    fn worst_cases_fit_exactly() {
        let (_, n) = render_signed(i64::MIN);
        assert_eq!(n + 1, LLSTR_SIZE);
        let mut buf = [0u8; LLSTR_SIZE];
        assert_eq!(ull2str(&mut buf, u64::MAX) + 1, LLSTR_SIZE);
    }

    #[test]
    fn matches_core_fmt_around_powers_of_ten() {
        let mut v: i64 = 1;
        for _ in 0..18 {
            for candidate in [v - 1, v, v + 1, -v + 1, -v, -v - 1] {
                let (bytes, n) = render_signed(candidate);
                assert_eq!(&bytes[..n], candidate.to_string().as_bytes());
            }
            v *= 10;
        }
    }
}
