//! Splitting and joining.
//!
//! `split_args` is the tokenizer behind the host's inline command protocol:
//! a line such as `set key "hello\x20world"` becomes `["set", "key",
//! "hello world"]`. Its quoting rules are the inverse of
//! [`Sds::cat_repr`].

use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::{
    Sds,
    error::{Error, Result},
};

/// Splits `s` on every occurrence of `sep`.
///
/// Adjacent separators produce empty tokens and an empty input produces no
/// tokens at all. Both `s` and `sep` may contain zero bytes.
///
/// ```rust
/// let parts = sds::split_len(b"foo_-_bar", b"_-_")?;
/// assert_eq!(parts, ["foo", "bar"]);
/// # Ok::<(), sds::Error>(())
/// ```
///
/// # Errors
///
/// [`Error::EmptySeparator`] if `sep` is empty, or an allocation error.
pub fn split_len(s: &[u8], sep: &[u8]) -> Result<Vec<Sds>> {
    if sep.is_empty() {
        return Err(Error::EmptySeparator);
    }
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let mut tokens = Vec::new();
    for token in s.split_str(sep) {
        tokens.try_reserve(1)?;
        tokens.push(Sds::new_len(token)?);
    }
    Ok(tokens)
}

fn is_space(byte: u8) -> bool {
    // C `isspace` in the "C" locale.
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Double,
    Single,
}

/// Splits a command line into arguments.
///
/// - Unquoted tokens end at whitespace.
/// - `"..."` understands `\xHH`, `\n`, `\r`, `\t`, `\b`, `\a`; any other
///   `\c` stands for `c`.
/// - `'...'` understands only `\'`.
/// - A closing quote must be followed by whitespace or the end of the line.
/// - Parsing stops at the first zero byte, as it would for C text.
///
/// ```rust
/// let args = sds::split_args(br#"set key "hi\x21" 'it\'s'"#)?;
/// assert_eq!(args, ["set", "key", "hi!", "it's"]);
/// # Ok::<(), sds::Error>(())
/// ```
///
/// # Errors
///
/// [`Error::UnbalancedQuotes`] on an unterminated quote or a closing quote
/// glued to the next character, or an allocation error.
pub fn split_args(line: &[u8]) -> Result<Vec<Sds>> {
    let line = line.find_byte(0).map_or(line, |end| &line[..end]);
    let mut args = Vec::new();
    let mut p = 0;

    loop {
        while p < line.len() && is_space(line[p]) {
            p += 1;
        }
        if p == line.len() {
            return Ok(args);
        }

        let mut current = Sds::empty()?;
        let mut quote = Quote::None;
        loop {
            let Some(&c) = line.get(p) else {
                if quote == Quote::None {
                    break;
                }
                return Err(Error::UnbalancedQuotes);
            };
            let next = line.get(p + 1).copied();
            match quote {
                Quote::Double => match (c, next) {
                    (b'\\', Some(b'x')) => {
                        let hi = line.get(p + 2).copied().and_then(hex_value);
                        let lo = line.get(p + 3).copied().and_then(hex_value);
                        if let (Some(hi), Some(lo)) = (hi, lo) {
                            current.cat_len(&[hi * 16 + lo])?;
                            p += 3;
                        } else {
                            current.cat_len(b"x")?;
                            p += 1;
                        }
                    }
                    (b'\\', Some(escaped)) => {
                        let byte = match escaped {
                            b'n' => b'\n',
                            b'r' => b'\r',
                            b't' => b'\t',
                            b'b' => 0x08,
                            b'a' => 0x07,
                            other => other,
                        };
                        current.cat_len(&[byte])?;
                        p += 1;
                    }
                    (b'"', next) => {
                        if next.is_some_and(|n| !is_space(n)) {
                            return Err(Error::UnbalancedQuotes);
                        }
                        p += 1;
                        break;
                    }
                    (byte, _) => current.cat_len(&[byte])?,
                },
                Quote::Single => match (c, next) {
                    (b'\\', Some(b'\'')) => {
                        current.cat_len(b"'")?;
                        p += 1;
                    }
                    (b'\'', next) => {
                        if next.is_some_and(|n| !is_space(n)) {
                            return Err(Error::UnbalancedQuotes);
                        }
                        p += 1;
                        break;
                    }
                    (byte, _) => current.cat_len(&[byte])?,
                },
                Quote::None => match c {
                    b' ' | b'\n' | b'\r' | b'\t' => break,
                    b'"' => quote = Quote::Double,
                    b'\'' => quote = Quote::Single,
                    byte => current.cat_len(&[byte])?,
                },
            }
            p += 1;
        }

        args.try_reserve(1)?;
        args.push(current);
    }
}

/// Joins `parts` with `sep` between consecutive elements.
///
/// ```rust
/// let joined = sds::join(&["a", "b", "c"], b", ")?;
/// assert_eq!(joined, "a, b, c");
/// # Ok::<(), sds::Error>(())
/// ```
///
/// # Errors
///
/// An allocation error.
pub fn join<T: AsRef<[u8]>>(parts: &[T], sep: &[u8]) -> Result<Sds> {
    let mut joined = Sds::empty()?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            joined.cat_len(sep)?;
        }
        joined.cat_len(part.as_ref())?;
    }
    Ok(joined)
}

/// [`join`] for a slice of strings.
///
/// # Errors
///
/// An allocation error.
pub fn join_sds(parts: &[Sds], sep: &[u8]) -> Result<Sds> {
    join(parts, sep)
}
