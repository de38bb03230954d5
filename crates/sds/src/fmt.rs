//! Appending formatted text.
//!
//! Two formatters share one rule: output goes straight into the string's
//! free region, and a call that fails leaves the string at the length it had
//! before the call.
//!
//! - [`Sds::cat_printf`] drives `core::fmt` with the string as the sink, so
//!   any `Display`/`Debug` value, width or precision is available. Because
//!   the sink grows on demand there is no scratch buffer to probe and retry.
//! - [`Sds::cat_fmt`] understands a small fixed directive set and renders
//!   integers with [`ll2str`]/[`ull2str`], which skips the `core::fmt`
//!   machinery entirely.
//!
//! | directive | argument |
//! |-----------|----------|
//! | `%s` | text, copied up to its first zero byte |
//! | `%S` | string, copied by its full length |
//! | `%i` | `i32` |
//! | `%I` | `i64` (or `i32`) |
//! | `%u` | `u32` |
//! | `%U` | `u64` (or `u32`) |
//! | `%%` | a literal `%` |
//!
//! Any other byte after `%` is copied verbatim, and so is a `%` that ends
//! the template.

use core::{ffi::CStr, fmt};

use bstr::ByteSlice;

use crate::{
    Sds,
    error::{Error, FormatError, Result},
    numbers::{LLSTR_SIZE, ll2str, ull2str},
};

/// One argument for [`Sds::cat_fmt`].
///
/// Usually built with `From`, which is what the [`cat_fmt!`](crate::cat_fmt)
/// macro does.
#[derive(Debug, Clone, Copy)]
pub enum FmtArg<'a> {
    /// Text for `%s` / `%S`.
    Text(&'a [u8]),
    /// A string for `%S` / `%s`.
    Sds(&'a Sds),
    /// `%i`, `%I`.
    I32(i32),
    /// `%I`.
    I64(i64),
    /// `%u`, `%U`.
    U32(u32),
    /// `%U`.
    U64(u64),
}

impl FmtArg<'_> {
    fn kind(&self) -> &'static str {
        match self {
            FmtArg::Text(_) => "text",
            FmtArg::Sds(_) => "sds",
            FmtArg::I32(_) => "i32",
            FmtArg::I64(_) => "i64",
            FmtArg::U32(_) => "u32",
            FmtArg::U64(_) => "u64",
        }
    }
}

impl<'a> From<&'a str> for FmtArg<'a> {
    fn from(value: &'a str) -> Self {
        FmtArg::Text(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for FmtArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        FmtArg::Text(value)
    }
}

impl<'a> From<&'a CStr> for FmtArg<'a> {
    fn from(value: &'a CStr) -> Self {
        FmtArg::Text(value.to_bytes())
    }
}

impl<'a> From<&'a Sds> for FmtArg<'a> {
    fn from(value: &'a Sds) -> Self {
        FmtArg::Sds(value)
    }
}

macro_rules! fmt_arg_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FmtArg<'_> {
                fn from(value: $ty) -> Self {
                    FmtArg::$variant(value)
                }
            }
        )*
    };
}

fmt_arg_from_int!(i32 => I32, i64 => I64, u32 => U32, u64 => U64);

/// Position in the argument list, for error reporting.
struct Args<'s, 'a> {
    args: &'s [FmtArg<'a>],
    next: usize,
}

impl<'s, 'a> Args<'s, 'a> {
    fn take(&mut self, directive: u8) -> Result<(usize, &'s FmtArg<'a>), FormatError> {
        let position = self.next;
        let arg = self.args.get(position).ok_or(FormatError::MissingArgument {
            directive: char::from(directive),
            position,
        })?;
        self.next += 1;
        Ok((position, arg))
    }

    fn mismatch(directive: u8, position: usize, found: &FmtArg<'_>) -> FormatError {
        FormatError::ArgumentMismatch {
            directive: char::from(directive),
            position,
            found: found.kind(),
        }
    }

    fn text(&mut self, directive: u8) -> Result<&'s [u8], FormatError> {
        let (position, arg) = self.take(directive)?;
        let bytes = match arg {
            FmtArg::Text(bytes) => *bytes,
            FmtArg::Sds(s) => s.as_bytes(),
            other => return Err(Self::mismatch(directive, position, other)),
        };
        Ok(if directive == b's' {
            bytes.find_byte(0).map_or(bytes, |end| &bytes[..end])
        } else {
            bytes
        })
    }

    fn signed(&mut self, directive: u8) -> Result<i64, FormatError> {
        let (position, arg) = self.take(directive)?;
        match (directive, arg) {
            (_, FmtArg::I32(v)) => Ok(i64::from(*v)),
            (b'I', FmtArg::I64(v)) => Ok(*v),
            (_, other) => Err(Self::mismatch(directive, position, other)),
        }
    }

    fn unsigned(&mut self, directive: u8) -> Result<u64, FormatError> {
        let (position, arg) = self.take(directive)?;
        match (directive, arg) {
            (_, FmtArg::U32(v)) => Ok(u64::from(*v)),
            (b'U', FmtArg::U64(v)) => Ok(*v),
            (_, other) => Err(Self::mismatch(directive, position, other)),
        }
    }
}

impl Sds {
    /// Appends text produced by `core::fmt`. Usually called through
    /// [`cat_printf!`](crate::cat_printf).
    ///
    /// ```rust
    /// let mut s = sds::Sds::try_from("Sum is: ")?;
    /// sds::cat_printf!(s, "{}+{} = {}", 1, 2, 1 + 2)?;
    /// assert_eq!(s, "Sum is: 1+2 = 3");
    /// # Ok::<(), sds::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] / [`Error::CapacityOverflow`] if the output does not
    /// fit, [`FormatError::Trait`] if a formatted value reports an error.
    pub fn cat_printf(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        if let Some(literal) = args.as_str() {
            return self.cat_len(literal.as_bytes());
        }

        struct Sink<'s> {
            sds: &'s mut Sds,
            error: Option<Error>,
        }

        impl fmt::Write for Sink<'_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.sds.cat_len(s.as_bytes()).map_err(|err| {
                    self.error = Some(err);
                    fmt::Error
                })
            }
        }

        let start = self.len();
        let mut sink = Sink {
            sds: self,
            error: None,
        };
        if fmt::write(&mut sink, args).is_ok() {
            return Ok(());
        }
        let error = sink.error.unwrap_or(Error::Format(FormatError::Trait));
        self.rollback(start, &error);
        Err(error)
    }

    /// Appends `template` rendered with the restricted directive set of this
    /// module. Usually called through [`cat_fmt!`](crate::cat_fmt).
    ///
    /// ```rust
    /// let mut s = sds::Sds::empty()?;
    /// sds::cat_fmt!(s, "%s has %i items", "cart", 3)?;
    /// assert_eq!(s, "cart has 3 items");
    /// # Ok::<(), sds::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`FormatError::MissingArgument`] / [`FormatError::ArgumentMismatch`]
    /// when `args` does not fit the template, or an allocation error. Surplus
    /// arguments are ignored.
    pub fn cat_fmt<T: AsRef<[u8]> + ?Sized>(
        &mut self,
        template: &T,
        args: &[FmtArg<'_>],
    ) -> Result<()> {
        let start = self.len();
        let result = self.cat_fmt_inner(template.as_ref(), &mut Args { args, next: 0 });
        match result {
            Ok(()) => {
                self.set_len(self.len());
                Ok(())
            }
            Err(error) => {
                self.rollback(start, &error);
                Err(error)
            }
        }
    }

    fn cat_fmt_inner(&mut self, template: &[u8], args: &mut Args<'_, '_>) -> Result<()> {
        let mut f = 0;
        while f < template.len() {
            // Plain bytes and unknown directives each need one byte.
            if self.avail() == 0 {
                self.make_room_for(1)?;
            }

            match template[f] {
                b'%' => {
                    let Some(&next) = template.get(f + 1) else {
                        self.push_byte(b'%');
                        break;
                    };
                    f += 1;
                    match next {
                        b's' | b'S' => {
                            let text = args.text(next)?;
                            self.push_slice(text)?;
                        }
                        b'i' | b'I' => {
                            let num = args.signed(next)?;
                            let mut buf = [0u8; LLSTR_SIZE];
                            let n = ll2str(&mut buf, num);
                            self.push_slice(&buf[..n])?;
                        }
                        b'u' | b'U' => {
                            let num = args.unsigned(next)?;
                            let mut buf = [0u8; LLSTR_SIZE];
                            let n = ull2str(&mut buf, num);
                            self.push_slice(&buf[..n])?;
                        }
                        other => self.push_byte(other),
                    }
                }
                byte => self.push_byte(byte),
            }
            f += 1;
        }
        Ok(())
    }

    // Caller guarantees `avail() >= 1`. The terminator is written once the
    // whole template has been rendered.
    fn push_byte(&mut self, byte: u8) {
        let len = self.len();
        self.spare_mut()[0] = byte;
        self.advance_unterminated(len + 1);
    }

    fn push_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if self.avail() < bytes.len() {
            self.make_room_for(bytes.len())?;
        }
        let len = self.len();
        self.spare_mut()[..bytes.len()].copy_from_slice(bytes);
        self.advance_unterminated(len + bytes.len());
        Ok(())
    }

    fn rollback(&mut self, start: usize, error: &Error) {
        tracing::debug!(start, len = self.len(), %error, "sds format rolled back");
        self.set_len(start);
    }
}
