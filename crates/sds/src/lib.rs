//! A growable, binary-safe byte string that is always NUL-terminated.
//!
//! [`Sds`] keeps its length and free space next to a single owned buffer, so
//! both are O(1) reads, appends are amortized O(1), zero bytes inside the
//! payload are ordinary data, and [`Sds::as_c_str`] / [`Sds::as_ptr`] can be
//! handed to C text APIs without copying.
//!
//! ```rust
//! use sds::{Sds, cat_fmt};
//!
//! let mut s = Sds::empty()?;
//! s.cat("Hello")?;
//! cat_fmt!(s, " %s #%U", "World", 1u64)?;
//! assert_eq!(s, "Hello World #1");
//! assert_eq!(s.as_c_str(), c"Hello World #1");
//! # Ok::<(), sds::Error>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod fmt;
mod numbers;
mod ops;
mod options;
mod sds;
#[cfg(feature = "serde")]
mod serde_impl;
mod split;

#[cfg(test)]
mod tests;

pub use error::{Error, FormatError, Result};
pub use fmt::FmtArg;
pub use numbers::{LLSTR_SIZE, ll2str, ull2str};
pub use options::{GrowthOptions, MAX_PREALLOC};
pub use sds::{HEADER_SIZE, Sds};
pub use split::{join, join_sds, split_args, split_len};

/// Appends to a string using the `%s %S %i %I %u %U %%` directive set.
///
/// Arguments are converted with [`FmtArg::from`]; the expansion is a call to
/// [`Sds::cat_fmt`] and evaluates to its `Result`.
///
/// ```rust
/// let mut s = sds::Sds::empty()?;
/// sds::cat_fmt!(s, "%i%%", 50)?;
/// assert_eq!(s, "50%");
/// # Ok::<(), sds::Error>(())
/// ```
#[macro_export]
macro_rules! cat_fmt {
    ($s:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $s.cat_fmt($template, &[$($crate::FmtArg::from($arg)),*])
    };
}

/// Appends `format_args!` output to a string; evaluates to the `Result` of
/// [`Sds::cat_printf`].
#[macro_export]
macro_rules! cat_printf {
    ($s:expr, $($arg:tt)*) => {
        $s.cat_printf(::core::format_args!($($arg)*))
    };
}
