use alloc::collections::TryReserveError;

use thiserror::Error;

/// Result alias used by every fallible [`Sds`](crate::Sds) operation.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned by string operations.
///
/// Only allocation-related variants can come out of the core growth path;
/// the others belong to the formatter and the split helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The allocator refused to provide the requested memory.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    /// The requested size does not fit in `usize`.
    #[error("requested capacity overflows usize")]
    CapacityOverflow,
    /// A formatting call could not be completed.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    /// `split_len` was given an empty separator.
    #[error("separator must not be empty")]
    EmptySeparator,
    /// `split_args` found an unterminated quote, or a closing quote glued to
    /// the next token.
    #[error("unbalanced quotes in argument line")]
    UnbalancedQuotes,
}

/// Formatter failures. The buffer is rolled back before any of these is
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The template names more directives than there are arguments.
    #[error("missing argument {position} for directive '%{directive}'")]
    MissingArgument {
        /// Directive character following `%`.
        directive: char,
        /// Zero-based argument index.
        position: usize,
    },
    /// The argument kind cannot be rendered by the directive.
    #[error("argument {position} is {found}, which does not match directive '%{directive}'")]
    ArgumentMismatch {
        /// Directive character following `%`.
        directive: char,
        /// Zero-based argument index.
        position: usize,
        /// Kind of the argument that was supplied.
        found: &'static str,
    },
    /// A `Display`/`Debug` implementation returned [`core::fmt::Error`].
    #[error("a formatting trait implementation returned an error")]
    Trait,
}
