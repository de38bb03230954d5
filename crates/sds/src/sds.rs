//! The dynamic string itself.
//!
//! Layout
//! - `Header { len, free }` holds the two counters a C string header keeps
//!   in front of its payload. Reading either one is a field access.
//! - `buf` owns a single allocation of exactly `len + free + 1` initialized
//!   bytes. The payload is `buf[..len]`, `buf[len]` is always `0`, and the
//!   free region behind it is zero-filled whenever it is created.
//! - The reported footprint is `HEADER_SIZE + len + free + 1`, which is what
//!   a header-prefixed allocation of the same string would occupy.
//!
//! Reallocation
//! - Every method that can grow takes `&mut self` and returns
//!   [`Result`](crate::Result). A failed reservation leaves both the bytes
//!   and the counters untouched; the caller still owns a valid string.
//! - There is no handle that survives a reallocation, so holding on to a
//!   stale pointer after growth is a borrow error rather than a runtime bug.
//!
//! Binary safety
//! - Operations trust `len`. Zero bytes inside the payload are ordinary
//!   data. The exceptions are the explicit bridges to C text:
//!   [`Sds::from_cstr`], [`Sds::cat_cstr`], [`Sds::cpy_cstr`] and
//!   [`Sds::update_len`].

use alloc::{collections::TryReserveError, vec::Vec};
use core::{
    borrow::Borrow,
    ffi::{CStr, c_char},
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
};

use bstr::ByteSlice;

use crate::{
    error::{Error, Result},
    options::GrowthOptions,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Header {
    len: usize,
    free: usize,
}

/// Bytes of bookkeeping accounted for in [`Sds::alloc_size`].
pub const HEADER_SIZE: usize = core::mem::size_of::<Header>();

/// A growable, binary-safe byte string that is always NUL-terminated.
///
/// ```rust
/// use sds::Sds;
///
/// let mut s = Sds::empty()?;
/// s.cat("Hello")?;
/// s.cat(" World")?;
/// assert_eq!(s, "Hello World");
/// assert_eq!(s.as_bytes_with_nul()[s.len()], 0);
/// # Ok::<(), sds::Error>(())
/// ```
pub struct Sds {
    hdr: Header,
    buf: Vec<u8>,
}

fn try_alloc(size: usize) -> Result<Vec<u8>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)?;
    Ok(buf)
}

impl Sds {
    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Creates a string holding a copy of `init`, with no spare capacity.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if the allocator refuses, [`Error::CapacityOverflow`]
    /// if `init.len() + 1` overflows.
    pub fn new_len(init: &[u8]) -> Result<Self> {
        let size = init.len().checked_add(1).ok_or(Error::CapacityOverflow)?;
        let mut buf = try_alloc(size)?;
        buf.extend_from_slice(init);
        buf.push(0);
        Ok(Self {
            hdr: Header {
                len: init.len(),
                free: 0,
            },
            buf,
        })
    }

    /// Creates a string of `len` zero bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Sds::new_len`].
    pub fn zeroed(len: usize) -> Result<Self> {
        let size = len.checked_add(1).ok_or(Error::CapacityOverflow)?;
        let mut buf = try_alloc(size)?;
        buf.resize(size, 0);
        Ok(Self {
            hdr: Header { len, free: 0 },
            buf,
        })
    }

    /// Creates an empty string (one byte: the terminator).
    ///
    /// # Errors
    ///
    /// Same as [`Sds::new_len`].
    pub fn empty() -> Result<Self> {
        Self::new_len(&[])
    }

    /// Creates a string from NUL-terminated text. The length is found by
    /// scanning for the terminator, so the result never contains zeros.
    ///
    /// # Errors
    ///
    /// Same as [`Sds::new_len`].
    pub fn from_cstr(text: &CStr) -> Result<Self> {
        Self::new_len(text.to_bytes())
    }

    /// Fallible copy of the payload. The copy has no spare capacity.
    ///
    /// # Errors
    ///
    /// Same as [`Sds::new_len`].
    pub fn dup(&self) -> Result<Self> {
        Self::new_len(self.as_bytes())
    }

    /// Empties the string without releasing its allocation.
    pub fn clear(&mut self) {
        self.hdr.free += self.hdr.len;
        self.hdr.len = 0;
        self.buf[0] = 0;
    }

    /// Recomputes `len` from the first zero byte of the allocation.
    ///
    /// Meant for callers that wrote C text through [`Sds::as_mut_bytes`] or
    /// [`Sds::spare_mut`]; the difference is moved to or from `avail`. Any
    /// payload bytes after an embedded zero are dropped from the string.
    ///
    /// ```rust
    /// let mut s = sds::Sds::try_from("foobar")?;
    /// s.as_mut_bytes()[2] = 0;
    /// s.update_len();
    /// assert_eq!(s, "fo");
    /// # Ok::<(), sds::Error>(())
    /// ```
    pub fn update_len(&mut self) {
        let total = self.capacity();
        // The last allocation byte is never handed out, so a zero exists.
        let len = self.buf.find_byte(0).unwrap_or(total);
        self.hdr.len = len;
        self.hdr.free = total - len;
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Number of payload bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.hdr.len
    }

    /// Returns `true` if the payload is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hdr.len == 0
    }

    /// Free bytes available after the payload, excluding the terminator.
    #[inline]
    #[must_use]
    pub fn avail(&self) -> usize {
        self.hdr.free
    }

    /// `len() + avail()`.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.hdr.len + self.hdr.free
    }

    /// Total footprint: header, payload, free space and terminator.
    #[inline]
    #[must_use]
    pub fn alloc_size(&self) -> usize {
        HEADER_SIZE + self.hdr.len + self.hdr.free + 1
    }

    /// The payload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.hdr.len]
    }

    /// Mutable view of the payload. Writing a zero here is fine; call
    /// [`Sds::update_len`] if the string should end there.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.buf[..self.hdr.len]
    }

    /// Payload followed by its terminator.
    #[inline]
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.hdr.len]
    }

    /// The payload as C text, cut at the first embedded zero if any.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        match CStr::from_bytes_until_nul(self.as_bytes_with_nul()) {
            Ok(text) => text,
            Err(_) => unreachable!("terminator is always present"),
        }
    }

    /// Pointer to the first payload byte, valid for reads of `len() + 1`
    /// bytes until the next mutation.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const c_char {
        self.buf.as_ptr().cast()
    }

    /// The `avail()` writable bytes starting at the terminator. Fill a
    /// prefix, then commit it with [`Sds::incr_len`].
    ///
    /// ```rust
    /// let mut s = sds::Sds::try_from("ab")?;
    /// s.make_room_for(3)?;
    /// s.spare_mut()[..3].copy_from_slice(b"cde");
    /// s.incr_len(3);
    /// assert_eq!(s, "abcde");
    /// # Ok::<(), sds::Error>(())
    /// ```
    #[inline]
    pub fn spare_mut(&mut self) -> &mut [u8] {
        let Header { len, free } = self.hdr;
        &mut self.buf[len..len + free]
    }

    // ---------------------------------------------------------------------
    // Growth
    // ---------------------------------------------------------------------

    /// Ensures `avail() >= addlen`, growing with the default policy.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] or [`Error::CapacityOverflow`]; the string is left
    /// unchanged.
    pub fn make_room_for(&mut self, addlen: usize) -> Result<()> {
        self.make_room_for_with(addlen, &GrowthOptions::default())
    }

    /// Ensures `avail() >= addlen` using `opts`. A no-op when the space is
    /// already there.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] or [`Error::CapacityOverflow`]; the string is left
    /// unchanged.
    pub fn make_room_for_with(&mut self, addlen: usize, opts: &GrowthOptions) -> Result<()> {
        if self.hdr.free >= addlen {
            return Ok(());
        }

        let len = self.hdr.len;
        let needed = len.checked_add(addlen).ok_or(Error::CapacityOverflow)?;
        let target = opts.target_for(needed).ok_or(Error::CapacityOverflow)?;
        let size = target.checked_add(1).ok_or(Error::CapacityOverflow)?;

        self.buf.try_reserve_exact(size - self.buf.len())?;
        self.buf.resize(size, 0);

        tracing::trace!(
            len,
            old_free = self.hdr.free,
            new_free = target - len,
            doubled = needed < opts.max_prealloc,
            "sds grow"
        );
        self.hdr.free = target - len;
        Ok(())
    }

    /// Reallocates to exactly `len() + 1` bytes, dropping all free space.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if the smaller allocation cannot be obtained; the
    /// string keeps its current allocation.
    pub fn remove_free_space(&mut self) -> Result<()> {
        if self.hdr.free == 0 && self.buf.capacity() == self.buf.len() {
            return Ok(());
        }
        let mut shrunk = try_alloc(self.hdr.len + 1)?;
        shrunk.extend_from_slice(self.as_bytes_with_nul());
        tracing::trace!(len = self.hdr.len, released = self.hdr.free, "sds shrink");
        self.buf = shrunk;
        self.hdr.free = 0;
        Ok(())
    }

    /// Grows the string to `len` bytes, zero-filling the new tail. Never
    /// truncates.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] or [`Error::CapacityOverflow`]; the string is left
    /// unchanged.
    pub fn grow_zero(&mut self, len: usize) -> Result<()> {
        let cur = self.hdr.len;
        if len <= cur {
            return Ok(());
        }
        self.make_room_for(len - cur)?;
        // The free region may hold stale bytes from earlier content.
        self.buf[cur..=len].fill(0);
        self.hdr.free -= len - cur;
        self.hdr.len = len;
        Ok(())
    }

    /// Commits `incr` bytes written through [`Sds::spare_mut`], or trims
    /// `-incr` bytes from the end when negative, and rewrites the terminator.
    ///
    /// # Panics
    ///
    /// If `incr > avail()` or `-incr > len()`.
    pub fn incr_len(&mut self, incr: isize) {
        let Header { len, free } = self.hdr;
        let new_len = match len.checked_add_signed(incr) {
            Some(new_len) if new_len <= len + free => new_len,
            _ => panic!("incr_len({incr}) out of range for len {len}, avail {free}"),
        };
        self.set_len(new_len);
    }

    /// Moves the end of the string within its current capacity.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        let total = self.capacity();
        self.hdr.len = len;
        self.hdr.free = total - len;
        self.buf[len] = 0;
    }

    /// Like [`Sds::set_len`] but leaves the terminator to the caller, which
    /// must call `set_len` before handing the string back.
    pub(crate) fn advance_unterminated(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        let total = self.capacity();
        self.hdr.len = len;
        self.hdr.free = total - len;
    }

    // ---------------------------------------------------------------------
    // Append / copy
    // ---------------------------------------------------------------------

    /// Appends `t`, which may contain zero bytes.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] or [`Error::CapacityOverflow`]; the string is left
    /// unchanged.
    pub fn cat_len(&mut self, t: &[u8]) -> Result<()> {
        self.make_room_for(t.len())?;
        let cur = self.hdr.len;
        self.buf[cur..cur + t.len()].copy_from_slice(t);
        self.hdr.len += t.len();
        self.hdr.free -= t.len();
        self.buf[self.hdr.len] = 0;
        Ok(())
    }

    /// Appends anything byte-like (`&str`, `&[u8]`, byte arrays, `Sds`).
    ///
    /// # Errors
    ///
    /// See [`Sds::cat_len`].
    pub fn cat<T: AsRef<[u8]> + ?Sized>(&mut self, t: &T) -> Result<()> {
        self.cat_len(t.as_ref())
    }

    /// Appends NUL-terminated text.
    ///
    /// # Errors
    ///
    /// See [`Sds::cat_len`].
    pub fn cat_cstr(&mut self, t: &CStr) -> Result<()> {
        self.cat_len(t.to_bytes())
    }

    /// Appends another string, including any zero bytes it holds.
    ///
    /// # Errors
    ///
    /// See [`Sds::cat_len`].
    pub fn cat_sds(&mut self, t: &Sds) -> Result<()> {
        self.cat_len(t.as_bytes())
    }

    /// Replaces the content with `t`, reusing the allocation when it is
    /// large enough.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] or [`Error::CapacityOverflow`]; the string is left
    /// unchanged.
    pub fn cpy_len(&mut self, t: &[u8]) -> Result<()> {
        if self.capacity() < t.len() {
            self.make_room_for(t.len() - self.hdr.len)?;
        }
        self.buf[..t.len()].copy_from_slice(t);
        self.set_len(t.len());
        Ok(())
    }

    /// Byte-like counterpart of [`Sds::cpy_len`].
    ///
    /// # Errors
    ///
    /// See [`Sds::cpy_len`].
    pub fn cpy<T: AsRef<[u8]> + ?Sized>(&mut self, t: &T) -> Result<()> {
        self.cpy_len(t.as_ref())
    }

    /// Replaces the content with NUL-terminated text.
    ///
    /// # Errors
    ///
    /// See [`Sds::cpy_len`].
    pub fn cpy_cstr(&mut self, t: &CStr) -> Result<()> {
        self.cpy_len(t.to_bytes())
    }

    /// Checks every layout invariant, panicking on the first violation.
    #[cfg(any(test, feature = "fuzzing"))]
    pub fn assert_invariants(&self) {
        let Header { len, free } = self.hdr;
        assert_eq!(self.buf.len(), len + free + 1, "allocation size");
        assert_eq!(self.buf[len], 0, "terminator at len");
        assert_eq!(self.buf[len + free], 0, "last byte stays zero");
        assert_eq!(self.alloc_size(), HEADER_SIZE + self.buf.len());
    }
}

// -------------------------------------------------------------------------
// Trait impls
// -------------------------------------------------------------------------

impl Default for Sds {
    fn default() -> Self {
        Self {
            hdr: Header::default(),
            buf: alloc::vec![0],
        }
    }
}

impl Clone for Sds {
    fn clone(&self) -> Self {
        Self {
            hdr: Header {
                len: self.hdr.len,
                free: 0,
            },
            buf: self.as_bytes_with_nul().to_vec(),
        }
    }
}

impl Deref for Sds {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Sds {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Borrow<[u8]> for Sds {
    #[inline]
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for Sds {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Self::new_len(value)
    }
}

impl TryFrom<&str> for Sds {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new_len(value.as_bytes())
    }
}

impl TryFrom<&CStr> for Sds {
    type Error = Error;

    fn try_from(value: &CStr) -> Result<Self> {
        Self::from_cstr(value)
    }
}

impl PartialEq for Sds {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Sds {}

impl PartialOrd for Sds {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Byte-wise comparison; when one string is a prefix of the other, the
/// shorter one sorts first.
impl Ord for Sds {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for Sds {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

macro_rules! impl_partial_eq {
    ($($rhs:ty),* $(,)?) => {
        $(
            impl PartialEq<$rhs> for Sds {
                fn eq(&self, other: &$rhs) -> bool {
                    self.as_bytes() == AsRef::<[u8]>::as_ref(other)
                }
            }

            impl PartialEq<Sds> for $rhs {
                fn eq(&self, other: &Sds) -> bool {
                    AsRef::<[u8]>::as_ref(self) == other.as_bytes()
                }
            }
        )*
    };
}

impl_partial_eq!([u8], &[u8], str, &str);

impl fmt::Debug for Sds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_bytes().as_bstr(), f)
    }
}

impl fmt::Display for Sds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bytes().as_bstr(), f)
    }
}

impl fmt::Write for Sds {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.cat_len(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
