/// Size past which [`make_room_for`](crate::Sds::make_room_for) stops
/// doubling and adds this many bytes instead (1 MiB).
pub const MAX_PREALLOC: usize = 1024 * 1024;

/// Growth policy for buffer reservations.
///
/// # Examples
///
/// ```rust
/// use sds::{GrowthOptions, Sds};
///
/// let mut s = Sds::empty().unwrap();
/// s.make_room_for_with(10, &GrowthOptions::new(16)).unwrap();
/// // 10 is below the threshold, so the target doubles to 20.
/// assert_eq!(s.avail(), 20);
/// ```
///
/// # Default
///
/// `max_prealloc` defaults to [`MAX_PREALLOC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthOptions {
    /// Doubling threshold, in bytes.
    ///
    /// When the length needed after a reservation is below this value the
    /// new capacity is twice that length; otherwise the length plus this
    /// value. Large buffers therefore get linear headroom rather than
    /// unbounded doubling.
    ///
    /// # Default
    ///
    /// `1024 * 1024`
    pub max_prealloc: usize,
}

impl GrowthOptions {
    /// Policy with the given doubling threshold.
    #[must_use]
    pub const fn new(max_prealloc: usize) -> Self {
        Self { max_prealloc }
    }

    /// Capacity (excluding the terminator) to allocate so that `needed`
    /// bytes fit, or `None` on overflow.
    pub(crate) fn target_for(&self, needed: usize) -> Option<usize> {
        if needed < self.max_prealloc {
            needed.checked_mul(2)
        } else {
            needed.checked_add(self.max_prealloc)
        }
    }
}

impl Default for GrowthOptions {
    fn default() -> Self {
        Self::new(MAX_PREALLOC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_below_threshold() {
        let opts = GrowthOptions::default();
        assert_eq!(opts.target_for(0), Some(0));
        assert_eq!(opts.target_for(11), Some(22));
        assert_eq!(opts.target_for(MAX_PREALLOC - 1), Some(2 * (MAX_PREALLOC - 1)));
    }

    #[test]
    fn linear_at_and_above_threshold() {
        let opts = GrowthOptions::default();
        assert_eq!(opts.target_for(MAX_PREALLOC), Some(2 * MAX_PREALLOC));
        assert_eq!(opts.target_for(3 * MAX_PREALLOC), Some(4 * MAX_PREALLOC));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(GrowthOptions::new(8).target_for(usize::MAX), None);
        assert_eq!(GrowthOptions::new(usize::MAX).target_for(usize::MAX / 2 + 1), None);
    }
}
