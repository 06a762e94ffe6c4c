//! Configuration applied while decoding records.
//!
//! Decoding untrusted input should bound how much a single string field may allocate. The
//! default [Config] places no bound and ignores trailing bytes.

use core::ops::{Bound, RangeBounds};

/// An accepted range of lengths.
///
/// # Examples
///
/// ```
/// use commonware_record::RangeCfg;
///
/// let cfg = RangeCfg::from(0..=1024);
/// assert!(cfg.contains(500));
/// assert!(!cfg.contains(2000));
///
/// let cfg = RangeCfg::from(1..);
/// assert!(!cfg.contains(0));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    start: Bound<usize>,
    end: Bound<usize>,
}

impl RangeCfg {
    /// Creates a `RangeCfg` from any range of `usize`.
    pub fn new(r: impl RangeBounds<usize>) -> Self {
        Self {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `value`.
    pub fn exact(value: usize) -> Self {
        Self::new(value..=value)
    }

    /// Returns true if `value` is within the range.
    pub fn contains(&self, value: usize) -> bool {
        (self.start, self.end).contains(&value)
    }
}

impl Default for RangeCfg {
    fn default() -> Self {
        Self::new(..)
    }
}

macro_rules! impl_from_range {
    ($($range:ty),*) => {
        $(
            impl From<$range> for RangeCfg {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )*
    };
}

impl_from_range!(
    core::ops::Range<usize>,
    core::ops::RangeInclusive<usize>,
    core::ops::RangeFrom<usize>,
    core::ops::RangeTo<usize>,
    core::ops::RangeToInclusive<usize>,
    core::ops::RangeFull
);

/// Configuration for a [crate::Mapper].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Accepted byte lengths for string fields.
    ///
    /// Checked against the decoded length prefix before any text is copied.
    pub string_length: RangeCfg,

    /// Whether decoding fails when bytes remain after the last field.
    pub reject_trailing: bool,
}

impl Config {
    /// Bounds the byte length of every decoded string field.
    pub fn with_string_length(mut self, range: impl Into<RangeCfg>) -> Self {
        self.string_length = range.into();
        self
    }

    /// Rejects input with bytes left over after the last field.
    pub fn with_reject_trailing(mut self, reject: bool) -> Self {
        self.reject_trailing = reject;
        self
    }
}
