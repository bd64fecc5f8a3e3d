//! Scan configuration.
//!
//! The concurrency limit is always passed explicitly into the scheduler;
//! there is no process-wide default that can be mutated at runtime.

/// Gate width used when the caller does not request a specific limit.
pub const DEFAULT_CONCURRENCY: u8 = 4;

/// Requested number of subtree scans allowed to walk the filesystem at once.
///
/// Stored as requested (0–255). `0` and `1` both mean serial execution;
/// see [`Concurrency::effective`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Concurrency(u8);

/// How an out-of-range request was corrected by [`Concurrency::from_requested`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clamped {
    /// The request was already in range.
    No,
    /// A negative request was raised to 0.
    Negative,
    /// A request above 255 was lowered to 255.
    TooLarge,
}

impl Concurrency {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = u8::MAX;

    pub fn new(limit: u8) -> Self {
        Self(limit)
    }

    /// Coerce an arbitrary integer into the valid range.
    ///
    /// Out-of-range inputs are corrected, never rejected; the second value
    /// tells the caller whether a correction happened so it can warn.
    pub fn from_requested(requested: i64) -> (Self, Clamped) {
        if requested < i64::from(Self::MIN) {
            (Self(Self::MIN), Clamped::Negative)
        } else if requested > i64::from(Self::MAX) {
            (Self(Self::MAX), Clamped::TooLarge)
        } else {
            // In range: 0..=255.
            (Self(requested as u8), Clamped::No)
        }
    }

    /// The limit as requested, before the zero-means-one rule.
    pub fn requested(self) -> u8 {
        self.0
    }

    /// Number of admission slots actually granted: `max(1, requested)`.
    pub fn effective(self) -> usize {
        usize::from(self.0.max(1))
    }
}

impl Default for Concurrency {
    fn default() -> Self {
        Self(DEFAULT_CONCURRENCY)
    }
}

/// Everything the scheduler needs to know about a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanConfig {
    pub concurrency: Concurrency,
}

impl ScanConfig {
    pub fn with_concurrency(concurrency: Concurrency) -> Self {
        Self { concurrency }
    }
}
