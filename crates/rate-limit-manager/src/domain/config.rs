//! # Rate-Limit Configuration
//!
//! Validated `(threshold, window)` pair for one organization.

use serde::{Deserialize, Serialize};

use super::errors::RateLimitError;
use super::invariants::invariant_window_nonzero;

/// Validated rate-limit configuration.
///
/// `threshold` is the maximum number of admitted operations per window;
/// zero is legal and means "admit nothing". `window` is the epoch length
/// in seconds and is strictly positive for every live value of this type:
/// the only constructor rejects zero, so holding a `RateLimits` is proof
/// the invariant holds.
///
/// Replacement is atomic by construction: callers build a new validated
/// value and overwrite the old one wholesale, so no observer can see a
/// half-applied pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRateLimits")]
pub struct RateLimits {
    threshold: u64,
    window: u64,
}

/// Unvalidated wire form. Deserialization funnels through `TryFrom` so a
/// persisted zero window cannot resurrect an invalid configuration.
#[derive(Deserialize)]
struct RawRateLimits {
    threshold: u64,
    window: u64,
}

impl TryFrom<RawRateLimits> for RateLimits {
    type Error = RateLimitError;

    fn try_from(raw: RawRateLimits) -> Result<Self, Self::Error> {
        Self::new(raw.threshold, raw.window)
    }
}

impl RateLimits {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// - `InvalidWindow` when `window == 0`. `threshold` is not validated.
    pub fn new(threshold: u64, window: u64) -> Result<Self, RateLimitError> {
        invariant_window_nonzero(window)?;
        Ok(Self { threshold, window })
    }

    /// Maximum admitted operations per window.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Epoch length in seconds. Always > 0.
    pub fn window(&self) -> u64 {
        self.window
    }
}
