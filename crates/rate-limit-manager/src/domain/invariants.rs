//! # Domain Invariants
//!
//! Business rules shared by construction, restore, and the admission path.

use super::errors::{RateLimitError, Timestamp};

/// Invariant: the counting window is strictly positive.
///
/// Applies identically at construction, at every update, and when
/// restoring a persisted snapshot. A zero window would make every epoch
/// stale on arrival and the counter meaningless.
pub fn invariant_window_nonzero(window: u64) -> Result<(), RateLimitError> {
    if window == 0 {
        return Err(RateLimitError::InvalidWindow);
    }
    Ok(())
}

/// Invariant: `count <= threshold` immediately after an admission decision.
///
/// Checked by tests against every decision path. An in-flight epoch may
/// temporarily exceed a freshly lowered threshold; subsequent decisions
/// deny until the epoch rolls.
pub fn invariant_count_within_threshold(count: u64, threshold: u64) -> bool {
    count <= threshold
}

/// Whether the epoch starting at `epoch_start` is stale at `now`.
///
/// Saturating arithmetic: a caller clock that regresses below the epoch
/// start reads as elapsed time zero and never rolls the epoch backwards.
pub fn epoch_is_stale(now: Timestamp, epoch_start: Timestamp, window: u64) -> bool {
    now.saturating_sub(epoch_start) >= window
}
