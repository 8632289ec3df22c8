//! # Domain Module
//!
//! Core domain types for organization rate limiting.

pub mod config;
pub mod enforcer;
pub mod errors;
pub mod invariants;

pub use config::RateLimits;
pub use enforcer::{EnforcerSnapshot, RateLimitEnforcer};
pub use errors::{Account, OrgId, RateLimitError, Timestamp};
pub use invariants::{epoch_is_stale, invariant_count_within_threshold, invariant_window_nonzero};
