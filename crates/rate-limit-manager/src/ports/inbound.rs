//! Inbound (Driving) port for the rate-limit subsystem.
//!
//! The operation set callers use to consult and govern one organization's
//! gate, independent of transport.

use crate::domain::{Account, OrgId, RateLimitError, RateLimits, Timestamp};

/// Admission and governance API for one organization's rate limit.
///
/// Implementations must apply each call atomically with respect to other
/// calls on the same organization: two racing admission checks must not
/// both observe a stale epoch and double-roll it, and no caller may see a
/// half-applied configuration.
pub trait RateLimitApi: Send + Sync {
    /// Decides admission for one operation at time `now`.
    ///
    /// Returns `true` to allow, `false` to deny. Denial is a normal
    /// decision (the organization is over quota), never an error.
    fn check_and_record(&self, now: Timestamp) -> bool;

    /// Replaces the organization's limits.
    ///
    /// # Errors
    /// - `NotAuthorized` when `caller` is not an org admin (checked before
    ///   argument validation).
    /// - `InvalidWindow` when `window == 0`.
    fn update_limits(
        &self,
        caller: &Account,
        threshold: u64,
        window: u64,
    ) -> Result<(), RateLimitError>;

    /// Current limits. Idempotent, never fails.
    fn limits(&self) -> RateLimits;

    /// Governed organization. Idempotent, never fails.
    fn org_id(&self) -> OrgId;
}
