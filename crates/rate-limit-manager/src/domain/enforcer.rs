//! # Rate-Limit Enforcer
//!
//! Per-organization admission automaton: fixed-window counter plus
//! admin-gated configuration updates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::RateLimits;
use super::errors::{Account, OrgId, RateLimitError, Timestamp};
use super::invariants::epoch_is_stale;
use crate::ports::outbound::PermissionAuthority;

/// Current counting epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Epoch {
    /// Start of the counting window.
    start: Timestamp,
    /// Operations admitted since `start`.
    count: u64,
}

/// Persisted form of an enforcer.
///
/// The permission authority handle is re-supplied on restore rather than
/// serialized; everything else an enforcer owns is here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcerSnapshot {
    /// Governed organization.
    pub org_id: OrgId,
    /// Maximum admitted operations per window.
    pub threshold: u64,
    /// Epoch length in seconds.
    pub window: u64,
    /// Start of the in-flight epoch.
    pub epoch_start: Timestamp,
    /// Operations admitted since `epoch_start`.
    pub count: u64,
}

/// Admission gate for one organization.
///
/// Owns the organization's `RateLimits` and its counting epoch exclusively.
/// The enforcer never reads a clock: every operation that needs time takes
/// `now` from the caller, which makes the automaton deterministic under
/// test. Callers must supply monotonically non-decreasing timestamps in
/// production.
///
/// Not internally synchronized. `service::RateLimitService` provides the
/// per-organization mutual exclusion required when calls can race.
pub struct RateLimitEnforcer {
    org_id: OrgId,
    authority: Arc<dyn PermissionAuthority>,
    limits: RateLimits,
    epoch: Epoch,
}

impl RateLimitEnforcer {
    /// Creates an enforcer for one organization.
    ///
    /// `now` is the construction time and seeds the first epoch with
    /// `count = 0`.
    ///
    /// # Errors
    /// - `InvalidWindow` when `window == 0`; no instance is produced.
    pub fn new(
        org_id: impl Into<OrgId>,
        authority: Arc<dyn PermissionAuthority>,
        threshold: u64,
        window: u64,
        now: Timestamp,
    ) -> Result<Self, RateLimitError> {
        let limits = RateLimits::new(threshold, window)?;
        Ok(Self {
            org_id: org_id.into(),
            authority,
            limits,
            epoch: Epoch {
                start: now,
                count: 0,
            },
        })
    }

    /// Decides admission for one operation at time `now`.
    ///
    /// 1. Rolls the epoch if `now - epoch_start >= window`.
    /// 2. Denies (`false`) if the epoch's count has reached the threshold.
    /// 3. Otherwise records the operation and allows (`true`).
    ///
    /// Denial is a normal decision, not an error; this method never fails.
    /// Fixed-window semantics: up to `threshold` admissions may land just
    /// before a roll and another `threshold` just after.
    pub fn check_and_record(&mut self, now: Timestamp) -> bool {
        if epoch_is_stale(now, self.epoch.start, self.limits.window()) {
            self.epoch = Epoch {
                start: now,
                count: 0,
            };
        }

        if self.epoch.count >= self.limits.threshold() {
            return false;
        }

        self.epoch.count += 1;
        true
    }

    /// Replaces the organization's limits, gated on org-admin authority.
    ///
    /// The authorization check runs before any validation of the numeric
    /// arguments, so an unauthorized caller learns nothing about their
    /// validity. The in-flight epoch is untouched: its count keeps
    /// accumulating against the new threshold, and only future rolls use
    /// the new window.
    ///
    /// # Errors
    /// - `NotAuthorized` when `caller` is not an org admin for this
    ///   organization.
    /// - `InvalidWindow` when `window == 0`.
    ///
    /// Either failure leaves the prior configuration fully intact.
    pub fn update_limits(
        &mut self,
        caller: &Account,
        threshold: u64,
        window: u64,
    ) -> Result<(), RateLimitError> {
        if !self.authority.is_org_admin(&self.org_id, caller) {
            return Err(RateLimitError::NotAuthorized {
                org_id: self.org_id.clone(),
            });
        }
        self.limits = RateLimits::new(threshold, window)?;
        Ok(())
    }

    /// Current limits. Pure read.
    pub fn limits(&self) -> RateLimits {
        self.limits
    }

    /// Governed organization. Pure read.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Operations admitted in the in-flight epoch.
    pub fn epoch_count(&self) -> u64 {
        self.epoch.count
    }

    /// Start of the in-flight epoch.
    pub fn epoch_start(&self) -> Timestamp {
        self.epoch.start
    }

    /// Captures the persistable state of this enforcer.
    pub fn snapshot(&self) -> EnforcerSnapshot {
        EnforcerSnapshot {
            org_id: self.org_id.clone(),
            threshold: self.limits.threshold(),
            window: self.limits.window(),
            epoch_start: self.epoch.start,
            count: self.epoch.count,
        }
    }

    /// Rebuilds an enforcer from a snapshot.
    ///
    /// Validation is identical to construction: a snapshot carrying a zero
    /// window is rejected with `InvalidWindow` rather than resurrecting an
    /// invalid instance.
    pub fn restore(
        snapshot: EnforcerSnapshot,
        authority: Arc<dyn PermissionAuthority>,
    ) -> Result<Self, RateLimitError> {
        let limits = RateLimits::new(snapshot.threshold, snapshot.window)?;
        Ok(Self {
            org_id: snapshot.org_id,
            authority,
            limits,
            epoch: Epoch {
                start: snapshot.epoch_start,
                count: snapshot.count,
            },
        })
    }
}

impl std::fmt::Debug for RateLimitEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitEnforcer")
            .field("org_id", &self.org_id)
            .field("limits", &self.limits)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
