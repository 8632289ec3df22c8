//! Thread-safe rate-limit service and multi-organization registry.
//!
//! The domain enforcer is single-threaded by design; this layer reinstates
//! the serialized-execution guarantee of the originating environment with
//! a per-organization mutex, and hands out one independent gate per
//! organization.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{
    Account, EnforcerSnapshot, OrgId, RateLimitEnforcer, RateLimitError, RateLimits, Timestamp,
};
use crate::ports::inbound::RateLimitApi;
use crate::ports::outbound::{PermissionAuthority, TimeSource};

/// Serialized admission gate for one organization.
///
/// Every call locks the organization's enforcer for its full duration, so
/// admission checks and configuration updates are atomic per organization.
/// Distinct organizations never contend with each other.
#[derive(Debug)]
pub struct RateLimitService {
    inner: Mutex<RateLimitEnforcer>,
}

impl RateLimitService {
    /// Creates a gate for one organization, seeding the first epoch from
    /// `clock`.
    ///
    /// # Errors
    /// - `InvalidWindow` when `window == 0`; no service is produced.
    pub fn new(
        org_id: impl Into<OrgId>,
        authority: Arc<dyn PermissionAuthority>,
        threshold: u64,
        window: u64,
        clock: &dyn TimeSource,
    ) -> Result<Self, RateLimitError> {
        let enforcer = RateLimitEnforcer::new(org_id, authority, threshold, window, clock.now())?;
        info!(
            org_id = enforcer.org_id(),
            threshold, window, "rate limit gate created"
        );
        Ok(Self {
            inner: Mutex::new(enforcer),
        })
    }

    /// Rebuilds a gate from persisted state.
    ///
    /// # Errors
    /// - `InvalidWindow` when the snapshot carries a zero window.
    pub fn from_snapshot(
        snapshot: EnforcerSnapshot,
        authority: Arc<dyn PermissionAuthority>,
    ) -> Result<Self, RateLimitError> {
        let enforcer = RateLimitEnforcer::restore(snapshot, authority)?;
        Ok(Self {
            inner: Mutex::new(enforcer),
        })
    }

    /// Captures the persistable state of this gate.
    pub fn snapshot(&self) -> EnforcerSnapshot {
        self.inner.lock().snapshot()
    }
}

impl RateLimitApi for RateLimitService {
    fn check_and_record(&self, now: Timestamp) -> bool {
        let mut enforcer = self.inner.lock();
        let epoch_before = enforcer.epoch_start();
        let allowed = enforcer.check_and_record(now);
        if enforcer.epoch_start() != epoch_before {
            debug!(
                org_id = enforcer.org_id(),
                epoch_start = enforcer.epoch_start(),
                "epoch rolled"
            );
        }
        if !allowed {
            debug!(
                org_id = enforcer.org_id(),
                now,
                count = enforcer.epoch_count(),
                threshold = enforcer.limits().threshold(),
                "admission denied"
            );
        }
        allowed
    }

    fn update_limits(
        &self,
        caller: &Account,
        threshold: u64,
        window: u64,
    ) -> Result<(), RateLimitError> {
        let mut enforcer = self.inner.lock();
        match enforcer.update_limits(caller, threshold, window) {
            Ok(()) => {
                info!(
                    org_id = enforcer.org_id(),
                    threshold, window, "rate limits updated"
                );
                Ok(())
            }
            Err(err) => {
                warn!(org_id = enforcer.org_id(), %err, "rate limit update rejected");
                Err(err)
            }
        }
    }

    fn limits(&self) -> RateLimits {
        self.inner.lock().limits()
    }

    fn org_id(&self) -> OrgId {
        self.inner.lock().org_id().to_string()
    }
}

/// Registry of per-organization gates.
///
/// One `RateLimitService` per organization, each owning its state
/// exclusively. The registry shares a single permission authority and
/// clock across gates.
pub struct RateLimitRegistry {
    authority: Arc<dyn PermissionAuthority>,
    clock: Arc<dyn TimeSource>,
    orgs: RwLock<HashMap<OrgId, Arc<RateLimitService>>>,
}

impl RateLimitRegistry {
    /// Creates an empty registry.
    pub fn new(authority: Arc<dyn PermissionAuthority>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            authority,
            clock,
            orgs: RwLock::new(HashMap::new()),
        }
    }

    /// Registers an organization with initial limits.
    ///
    /// Idempotent: re-registering an existing organization returns the
    /// live gate untouched rather than resetting its state.
    ///
    /// # Errors
    /// - `InvalidWindow` when `window == 0` (new registrations only).
    pub fn register(
        &self,
        org_id: &str,
        threshold: u64,
        window: u64,
    ) -> Result<Arc<RateLimitService>, RateLimitError> {
        if let Some(existing) = self.orgs.read().get(org_id) {
            debug!(org_id, "organization already registered");
            return Ok(Arc::clone(existing));
        }

        let service = Arc::new(RateLimitService::new(
            org_id,
            Arc::clone(&self.authority),
            threshold,
            window,
            self.clock.as_ref(),
        )?);

        let mut orgs = self.orgs.write();
        // A racing register may have won between the read and the write.
        let entry = orgs
            .entry(org_id.to_string())
            .or_insert_with(|| Arc::clone(&service));
        Ok(Arc::clone(entry))
    }

    /// Looks up an organization's gate. Unknown organizations yield `None`.
    pub fn get(&self, org_id: &str) -> Option<Arc<RateLimitService>> {
        self.orgs.read().get(org_id).cloned()
    }

    /// Number of registered organizations.
    pub fn org_count(&self) -> usize {
        self.orgs.read().len()
    }
}
