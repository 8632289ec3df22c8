//! Outbound (Driven) ports for the rate-limit subsystem.
//!
//! These traits define the dependencies the enforcer needs from its
//! environment: the organization directory's admin lookup and a clock.

use crate::domain::{Account, Timestamp};

/// Admin lookup against the external permission directory.
///
/// The directory behind this trait may be arbitrarily complex (role
/// hierarchies, vote-governed and hot-swappable in the originating
/// environment); the enforcer depends only on this single query.
///
/// # Contract
/// Total and side-effect free: an unknown organization or account yields
/// `false`, never an error, and repeated calls with the same inputs and no
/// directory change yield the same answer.
pub trait PermissionAuthority: Send + Sync {
    /// Whether `account` is an org admin of `org_id`.
    fn is_org_admin(&self, org_id: &str, account: &Account) -> bool;
}

/// Time source for consistent timestamp handling.
///
/// The domain layer never reads a clock; callers resolve `now` through
/// this trait, which keeps the automaton deterministic under test.
/// Production implementations must be monotonically non-decreasing.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source (Unix epoch seconds).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Mock permission authority for testing.
#[cfg(test)]
pub struct MockPermissionAuthority {
    admins: std::collections::HashMap<String, Vec<Account>>,
}

#[cfg(test)]
impl MockPermissionAuthority {
    pub fn new() -> Self {
        Self {
            admins: std::collections::HashMap::new(),
        }
    }

    pub fn with_admin(mut self, org_id: &str, account: Account) -> Self {
        self.admins.entry(org_id.to_string()).or_default().push(account);
        self
    }
}

#[cfg(test)]
impl PermissionAuthority for MockPermissionAuthority {
    fn is_org_admin(&self, org_id: &str, account: &Account) -> bool {
        self.admins
            .get(org_id)
            .is_some_and(|accounts| accounts.contains(account))
    }
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.time
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
