//! # Organization Rate-Limit Manager
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Admission-control gate for a permissioned multi-organization network.
//! Each organization gets a fixed-window counter: at most `threshold`
//! operations are admitted per `window` seconds, and only an org admin
//! (resolved through the external permission authority) may change those
//! limits.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `window > 0` at all times | `domain/config.rs` - `RateLimits::new()` |
//! | `count <= threshold` after every decision | `domain/enforcer.rs` - `check_and_record()` |
//! | Stale epochs roll before counting | `domain/enforcer.rs` - `check_and_record()` step 1 |
//! | Only org admins mutate limits | `domain/enforcer.rs` - `update_limits()` |
//!
//! ## Admission Algorithm
//!
//! Fixed-window counter, not a sliding window or token bucket:
//!
//! ```text
//! check_and_record(now):
//!   1. now - epoch_start >= window  →  epoch_start = now, count = 0
//!   2. count >= threshold           →  deny (normal result, not an error)
//!   3. otherwise                    →  count += 1, allow
//! ```
//!
//! Bursts of up to `threshold` operations are possible on each side of an
//! epoch boundary. This trades smoothing for O(1) state and is a documented
//! characteristic of the design.
//!
//! ## Module Structure
//!
//! ```text
//! rate-limit-manager/
//! ├── domain/          # RateLimits, RateLimitEnforcer, errors, invariants
//! ├── ports/           # RateLimitApi (inbound), PermissionAuthority + TimeSource (outbound)
//! └── service.rs       # Thread-safe per-org service + multi-org registry
//! ```
//!
//! ## Concurrency
//!
//! The domain layer is a pure synchronous state machine; `now` is always
//! supplied by the caller, never read internally. `service::RateLimitService`
//! reinstates the single-writer guarantee of the originating environment by
//! serializing every call through a per-organization mutex.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    Account, EnforcerSnapshot, OrgId, RateLimitEnforcer, RateLimitError, RateLimits, Timestamp,
};
pub use ports::{PermissionAuthority, RateLimitApi, SystemTimeSource, TimeSource};
pub use service::{RateLimitRegistry, RateLimitService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
