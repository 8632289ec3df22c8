//! # Domain Errors
//!
//! Error types for rate-limit enforcement and configuration governance.

use thiserror::Error;

/// Organization identifier. Opaque token, set once at construction.
pub type OrgId = String;

/// Account identity (20-byte).
pub type Account = [u8; 20];

/// Timestamp in seconds. Supplied by the caller's clock, never read
/// internally by the domain layer.
pub type Timestamp = u64;

/// Rate-limit error types.
///
/// A denied admission is NOT an error: `check_and_record` returns `false`
/// for over-quota organizations so that quota exhaustion (expected under
/// normal load) stays distinguishable from caller-side problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// Window argument was zero, at construction or update.
    ///
    /// Always recoverable by supplying a positive window; never leaves
    /// state mutated.
    #[error("window cannot be zero")]
    InvalidWindow,

    /// Caller is not an org admin for the governed organization.
    ///
    /// Raised before any validation of the numeric arguments, so an
    /// unauthorized caller cannot probe input validity through error
    /// content. Never leaves state mutated.
    #[error("account is not an org admin account for {org_id}")]
    NotAuthorized {
        /// The organization the caller tried to reconfigure.
        org_id: OrgId,
    },
}
