//! End-to-end scenarios for the rate-limit gate.

pub mod rate_limit;
