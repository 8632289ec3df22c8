//! # Admission-Control Test Suite
//!
//! Unified test crate for the rate-limit subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end gate scenarios
//!     └── rate_limit.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rlm-tests
//!
//! # Benchmarks
//! cargo bench -p rlm-tests
//! ```

#![allow(dead_code)]

pub mod integration;
