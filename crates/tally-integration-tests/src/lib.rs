//! Integration test crate for the tally daemon.
//!
//! This crate has no library code; it only contains integration tests
//! that exercise full ledger flows across workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p tally-integration-tests
//! ```
