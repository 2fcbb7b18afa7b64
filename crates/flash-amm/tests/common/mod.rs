//! Shared test infrastructure for the flash-amm integration suites

#![allow(dead_code)]

pub mod fixtures;
pub mod host;
pub mod tracing;

pub use fixtures::*;
pub use host::MockHost;
pub use tracing::init_test_tracing;
