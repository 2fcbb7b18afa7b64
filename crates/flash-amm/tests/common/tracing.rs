//! Tracing configuration for tests

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary. `RUST_LOG`
/// overrides the default filter.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("flash_amm=debug"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}
