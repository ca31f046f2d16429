//! Test helpers

use tracing_subscriber::EnvFilter;

/// Initialize tracing for tests; safe to call from multiple tests
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
