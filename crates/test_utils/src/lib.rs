//! Test utilities for the booking conformance workspace.
//!
//! This crate provides a stateful mock of the booking service and a logging
//! initialiser shared by unit and integration tests.

pub mod mock_booker;

pub use mock_booker::{default_credentials, MockBooker};

/// Initialize logging for tests.
///
/// Output goes through the test writer so it is only shown for failing
/// tests. Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .with_target(false)
        .try_init();
}
