//! Utilities for logging.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global subscriber used by binaries embedding the wrapper.
///
/// Verbosity is read from `RUST_LOG`, defaulting to `info`. Calling this more
/// than once is harmless, later calls leave the first subscriber in place.
pub fn init() {
    let _ = FmtSubscriber::builder()
        .with_env_filter(env_filter(Level::INFO))
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Install a subscriber that writes through the test harness.
///
/// Defaults to `debug` so connection cache decisions show up in failing test
/// output.
pub fn init_test() {
    let _ = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter(Level::DEBUG))
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}
