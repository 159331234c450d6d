//! Logging setup (`tracing` + `tracing-subscriber`).
//!
//! Logs go to stderr so `--format json` output on stdout stays machine-readable.
//!
//! # Environment
//! - `RUST_LOG`: filter directive (default: `warn`), e.g. `RUST_LOG=salescast=debug`

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Verbose logging routed through the test harness' capture.
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
