//! Logging setup for the dri binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr subscriber filtered by `RUST_LOG`, `warn` when unset.
/// Stdout is left for command output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);

    // A second init (e.g. from a test harness) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(filter).with(stderr_layer).try_init();
}
