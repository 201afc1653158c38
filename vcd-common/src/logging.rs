//! Logging initialization using tracing.
//!
//! Log output goes to stderr: the generator writes documents to stdout and
//! the two streams must not mix.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the level filter. `RUST_LOG`, when set, wins over `level`.
fn filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e)),
    }
}

/// Initialize human-readable logging at the given level.
///
/// # Arguments
/// * `level` - Log level or filter directive (trace, debug, info, warn, error,
///   or e.g. `vcd_compute=debug`)
///
/// # Example
/// ```
/// vcd_common::init_logging("info").unwrap();
/// ```
pub fn init_logging(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(level)?)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}

/// Initialize logging with JSON output, one object per line.
pub fn init_logging_json(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(level)?)
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
