//! Telemetry module
//!
//! Logging setup for the binary

mod logging;

pub use logging::{init_logging, LogFormat};

use crate::config::TelemetryConfig;

/// Initialize logging from configuration, with an optional level override
pub fn init_telemetry(config: &TelemetryConfig, level_override: Option<&str>) -> anyhow::Result<()> {
    let level = level_override.unwrap_or(&config.log_level);
    init_logging(level, config.format)
}
