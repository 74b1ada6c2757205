//! Log output setup

use crate::cli::{LogLevel, OutputFormat};
use anyhow::{Result, anyhow};
use std::io;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `level`
pub fn env_filter(level: LogLevel) -> EnvFilter {
    let level: Level = level.into();
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()))
}

/// Install the global subscriber, writing to stderr.
///
/// Log lines are JSON objects when the report format is JSON.
pub fn init(level: LogLevel, format: OutputFormat) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(false)
        .with_writer(io::stderr);

    let installed = match format {
        OutputFormat::Text => builder.try_init(),
        OutputFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_subscriber_installs_once() {
        init(LogLevel::Warn, OutputFormat::Json).expect("first install");
        tracing::warn!(archive = 3, "json log line");
        assert!(init(LogLevel::Warn, OutputFormat::Text).is_err());
    }
}
