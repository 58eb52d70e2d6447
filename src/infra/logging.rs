//! Structured logging setup.
//!
//! Stdout logging in one of three formats, plus an optional daily-rotated JSON
//! file stream via tracing-appender.
//!
//! # Component Targets
//!
//! | Target | Description |
//! |--------|-------------|
//! | `wib::classifier` | Classification decisions (calibration, escalation, smoothing, selection) |
//! | `wib::registry` | Workload registry |
//! | `wib::replay` | Scenario replay tool |
//!
//! ```bash
//! # Debug classification decisions only
//! RUST_LOG=warn,wib::classifier=debug wib_replay scenario.json
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable format with colors (default for development)
    #[default]
    Pretty,
    /// JSON format (best for log aggregation)
    Json,
    /// Compact single-line format
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Format for stdout logging
    #[serde(default)]
    pub stdout_format: LogFormat,

    /// Directory for the rotated JSON log file. No file stream when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Level for the file stream
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            stdout_format: LogFormat::default(),
            log_dir: None,
            file_level: default_file_level(),
        }
    }
}

impl LogConfig {
    /// Pretty stdout, no files.
    pub fn development() -> Self {
        Self::default()
    }

    /// JSON stdout plus a rotated JSON file in `log_dir`.
    pub fn production(log_dir: PathBuf) -> Self {
        Self {
            stdout_format: LogFormat::Json,
            log_dir: Some(log_dir),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Initialize the global subscriber.
///
/// The returned guard flushes the file stream on drop and must be kept alive
/// for the duration of the program.
pub fn init_logging(
    config: &LogConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout_layer = match config.stdout_format {
        LogFormat::Json => fmt::layer().json().with_filter(stdout_filter).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_filter(stdout_filter).boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_filter(stdout_filter)
            .boxed(),
    };

    let Some(log_dir) = config.log_dir.as_ref() else {
        tracing_subscriber::registry().with(stdout_layer).try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "wib-classifier.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .json()
        .with_filter(EnvFilter::new(&config.file_level));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    eprintln!("File logging enabled: {}", log_dir.display());
    Ok(Some(guard))
}

/// Log target constants for component-specific logging.
///
/// ```ignore
/// tracing::debug!(target: targets::CLASSIFIER, workload = %id, "Strategies selected");
/// ```
pub mod targets {
    /// Classification decisions
    pub const CLASSIFIER: &str = "wib::classifier";
    /// Workload registry
    pub const REGISTRY: &str = "wib::registry";
    /// Scenario replay tool
    pub const REPLAY: &str = "wib::replay";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.stdout_format, LogFormat::Pretty);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_log_config_production() {
        let config = LogConfig::production(PathBuf::from("/var/log/wib"));
        assert_eq!(config.stdout_format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/wib")));
    }

    #[test]
    fn test_log_format_serde() {
        let json = serde_json::to_string(&LogFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");

        let parsed: LogFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(parsed, LogFormat::Compact);
    }
}
