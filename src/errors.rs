use thiserror::Error;

use crate::classifier::WorkloadId;

/// Configuration and scenario validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid threshold `{name}`: {reason}")]
    InvalidThreshold { name: &'static str, reason: String },
    #[error("Smoothing window (last_x_values) must be > 0")]
    ZeroSmoothingWindow,
    #[error("Period factor must be > 0")]
    ZeroPeriodFactor,
    #[error("Recent horizon {recent} exceeds max horizon {max}")]
    HorizonOutOfRange { recent: u32, max: u32 },
    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Main crate error type
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system error while loading configuration or scenarios
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON scenario or report error
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Workload not registered
    #[error("Unknown workload: {0}")]
    UnknownWorkload(WorkloadId),

    /// Workload already registered
    #[error("Workload already registered: {0}")]
    DuplicateWorkload(WorkloadId),

    /// A classification cycle panicked while holding the workload lock
    #[error("Workload lock poisoned: {0}")]
    WorkloadPoisoned(WorkloadId),
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;
