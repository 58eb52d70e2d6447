#![deny(unreachable_pub)]

// Core modules
mod errors;

// Feature modules
pub mod classifier;
pub mod infra;

// Re-exports
pub use classifier::{
    advance_tier, ClassificationConfig, ClassificationEvent, ClassificationLevel,
    ClassificationSetting, Classifier, Collaborators, EventSink, ForecastObjectives,
    ForecastResult, ForecastStrategy, IndexVector, MaseMetric, TimeSeries, WorkloadId,
    WorkloadIntensityBehavior, WorkloadRegistry,
};
pub use errors::{ConfigError, Error, Result};
pub use infra::logging::{init_logging, LogConfig, LogFormat};
