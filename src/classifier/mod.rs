//! Workload intensity classification.
//!
//! The Fast tier picks forecast strategies from cheap shape indices and MASE
//! feedback, and escalates to the Complex tier once a series is long enough
//! and the overhead budget allows it. Key components:
//!
//! 1. **calibrator**: horizon and period scaling on Fast activation
//! 2. **fast**: the per-cycle Fast decision procedure
//! 3. **tier**: tier transitions and the `Classifier` entry points
//! 4. **registry**: per-workload locking and parallel cycles
//!
//! Index and MASE computation and the Complex tier are external; see
//! [`collaborators`].

pub mod calibrator;
pub mod collaborators;
pub mod comparator;
pub mod config;
pub mod events;
pub mod fast;
pub mod indices;
pub mod mock;
pub mod objectives;
pub mod quality;
pub mod registry;
pub mod series;
pub mod setting;
pub mod smoothing;
pub mod strategy;
pub mod tier;
pub mod workload;

#[cfg(test)]
mod tests;

pub use calibrator::{calibrate_horizon, Calibration};
pub use collaborators::{
    Collaborators, ComplexClassifier, ForecastQuality, IndexCalculator, Smoother,
    StrategyComparator,
};
pub use comparator::{MaseComparator, WorseSlot};
pub use config::ClassificationConfig;
pub use events::{
    ClassificationEvent, EventSink, RecordingSink, SelectionReason, Tee, TracingSink,
};
pub use fast::{FastDecisionEngine, FastOutcome};
pub use indices::IndexVector;
pub use objectives::ForecastObjectives;
pub use quality::{MaseMetric, SlotAccuracy};
pub use registry::WorkloadRegistry;
pub use series::TimeSeries;
pub use setting::ClassificationSetting;
pub use smoothing::BlockMovingAverage;
pub use strategy::{ClassificationLevel, ForecastResult, ForecastStrategy};
pub use tier::{advance_tier, Classifier};
pub use workload::{WorkloadId, WorkloadIntensityBehavior};
