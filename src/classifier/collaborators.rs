//! Interfaces of the collaborators the classifier consumes.
//!
//! Index computation, MASE computation and the Complex tier live outside this
//! crate. The classifier only sees them through these traits, which keeps the
//! decision procedure testable with scripted inputs (see [`super::mock`]).

use std::sync::Arc;

use super::events::{EventSink, TracingSink};
use super::indices::IndexVector;
use super::quality::MaseMetric;
use super::series::TimeSeries;
use super::workload::WorkloadIntensityBehavior;

/// Computes the MASE metric from the workload's latest forecast results.
pub trait ForecastQuality: Send + Sync {
    fn compute_quality(&self, wib: &WorkloadIntensityBehavior) -> MaseMetric;
}

/// Computes the six shape indices over the most recent `window` observations.
pub trait IndexCalculator: Send + Sync {
    fn compute_indices(&self, wib: &WorkloadIntensityBehavior, window: usize) -> IndexVector;
}

/// Moving-average transform.
///
/// The returned series has equal or reduced granularity and carries the
/// original length in its skipped count.
pub trait Smoother: Send + Sync {
    fn apply_moving_average(&self, series: &TimeSeries, window: usize) -> TimeSeries;
}

/// Deactivates the less accurate of the two active strategy slots.
///
/// Must be a no-op when no comparison is possible yet.
pub trait StrategyComparator: Send + Sync {
    fn deactivate_worse_strategy(&self, wib: &mut WorkloadIntensityBehavior);
}

/// The Complex classification tier. One call performs one Complex cycle.
pub trait ComplexClassifier: Send + Sync {
    fn classify(&self, wib: &mut WorkloadIntensityBehavior);
}

/// Everything a [`Classifier`](super::Classifier) delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub quality: Arc<dyn ForecastQuality>,
    pub indices: Arc<dyn IndexCalculator>,
    pub smoother: Arc<dyn Smoother>,
    pub comparator: Arc<dyn StrategyComparator>,
    pub complex: Arc<dyn ComplexClassifier>,
    pub sink: Arc<dyn EventSink>,
}

impl Collaborators {
    /// Bundle the external collaborators with the reference smoother,
    /// comparator and a `tracing` event sink.
    pub fn new(
        quality: Arc<dyn ForecastQuality>,
        indices: Arc<dyn IndexCalculator>,
        complex: Arc<dyn ComplexClassifier>,
    ) -> Self {
        Self {
            quality,
            indices,
            smoother: Arc::new(super::smoothing::BlockMovingAverage),
            comparator: Arc::new(super::comparator::MaseComparator),
            complex,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
