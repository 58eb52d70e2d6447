//! Workload intensity behavior aggregate.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::ClassificationConfig;
use super::objectives::ForecastObjectives;
use super::quality::MaseMetric;
use super::series::TimeSeries;
use super::setting::ClassificationSetting;
use super::strategy::ForecastResult;

/// Stable workload identity, used for diagnostics and registry lookups.
///
/// Uses `Arc<str>` for cheap cloning into events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkloadId(Arc<str>);

impl WorkloadId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkloadId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One monitored workload: its series, objectives and classification state.
#[derive(Debug, Clone)]
pub struct WorkloadIntensityBehavior {
    id: WorkloadId,
    pub series: TimeSeries,
    pub objectives: ForecastObjectives,
    /// Sampling / classification period
    pub period: Duration,
    pub setting: ClassificationSetting,
    /// Last result of strategy slot 1
    pub result1: Option<ForecastResult>,
    /// Last result of strategy slot 2
    pub result2: Option<ForecastResult>,
    /// Accuracy feedback, refreshed at the start of every Fast cycle
    pub mase: MaseMetric,
    /// Completed classification cycles, across tiers
    cycles: u64,
}

impl WorkloadIntensityBehavior {
    pub fn new(
        id: impl Into<WorkloadId>,
        series: TimeSeries,
        objectives: ForecastObjectives,
        period: Duration,
        config: ClassificationConfig,
    ) -> Self {
        Self {
            id: id.into(),
            series,
            objectives,
            period,
            setting: ClassificationSetting::new(config),
            result1: None,
            result2: None,
            mase: MaseMetric::default(),
            cycles: 0,
        }
    }

    pub fn id(&self) -> &WorkloadId {
        &self.id
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub(crate) fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Record the outcome of the forecasts that ran since the last cycle.
    pub fn record_results(&mut self, result1: Option<ForecastResult>, result2: Option<ForecastResult>) {
        self.result1 = result1;
        self.result2 = result2;
    }
}
