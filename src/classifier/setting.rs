//! Per-workload classification state.

use serde::{Deserialize, Serialize};

use super::config::ClassificationConfig;
use super::indices::IndexVector;
use super::strategy::{ClassificationLevel, ForecastStrategy};

/// Mutable classification state owned by exactly one workload.
///
/// Thresholds are copied from [`ClassificationConfig`] on creation; only
/// `size_threshold_fast` is adjusted afterwards, and only downwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSetting {
    /// Thresholds this workload is classified with
    pub thresholds: ClassificationConfig,
    /// Current Fast escalation size threshold (never grows)
    size_threshold_fast: usize,
    /// Original-time-base position up to which the series has been smoothed
    last_smoothed_point: usize,
    /// Indices from the latest Fast cycle that got past the escalation test
    pub indices: Option<IndexVector>,
    /// Tier currently responsible for this workload
    pub level: ClassificationLevel,
    pub recent_strategy1: ForecastStrategy,
    pub recent_strategy2: ForecastStrategy,
}

impl ClassificationSetting {
    pub fn new(thresholds: ClassificationConfig) -> Self {
        Self {
            size_threshold_fast: thresholds.size_threshold_fast,
            thresholds,
            last_smoothed_point: 0,
            indices: None,
            level: ClassificationLevel::Fast,
            recent_strategy1: ForecastStrategy::Inactive,
            recent_strategy2: ForecastStrategy::Inactive,
        }
    }

    pub fn size_threshold_fast(&self) -> usize {
        self.size_threshold_fast
    }

    /// Lower the escalation threshold to `candidate` if it is smaller.
    ///
    /// Returns the previous threshold when it changed.
    pub fn tighten_size_threshold(&mut self, candidate: usize) -> Option<usize> {
        if candidate < self.size_threshold_fast {
            let previous = self.size_threshold_fast;
            self.size_threshold_fast = candidate;
            Some(previous)
        } else {
            None
        }
    }

    pub fn last_smoothed_point(&self) -> usize {
        self.last_smoothed_point
    }

    /// Move the smoothing bookmark forward. Never moves it back.
    pub fn advance_smoothed_point(&mut self, position: usize) {
        self.last_smoothed_point = self.last_smoothed_point.max(position);
    }

    pub fn last_x_values(&self) -> usize {
        self.thresholds.last_x_values
    }

    pub fn fixed_forecast_strategy(&self) -> bool {
        self.thresholds.fixed_forecast_strategy
    }

    /// Occupy both strategy slots.
    pub fn select(&mut self, slot1: ForecastStrategy, slot2: ForecastStrategy) {
        self.recent_strategy1 = slot1;
        self.recent_strategy2 = slot2;
    }

    pub fn strategies(&self) -> (ForecastStrategy, ForecastStrategy) {
        (self.recent_strategy1, self.recent_strategy2)
    }
}

impl Default for ClassificationSetting {
    fn default() -> Self {
        Self::new(ClassificationConfig::default())
    }
}
