//! Forecast objectives of a workload.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How far ahead forecasts must reach and what they may cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastObjectives {
    /// Horizon (in observations) recent forecasts must reach
    pub recent_horizon: u32,
    /// Ceiling for `recent_horizon`
    pub max_horizon: u32,
    /// Observed computational cost signal
    #[serde(default)]
    pub overhead: f64,
}

impl ForecastObjectives {
    pub fn new(recent_horizon: u32, max_horizon: u32, overhead: f64) -> Self {
        Self {
            recent_horizon,
            max_horizon,
            overhead,
        }
    }

    /// Check the horizon ordering of externally supplied objectives.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_horizon > self.max_horizon {
            return Err(ConfigError::HorizonOutOfRange {
                recent: self.recent_horizon,
                max: self.max_horizon,
            });
        }
        Ok(())
    }
}
