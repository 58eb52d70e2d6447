//! MASE forecast-quality feedback for the two strategy slots.

use serde::{Deserialize, Serialize};

/// Estimated and observed MASE of one strategy slot.
///
/// The estimate comes from in-sample fitting; the observed value needs the
/// forecast horizon to have elapsed and is therefore absent early on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotAccuracy {
    #[serde(default)]
    pub estimated: Option<f64>,
    #[serde(default)]
    pub observed: Option<f64>,
}

impl SlotAccuracy {
    pub fn new(estimated: Option<f64>, observed: Option<f64>) -> Self {
        Self {
            estimated,
            observed,
        }
    }
}

/// Accuracy of both strategy slots, recomputed every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaseMetric {
    #[serde(default)]
    pub slot1: SlotAccuracy,
    #[serde(default)]
    pub slot2: SlotAccuracy,
}

impl MaseMetric {
    pub fn new(slot1: SlotAccuracy, slot2: SlotAccuracy) -> Self {
        Self { slot1, slot2 }
    }

    /// Observed error of the first slot, if known.
    pub fn observed1(&self) -> Option<f64> {
        self.slot1.observed
    }
}
