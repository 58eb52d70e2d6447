//! Reference implementation of worse-strategy deactivation.

use super::collaborators::StrategyComparator;
use super::quality::MaseMetric;
use super::strategy::ForecastStrategy;
use super::workload::WorkloadIntensityBehavior;

/// Which slot lost a MASE comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorseSlot {
    First,
    Second,
}

/// Deactivates the slot with the higher MASE.
///
/// Observed MASE is compared when both slots have one, estimated MASE
/// otherwise. Missing scores, non-finite scores and ties leave both slots
/// active.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaseComparator;

impl MaseComparator {
    /// Decide which slot is worse, if a comparison is possible.
    pub fn worse_slot(metric: &MaseMetric) -> Option<WorseSlot> {
        let (a, b) = match (metric.slot1.observed, metric.slot2.observed) {
            (Some(a), Some(b)) => (a, b),
            _ => (metric.slot1.estimated?, metric.slot2.estimated?),
        };
        if a > b {
            Some(WorseSlot::First)
        } else if b > a {
            Some(WorseSlot::Second)
        } else {
            None
        }
    }
}

impl StrategyComparator for MaseComparator {
    fn deactivate_worse_strategy(&self, wib: &mut WorkloadIntensityBehavior) {
        let setting = &mut wib.setting;
        if !setting.recent_strategy1.is_active() || !setting.recent_strategy2.is_active() {
            return;
        }
        match Self::worse_slot(&wib.mase) {
            Some(WorseSlot::First) => setting.recent_strategy1 = ForecastStrategy::Inactive,
            Some(WorseSlot::Second) => setting.recent_strategy2 = ForecastStrategy::Inactive,
            None => {}
        }
    }
}
