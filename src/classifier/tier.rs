//! Tier state machine and the classification entry points.
//!
//! A workload's [`ClassificationLevel`] selects which tier runs its next cycle.
//! The Fast tier escalates through [`advance_tier`], a one-way transition;
//! the Complex tier then owns the workload until it is re-activated in the
//! Fast tier with [`Classifier::activate`].

use super::calibrator::calibrate_horizon;
use super::collaborators::Collaborators;
use super::events::ClassificationEvent;
use super::fast::{FastDecisionEngine, FastOutcome};
use super::strategy::ClassificationLevel;
use super::workload::WorkloadIntensityBehavior;

/// Move a workload one tier up and return its new level.
///
/// Fast becomes Complex. Complex is the top tier and stays where it is.
pub fn advance_tier(wib: &mut WorkloadIntensityBehavior) -> ClassificationLevel {
    let next = match wib.setting.level {
        ClassificationLevel::Fast => ClassificationLevel::Complex,
        ClassificationLevel::Complex => ClassificationLevel::Complex,
    };
    wib.setting.level = next;
    next
}

/// Drives classification cycles for workloads.
///
/// Holds no per-workload state; one `Classifier` can serve any number of
/// workloads, each passed in by exclusive reference.
#[derive(Debug, Clone)]
pub struct Classifier {
    collaborators: Collaborators,
}

impl Classifier {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Assign the workload to the Fast tier: calibrate its horizon and period,
    /// then run one classification cycle.
    pub fn activate(&self, wib: &mut WorkloadIntensityBehavior) {
        wib.setting.level = ClassificationLevel::Fast;

        let factor = wib.setting.thresholds.period_factor_fast;
        let calibration = calibrate_horizon(&mut wib.objectives, &mut wib.period, factor);
        self.collaborators
            .sink
            .emit(&ClassificationEvent::HorizonCalibrated {
                workload: wib.id().clone(),
                recent_horizon: calibration.recent_horizon,
                period: calibration.period,
                clamped: calibration.clamped,
            });

        self.classify(wib);
    }

    /// Run one classification cycle in whichever tier owns the workload.
    ///
    /// Outcomes are visible only through the workload's setting, series and
    /// strategy slots, and through emitted events.
    pub fn classify(&self, wib: &mut WorkloadIntensityBehavior) {
        match wib.setting.level {
            ClassificationLevel::Fast => {
                let outcome = FastDecisionEngine::new(&self.collaborators).decide(wib);
                if outcome == FastOutcome::Escalate {
                    self.escalate(wib);
                }
            }
            ClassificationLevel::Complex => self.collaborators.complex.classify(wib),
        }

        wib.record_cycle();
        self.collaborators
            .sink
            .emit(&ClassificationEvent::Classified {
                workload: wib.id().clone(),
                level: wib.setting.level,
            });
    }

    /// Hand the current cycle to the Complex tier.
    fn escalate(&self, wib: &mut WorkloadIntensityBehavior) {
        self.collaborators.sink.emit(&ClassificationEvent::Escalated {
            workload: wib.id().clone(),
            size: wib.series.size(),
            overhead: wib.objectives.overhead,
        });
        advance_tier(wib);
        self.collaborators.complex.classify(wib);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassificationConfig, ForecastObjectives, TimeSeries};
    use std::time::Duration;

    #[test]
    fn test_advance_tier_is_one_way() {
        let mut wib = WorkloadIntensityBehavior::new(
            "tier",
            TimeSeries::default(),
            ForecastObjectives::new(1, 2, 0.0),
            Duration::from_secs(1),
            ClassificationConfig::default(),
        );
        assert_eq!(advance_tier(&mut wib), ClassificationLevel::Complex);
        assert_eq!(advance_tier(&mut wib), ClassificationLevel::Complex);
        assert_eq!(wib.setting.level, ClassificationLevel::Complex);
    }
}
