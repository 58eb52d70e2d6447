//! Fast-tier decision procedure.
//!
//! Each cycle runs a fixed sequence of tests over quality feedback and the
//! shape indices of the most recent window. The first terminal test wins:
//!
//! 1. refresh MASE feedback
//! 2. tighten the escalation size threshold to 3 × frequency
//! 3. escalate to the Complex tier (terminal)
//! 4. refresh indices; stop if the strategy is pinned
//! 5. intermittent demand → Croston (terminal)
//! 6. smoothing vote, 3 of 4 (advisory, not terminal)
//! 7. cubic spline eligibility (terminal)
//! 8. ARIMA(1,0,1) + SES, then drop the worse slot (terminal)
//!
//! Comparisons are plain IEEE comparisons, so a NaN index or threshold never
//! satisfies a test.

use super::collaborators::Collaborators;
use super::config::ClassificationConfig;
use super::events::{ClassificationEvent, SelectionReason};
use super::indices::IndexVector;
use super::strategy::ForecastStrategy;
use super::workload::WorkloadIntensityBehavior;

/// What a Fast cycle decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastOutcome {
    /// Size and overhead allow the Complex tier; nothing else was touched
    Escalate,
    /// Indices refreshed, strategy selection pinned
    Frozen,
    /// Strategy slots were (re)assigned
    Selected(SelectionReason),
}

/// Runs the Fast decision procedure against one workload.
pub struct FastDecisionEngine<'a> {
    collaborators: &'a Collaborators,
}

impl<'a> FastDecisionEngine<'a> {
    pub fn new(collaborators: &'a Collaborators) -> Self {
        Self { collaborators }
    }

    /// Run one Fast cycle.
    ///
    /// On [`FastOutcome::Escalate`] the workload's slots, indices and series are
    /// untouched; handing the cycle to the Complex tier is the caller's job.
    pub fn decide(&self, wib: &mut WorkloadIntensityBehavior) -> FastOutcome {
        wib.mase = self.collaborators.quality.compute_quality(wib);

        self.tighten_size_threshold(wib);

        if Self::should_escalate(wib) {
            return FastOutcome::Escalate;
        }

        let window = wib.setting.last_x_values();
        let indices = self.collaborators.indices.compute_indices(wib, window);
        if !indices.is_finite() {
            self.collaborators
                .sink
                .emit(&ClassificationEvent::NonFiniteIndices {
                    workload: wib.id().clone(),
                    indices,
                });
        }
        wib.setting.indices = Some(indices);

        if wib.setting.fixed_forecast_strategy() {
            return FastOutcome::Frozen;
        }

        let thresholds = wib.setting.thresholds.clone();

        if indices.zero_value_rate > thresholds.rate_of_zero_values_threshold {
            return self.select(
                wib,
                ForecastStrategy::Croston,
                ForecastStrategy::Inactive,
                SelectionReason::IntermittentDemand,
            );
        }

        // Too little history for the window-based tests
        let enough_history = wib.series.size() >= window;

        if enough_history && smoothing_votes(&indices, &thresholds) >= 3 {
            self.smooth_if_new_data(wib, window);
        }

        if enough_history && cubic_spline_eligible(&indices, &thresholds) {
            return if cubic_spline_rejected(wib, &thresholds) {
                self.select(
                    wib,
                    ForecastStrategy::Arima101,
                    ForecastStrategy::Ses,
                    SelectionReason::CubicSplineRejected,
                )
            } else {
                self.select(
                    wib,
                    ForecastStrategy::CubicSpline,
                    ForecastStrategy::Ses,
                    SelectionReason::CubicSplineEligible,
                )
            };
        }

        wib.setting
            .select(ForecastStrategy::Arima101, ForecastStrategy::Ses);
        // A fresh pair has nothing to be compared against
        if wib.cycles() > 0 {
            self.collaborators.comparator.deactivate_worse_strategy(wib);
        }
        let (slot1, slot2) = wib.setting.strategies();
        self.emit_selection(wib, slot1, slot2, SelectionReason::DefaultFallback);
        FastOutcome::Selected(SelectionReason::DefaultFallback)
    }

    fn tighten_size_threshold(&self, wib: &mut WorkloadIntensityBehavior) {
        let frequency = wib.series.frequency();
        if frequency == 0 {
            return;
        }
        let candidate = frequency.saturating_mul(3);
        if let Some(from) = wib.setting.tighten_size_threshold(candidate) {
            self.collaborators
                .sink
                .emit(&ClassificationEvent::ThresholdTightened {
                    workload: wib.id().clone(),
                    from,
                    to: candidate,
                });
        }
    }

    fn should_escalate(wib: &WorkloadIntensityBehavior) -> bool {
        wib.series.size() >= wib.setting.size_threshold_fast()
            && wib.objectives.overhead > wib.setting.thresholds.overhead_threshold_fast
    }

    /// Smooth once per `window` new observations past the bookmark.
    fn smooth_if_new_data(&self, wib: &mut WorkloadIntensityBehavior, window: usize) {
        let bookmark = wib.setting.last_smoothed_point();
        if bookmark.saturating_add(window) >= wib.series.position() {
            return;
        }

        wib.series = self
            .collaborators
            .smoother
            .apply_moving_average(&wib.series, window);
        let position = wib.series.position();
        wib.setting.advance_smoothed_point(position);

        self.collaborators.sink.emit(&ClassificationEvent::Smoothed {
            workload: wib.id().clone(),
            position,
            retained: wib.series.size(),
        });
    }

    fn select(
        &self,
        wib: &mut WorkloadIntensityBehavior,
        slot1: ForecastStrategy,
        slot2: ForecastStrategy,
        reason: SelectionReason,
    ) -> FastOutcome {
        wib.setting.select(slot1, slot2);
        self.emit_selection(wib, slot1, slot2, reason);
        FastOutcome::Selected(reason)
    }

    fn emit_selection(
        &self,
        wib: &WorkloadIntensityBehavior,
        slot1: ForecastStrategy,
        slot2: ForecastStrategy,
        reason: SelectionReason,
    ) {
        self.collaborators
            .sink
            .emit(&ClassificationEvent::StrategiesSelected {
                workload: wib.id().clone(),
                slot1,
                slot2,
                reason,
            });
    }
}

/// Count the smoothing conditions that hold (0..=4).
///
/// High quartile dispersion, low burstiness, high variance coefficient and
/// low relative monotonicity each cast one vote.
pub fn smoothing_votes(indices: &IndexVector, t: &ClassificationConfig) -> usize {
    [
        indices.quartile_dispersion > t.quartile_dispersion_threshold_smoothing,
        indices.burstiness < t.burstiness_threshold_smoothing,
        indices.variance_coefficient > t.variance_coefficient_threshold_smoothing,
        indices.relative_monotonicity < t.relative_monotonicity_smoothing,
    ]
    .iter()
    .filter(|vote| **vote)
    .count()
}

/// Gradient, burstiness and monotonicity all at or above their thresholds.
pub fn cubic_spline_eligible(indices: &IndexVector, t: &ClassificationConfig) -> bool {
    indices.relative_gradient >= t.relative_gradient_threshold_cs
        && indices.burstiness >= t.burstiness_threshold_cs
        && indices.relative_monotonicity >= t.relative_monotonicity_cs
}

/// The last cubic spline forecast was implausible and observably inaccurate.
fn cubic_spline_rejected(wib: &WorkloadIntensityBehavior, t: &ClassificationConfig) -> bool {
    let implausible_cs = matches!(
        wib.result1,
        Some(result) if result.strategy == ForecastStrategy::CubicSpline && !result.plausible
    );
    implausible_cs
        && wib
            .mase
            .observed1()
            .is_some_and(|error| error > t.cs_error_threshold)
}
