//! End-to-end classification cycles with scripted collaborators.

use std::sync::Arc;
use std::time::Duration;

use super::events::{ClassificationEvent, RecordingSink, SelectionReason};
use super::mock::{scripted_collaborators, CountingComplex, ScriptedInputs};
use super::*;

struct Harness {
    inputs: Arc<ScriptedInputs>,
    complex: Arc<CountingComplex>,
    sink: Arc<RecordingSink>,
    classifier: Classifier,
}

fn harness() -> Harness {
    let inputs = Arc::new(ScriptedInputs::default());
    let complex = Arc::new(CountingComplex::new());
    let sink = Arc::new(RecordingSink::new());
    let classifier = Classifier::new(scripted_collaborators(
        inputs.clone(),
        complex.clone(),
        sink.clone(),
    ));
    Harness {
        inputs,
        complex,
        sink,
        classifier,
    }
}

fn workload(size: usize, frequency: usize, overhead: f64) -> WorkloadIntensityBehavior {
    WorkloadIntensityBehavior::new(
        "wl-test",
        TimeSeries::new((0..size).map(|i| (i % 7) as f64 + 1.0).collect(), frequency),
        ForecastObjectives::new(4, 32, overhead),
        Duration::from_secs(60),
        ClassificationConfig::default(),
    )
}

/// Smooth, monotone, moderately bursty: cubic spline territory.
fn cs_indices() -> IndexVector {
    IndexVector {
        variance_coefficient: 0.1,
        burstiness: 0.2,
        relative_monotonicity: 0.6,
        zero_value_rate: 0.0,
        quartile_dispersion: 0.1,
        relative_gradient: 0.8,
    }
}

/// All four smoothing votes, not cubic spline eligible.
fn noisy_indices() -> IndexVector {
    IndexVector {
        variance_coefficient: 0.9,
        burstiness: 0.01,
        relative_monotonicity: 0.1,
        zero_value_rate: 0.0,
        quartile_dispersion: 0.9,
        relative_gradient: 0.1,
    }
}

fn observed1(error: f64) -> MaseMetric {
    MaseMetric::new(SlotAccuracy::new(None, Some(error)), SlotAccuracy::default())
}

fn smoothed_count(events: &[ClassificationEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ClassificationEvent::Smoothed { .. }))
        .count()
}

// =========================================================================
// Escalation
// =========================================================================

#[test]
fn test_short_period_series_escalates_after_tightening() {
    let h = harness();
    let mut wib = workload(40, 10, 2.0);

    h.classifier.classify(&mut wib);

    assert_eq!(wib.setting.size_threshold_fast(), 30);
    assert_eq!(wib.setting.level, ClassificationLevel::Complex);
    assert_eq!(h.complex.cycles(), 1);
    // nothing past the escalation test ran
    assert_eq!(h.inputs.index_calls(), 0);
    assert!(wib.setting.indices.is_none());
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Inactive, ForecastStrategy::Inactive)
    );

    let events = h.sink.events();
    assert!(events.contains(&ClassificationEvent::ThresholdTightened {
        workload: wib.id().clone(),
        from: 50,
        to: 30,
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, ClassificationEvent::Escalated { size: 40, .. })));
    assert_eq!(
        events.last(),
        Some(&ClassificationEvent::Classified {
            workload: wib.id().clone(),
            level: ClassificationLevel::Complex,
        })
    );
}

#[test]
fn test_escalation_needs_both_size_and_overhead() {
    // large but cheap
    let h = harness();
    let mut wib = workload(60, 0, 0.5);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.level, ClassificationLevel::Fast);

    // overhead exactly at threshold does not escalate
    let mut wib = workload(60, 0, 1.0);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.level, ClassificationLevel::Fast);

    // expensive but short
    let mut wib = workload(49, 0, 5.0);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.level, ClassificationLevel::Fast);

    // size exactly at threshold escalates
    let mut wib = workload(50, 0, 5.0);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.level, ClassificationLevel::Complex);

    assert_eq!(h.complex.cycles(), 1);
}

#[test]
fn test_nan_overhead_never_escalates() {
    let h = harness();
    let mut wib = workload(80, 0, f64::NAN);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.level, ClassificationLevel::Fast);
    assert_eq!(h.complex.cycles(), 0);
}

#[test]
fn test_complex_tier_owns_later_cycles() {
    let h = harness();
    let mut wib = workload(60, 0, 3.0);

    h.classifier.classify(&mut wib);
    h.classifier.classify(&mut wib);
    h.classifier.classify(&mut wib);

    assert_eq!(h.complex.cycles(), 3);
    assert_eq!(h.inputs.index_calls(), 0);
    assert_eq!(wib.cycles(), 3);
    let escalations = h
        .sink
        .events()
        .iter()
        .filter(|e| matches!(e, ClassificationEvent::Escalated { .. }))
        .count();
    assert_eq!(escalations, 1);
}

#[test]
fn test_threshold_never_grows() {
    let h = harness();
    let mut wib = workload(5, 10, 0.0);
    let mut thresholds = Vec::new();

    for frequency in [10, 20, 5, 0, 8] {
        wib.series.set_frequency(frequency);
        h.classifier.classify(&mut wib);
        thresholds.push(wib.setting.size_threshold_fast());
    }

    assert_eq!(thresholds, vec![30, 30, 15, 15, 15]);
    assert!(thresholds.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn test_unknown_frequency_keeps_configured_threshold() {
    let h = harness();
    let mut wib = workload(5, 0, 0.0);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.size_threshold_fast(), 50);
}

// =========================================================================
// Strategy selection
// =========================================================================

#[test]
fn test_intermittent_demand_selects_croston() {
    let h = harness();
    // noisy enough to smooth, but zero rate wins first
    h.inputs.set(
        IndexVector {
            zero_value_rate: 0.4,
            ..noisy_indices()
        },
        MaseMetric::default(),
    );
    let mut wib = workload(20, 0, 0.0);
    let before = wib.series.clone();

    h.classifier.classify(&mut wib);

    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Croston, ForecastStrategy::Inactive)
    );
    assert_eq!(wib.series, before);
    assert_eq!(wib.setting.last_smoothed_point(), 0);
    assert_eq!(smoothed_count(&h.sink.events()), 0);
    assert_eq!(wib.setting.level, ClassificationLevel::Fast);
    assert_eq!(h.complex.cycles(), 0);
}

#[test]
fn test_zero_rate_beats_cubic_spline() {
    let h = harness();
    h.inputs.set(
        IndexVector {
            zero_value_rate: 0.26,
            ..cs_indices()
        },
        MaseMetric::default(),
    );
    let mut wib = workload(20, 0, 0.0);
    h.classifier.classify(&mut wib);

    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Croston, ForecastStrategy::Inactive)
    );
}

#[test]
fn test_cubic_spline_without_history() {
    let h = harness();
    h.inputs.set(cs_indices(), MaseMetric::default());
    let mut wib = workload(20, 0, 0.0);

    h.classifier.classify(&mut wib);

    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::CubicSpline, ForecastStrategy::Ses)
    );
    assert!(h.sink.events().iter().any(|e| matches!(
        e,
        ClassificationEvent::StrategiesSelected {
            reason: SelectionReason::CubicSplineEligible,
            ..
        }
    )));
}

#[test]
fn test_implausible_cubic_spline_falls_back() {
    let h = harness();
    h.inputs.set(cs_indices(), observed1(1.5));
    let mut wib = workload(20, 0, 0.0);
    wib.record_results(
        Some(ForecastResult::new(ForecastStrategy::CubicSpline, false)),
        Some(ForecastResult::new(ForecastStrategy::Ses, true)),
    );

    h.classifier.classify(&mut wib);

    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Arima101, ForecastStrategy::Ses)
    );
    assert_eq!(wib.mase, observed1(1.5));
}

#[test]
fn test_cubic_spline_kept_unless_all_rejection_conditions_hold() {
    let cases = [
        // plausible result
        (ForecastResult::new(ForecastStrategy::CubicSpline, true), observed1(1.5)),
        // error within bound
        (ForecastResult::new(ForecastStrategy::CubicSpline, false), observed1(1.0)),
        // different strategy produced the result
        (ForecastResult::new(ForecastStrategy::Ses, false), observed1(1.5)),
        // only an estimate, no observed error
        (
            ForecastResult::new(ForecastStrategy::CubicSpline, false),
            MaseMetric::new(SlotAccuracy::new(Some(3.0), None), SlotAccuracy::default()),
        ),
    ];

    for (result, metric) in cases {
        let h = harness();
        h.inputs.set(cs_indices(), metric);
        let mut wib = workload(20, 0, 0.0);
        wib.record_results(Some(result), None);

        h.classifier.classify(&mut wib);

        assert_eq!(
            wib.setting.strategies(),
            (ForecastStrategy::CubicSpline, ForecastStrategy::Ses),
            "case {result:?} / {metric:?}"
        );
    }
}

#[test]
fn test_default_fallback_deactivates_only_after_first_cycle() {
    let h = harness();
    // slot 2 clearly worse
    h.inputs.set(
        IndexVector::default(),
        MaseMetric::new(
            SlotAccuracy::new(Some(0.6), Some(0.7)),
            SlotAccuracy::new(Some(0.9), Some(1.8)),
        ),
    );
    let mut wib = workload(20, 0, 0.0);

    h.classifier.classify(&mut wib);
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Arima101, ForecastStrategy::Ses)
    );

    h.classifier.classify(&mut wib);
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Arima101, ForecastStrategy::Inactive)
    );
}

#[test]
fn test_fallback_is_deterministic() {
    let run = || {
        let h = harness();
        h.inputs.set(
            noisy_indices(),
            MaseMetric::new(
                SlotAccuracy::new(Some(1.2), None),
                SlotAccuracy::new(Some(0.4), None),
            ),
        );
        let mut wib = workload(30, 4, 0.0);
        for _ in 0..4 {
            wib.series.extend_from_slice(&[3.0, 1.0, 4.0, 1.0]);
            h.classifier.classify(&mut wib);
        }
        (wib.setting.strategies(), wib.series.clone(), h.sink.events())
    };

    assert_eq!(run(), run());
}

#[test]
fn test_fixed_strategy_refreshes_indices_only() {
    let h = harness();
    h.inputs.set(
        IndexVector {
            zero_value_rate: 0.9,
            ..noisy_indices()
        },
        MaseMetric::default(),
    );
    let mut wib = WorkloadIntensityBehavior::new(
        "pinned",
        TimeSeries::new(vec![0.0; 20], 0),
        ForecastObjectives::new(4, 32, 0.0),
        Duration::from_secs(60),
        ClassificationConfig::default().with_fixed_strategy(true),
    );
    wib.setting
        .select(ForecastStrategy::Ets, ForecastStrategy::Naive);

    h.classifier.classify(&mut wib);

    assert_eq!(wib.setting.indices.map(|i| i.zero_value_rate), Some(0.9));
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Ets, ForecastStrategy::Naive)
    );
    assert_eq!(wib.series.size(), 20);
    assert_eq!(smoothed_count(&h.sink.events()), 0);
}

#[test]
fn test_indices_use_smoothing_window() {
    let h = harness();
    let mut wib = WorkloadIntensityBehavior::new(
        "window",
        TimeSeries::new(vec![1.0; 20], 0),
        ForecastObjectives::new(4, 32, 0.0),
        Duration::from_secs(60),
        ClassificationConfig::default().with_last_x_values(5),
    );
    h.classifier.classify(&mut wib);
    h.classifier.classify(&mut wib);
    assert_eq!(h.inputs.windows(), vec![5, 5]);
}

// =========================================================================
// Smoothing
// =========================================================================

#[test]
fn test_smoothing_once_per_window_of_new_data() {
    let h = harness();
    h.inputs.set(noisy_indices(), MaseMetric::default());
    let mut wib = workload(12, 0, 0.0);

    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.size(), 4);
    assert_eq!(wib.series.skipped_values(), 8);
    assert_eq!(wib.setting.last_smoothed_point(), 12);
    // smoothing is advisory, selection still happens
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::Arima101, ForecastStrategy::Ses)
    );

    // no new observations: no re-smoothing
    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.size(), 4);
    assert_eq!(smoothed_count(&h.sink.events()), 1);

    // exactly one window of new data is not enough
    wib.series.extend_from_slice(&[5.0, 6.0, 7.0]);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.size(), 7);
    assert_eq!(smoothed_count(&h.sink.events()), 1);

    let first_pass = wib.series.smoothed_values().to_vec();
    wib.series.push(8.0);
    h.classifier.classify(&mut wib);
    // earlier aggregates stay, the four new observations fold into two
    assert_eq!(wib.series.smoothed_values()[..4], first_pass[..]);
    assert_eq!(&wib.series.values()[4..], &[6.0, 8.0]);
    assert_eq!(wib.series.position(), 16);
    assert_eq!(wib.setting.last_smoothed_point(), 16);
    assert_eq!(smoothed_count(&h.sink.events()), 2);
}

#[test]
fn test_smoothing_never_mixes_aggregates_with_new_observations() {
    let h = harness();
    h.inputs.set(noisy_indices(), MaseMetric::default());
    let mut wib = WorkloadIntensityBehavior::new(
        "wl-smooth",
        TimeSeries::new((1..=12).map(f64::from).collect(), 0),
        ForecastObjectives::new(4, 32, 0.0),
        Duration::from_secs(60),
        ClassificationConfig::default(),
    );

    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.values(), &[2.0, 5.0, 8.0, 11.0]);

    wib.series.extend_from_slice(&[100.0; 4]);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.values(), &[2.0, 5.0, 8.0, 11.0, 100.0, 100.0]);
    assert_eq!(wib.series.skipped_values(), 10);
    assert_eq!(wib.series.position(), 16);
}

#[test]
fn test_two_votes_do_not_smooth() {
    let h = harness();
    h.inputs.set(
        IndexVector {
            quartile_dispersion: 0.9,
            variance_coefficient: 0.9,
            burstiness: 0.2,
            relative_monotonicity: 0.6,
            ..Default::default()
        },
        MaseMetric::default(),
    );
    let mut wib = workload(12, 0, 0.0);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.size(), 12);
    assert_eq!(smoothed_count(&h.sink.events()), 0);
}

#[test]
fn test_short_series_skips_window_tests() {
    let h = harness();
    let mut wib = workload(2, 0, 0.0);

    h.inputs.set(noisy_indices(), MaseMetric::default());
    h.classifier.classify(&mut wib);
    assert_eq!(wib.series.size(), 2);
    assert_eq!(smoothed_count(&h.sink.events()), 0);

    h.inputs.set(cs_indices(), MaseMetric::default());
    h.classifier.classify(&mut wib);
    assert_eq!(
        wib.setting.strategies().0,
        ForecastStrategy::Arima101,
        "cubic spline needs a full window"
    );
}

#[test]
fn test_non_finite_indices_are_reported_and_ignored() {
    let h = harness();
    h.inputs.set(
        IndexVector {
            zero_value_rate: f64::NAN,
            relative_gradient: f64::INFINITY,
            ..cs_indices()
        },
        MaseMetric::default(),
    );
    let mut wib = workload(20, 0, 0.0);
    h.classifier.classify(&mut wib);

    // infinite gradient still satisfies >=, NaN zero rate never fires
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::CubicSpline, ForecastStrategy::Ses)
    );
    assert!(h
        .sink
        .events()
        .iter()
        .any(|e| matches!(e, ClassificationEvent::NonFiniteIndices { .. })));
}

// =========================================================================
// Activation
// =========================================================================

#[test]
fn test_activation_calibrates_then_classifies() {
    let h = harness();
    h.inputs.set(cs_indices(), MaseMetric::default());
    let mut wib = workload(20, 0, 0.0);

    h.classifier.activate(&mut wib);

    assert_eq!(wib.objectives.recent_horizon, 8);
    assert_eq!(wib.period, Duration::from_secs(120));
    assert_eq!(wib.cycles(), 1);
    assert_eq!(
        wib.setting.strategies(),
        (ForecastStrategy::CubicSpline, ForecastStrategy::Ses)
    );
    assert!(matches!(
        h.sink.events().first(),
        Some(ClassificationEvent::HorizonCalibrated {
            recent_horizon: 8,
            clamped: false,
            ..
        })
    ));
}

#[test]
fn test_reactivation_returns_workload_to_fast_tier() {
    let h = harness();
    let mut wib = workload(60, 0, 3.0);
    h.classifier.classify(&mut wib);
    assert_eq!(wib.setting.level, ClassificationLevel::Complex);

    // overhead dropped; re-entering the Fast tier recalibrates and reclassifies
    wib.objectives.overhead = 0.0;
    h.classifier.activate(&mut wib);

    assert_eq!(wib.setting.level, ClassificationLevel::Fast);
    assert_eq!(wib.objectives.recent_horizon, 8);
    assert_eq!(h.complex.cycles(), 1);
    assert_eq!(h.inputs.index_calls(), 1);
}
