//! Structured classification events and the sinks that receive them.
//!
//! The decision procedure never logs directly. It emits a
//! [`ClassificationEvent`] through an injected [`EventSink`]; the default
//! [`TracingSink`] turns events into `tracing` records under
//! [`targets::CLASSIFIER`](crate::infra::logging::targets::CLASSIFIER).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::indices::IndexVector;
use super::strategy::{ClassificationLevel, ForecastStrategy};
use super::workload::WorkloadId;
use crate::infra::logging::targets;

/// Why a pair of strategies was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// Zero-value rate above threshold
    IntermittentDemand,
    /// Smooth, monotone, low-burst series
    CubicSplineEligible,
    /// Cubic spline produced an implausible, inaccurate forecast
    CubicSplineRejected,
    /// No heuristic applied
    DefaultFallback,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionReason::IntermittentDemand => "intermittent_demand",
            SelectionReason::CubicSplineEligible => "cubic_spline_eligible",
            SelectionReason::CubicSplineRejected => "cubic_spline_rejected",
            SelectionReason::DefaultFallback => "default_fallback",
        }
    }
}

/// Something the classifier decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClassificationEvent {
    HorizonCalibrated {
        workload: WorkloadId,
        recent_horizon: u32,
        #[serde(with = "duration_ms")]
        period: Duration,
        clamped: bool,
    },
    ThresholdTightened {
        workload: WorkloadId,
        from: usize,
        to: usize,
    },
    Escalated {
        workload: WorkloadId,
        size: usize,
        overhead: f64,
    },
    NonFiniteIndices {
        workload: WorkloadId,
        indices: IndexVector,
    },
    Smoothed {
        workload: WorkloadId,
        position: usize,
        retained: usize,
    },
    StrategiesSelected {
        workload: WorkloadId,
        slot1: ForecastStrategy,
        slot2: ForecastStrategy,
        reason: SelectionReason,
    },
    Classified {
        workload: WorkloadId,
        level: ClassificationLevel,
    },
}

impl ClassificationEvent {
    pub fn workload(&self) -> &WorkloadId {
        match self {
            ClassificationEvent::HorizonCalibrated { workload, .. }
            | ClassificationEvent::ThresholdTightened { workload, .. }
            | ClassificationEvent::Escalated { workload, .. }
            | ClassificationEvent::NonFiniteIndices { workload, .. }
            | ClassificationEvent::Smoothed { workload, .. }
            | ClassificationEvent::StrategiesSelected { workload, .. }
            | ClassificationEvent::Classified { workload, .. } => workload,
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(super::millis(*d))
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Receives classification events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ClassificationEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &ClassificationEvent) {
        (**self).emit(event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ClassificationEvent) {
        match event {
            ClassificationEvent::HorizonCalibrated {
                workload,
                recent_horizon,
                period,
                clamped,
            } => debug!(
                target: targets::CLASSIFIER,
                workload = %workload,
                recent_horizon,
                period_ms = millis(*period),
                clamped,
                "Horizon calibrated"
            ),
            ClassificationEvent::ThresholdTightened { workload, from, to } => debug!(
                target: targets::CLASSIFIER,
                workload = %workload,
                from,
                to,
                "Size threshold tightened"
            ),
            ClassificationEvent::Escalated {
                workload,
                size,
                overhead,
            } => info!(
                target: targets::CLASSIFIER,
                workload = %workload,
                size,
                overhead = %format!("{:.3}", overhead),
                "Escalating to complex tier"
            ),
            ClassificationEvent::NonFiniteIndices { workload, indices } => warn!(
                target: targets::CLASSIFIER,
                workload = %workload,
                indices = ?indices,
                "Non-finite index values, affected tests will not fire"
            ),
            ClassificationEvent::Smoothed {
                workload,
                position,
                retained,
            } => info!(
                target: targets::CLASSIFIER,
                workload = %workload,
                position,
                retained,
                "Time series smoothed due to high variance and burstiness"
            ),
            ClassificationEvent::StrategiesSelected {
                workload,
                slot1,
                slot2,
                reason,
            } => debug!(
                target: targets::CLASSIFIER,
                workload = %workload,
                slot1 = slot1.name(),
                slot2 = slot2.name(),
                reason = reason.as_str(),
                "Strategies selected"
            ),
            ClassificationEvent::Classified { workload, level } => info!(
                target: targets::CLASSIFIER,
                workload = %workload,
                level = level.as_str(),
                "Workload classified"
            ),
        }
    }
}

/// Keeps every event in memory. Used by tests and the replay tool.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ClassificationEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<ClassificationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Remove and return the recorded events.
    pub fn drain(&self) -> Vec<ClassificationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ClassificationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Sends every event to two sinks.
pub struct Tee<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn emit(&self, event: &ClassificationEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
