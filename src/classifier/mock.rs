//! Scripted collaborators for tests and scenario replay.
//!
//! Index and MASE computation live outside this crate. These stand-ins return
//! whatever was last scripted, so a cycle can be driven with exactly the inputs
//! a scenario describes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::collaborators::{
    Collaborators, ComplexClassifier, ForecastQuality, IndexCalculator,
};
use super::events::EventSink;
use super::indices::IndexVector;
use super::quality::MaseMetric;
use super::workload::WorkloadIntensityBehavior;

/// Returns the scripted index vector and MASE metric.
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    indices: Mutex<IndexVector>,
    mase: Mutex<MaseMetric>,
    /// Window sizes requested by the classifier, in call order
    windows: Mutex<Vec<usize>>,
}

impl ScriptedInputs {
    pub fn new(indices: IndexVector, mase: MaseMetric) -> Self {
        Self {
            indices: Mutex::new(indices),
            mase: Mutex::new(mase),
            windows: Mutex::new(Vec::new()),
        }
    }

    /// Script the inputs of the next cycle.
    pub fn set(&self, indices: IndexVector, mase: MaseMetric) {
        if let Ok(mut current) = self.indices.lock() {
            *current = indices;
        }
        if let Ok(mut current) = self.mase.lock() {
            *current = mase;
        }
    }

    /// Number of index computations requested so far.
    pub fn index_calls(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or_default()
    }

    /// Window sizes requested so far.
    pub fn windows(&self) -> Vec<usize> {
        self.windows.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl IndexCalculator for ScriptedInputs {
    fn compute_indices(&self, _wib: &WorkloadIntensityBehavior, window: usize) -> IndexVector {
        if let Ok(mut windows) = self.windows.lock() {
            windows.push(window);
        }
        self.indices.lock().map(|i| *i).unwrap_or_default()
    }
}

impl ForecastQuality for ScriptedInputs {
    fn compute_quality(&self, _wib: &WorkloadIntensityBehavior) -> MaseMetric {
        self.mase.lock().map(|m| *m).unwrap_or_default()
    }
}

/// Complex tier stand-in that only counts its cycles.
#[derive(Debug, Default)]
pub struct CountingComplex {
    cycles: AtomicU64,
}

impl CountingComplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }
}

impl ComplexClassifier for CountingComplex {
    fn classify(&self, _wib: &mut WorkloadIntensityBehavior) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }
}

/// Wire scripted inputs, a counting Complex tier and `sink` together with the
/// reference smoother and comparator.
pub fn scripted_collaborators(
    inputs: Arc<ScriptedInputs>,
    complex: Arc<CountingComplex>,
    sink: Arc<dyn EventSink>,
) -> Collaborators {
    Collaborators::new(inputs.clone(), inputs, complex).with_sink(sink)
}
