//! Workload registry with per-workload mutual exclusion.
//!
//! Each workload sits behind its own mutex, so at most one classification
//! cycle runs per workload. Cycles of different workloads share nothing and
//! run in parallel on the rayon pool.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::prelude::*;
use tracing::warn;

use super::tier::Classifier;
use super::workload::{WorkloadId, WorkloadIntensityBehavior};
use crate::errors::{Error, Result};
use crate::infra::logging::targets;

type Slot = Arc<Mutex<WorkloadIntensityBehavior>>;

/// Owns monitored workloads and runs their classification cycles.
#[derive(Debug)]
pub struct WorkloadRegistry {
    classifier: Classifier,
    workloads: RwLock<HashMap<WorkloadId, Slot>>,
}

impl WorkloadRegistry {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            workloads: RwLock::new(HashMap::new()),
        }
    }

    /// Register a workload and activate it in the Fast tier.
    ///
    /// The activation cycle runs without any registry lock held.
    pub fn register(&self, mut wib: WorkloadIntensityBehavior) -> Result<()> {
        let id = wib.id().clone();
        if self.read_map().contains_key(&id) {
            return Err(Error::DuplicateWorkload(id));
        }

        self.classifier.activate(&mut wib);

        match self.write_map().entry(id) {
            Entry::Occupied(entry) => Err(Error::DuplicateWorkload(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(wib)));
                Ok(())
            }
        }
    }

    /// Remove a workload, returning its final state.
    pub fn remove(&self, id: &WorkloadId) -> Result<WorkloadIntensityBehavior> {
        let slot = self
            .write_map()
            .remove(id)
            .ok_or_else(|| Error::UnknownWorkload(id.clone()))?;
        let wib = slot
            .lock()
            .map_err(|_| Error::WorkloadPoisoned(id.clone()))?
            .clone();
        Ok(wib)
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-assign a workload to the Fast tier.
    pub fn activate(&self, id: &WorkloadId) -> Result<()> {
        self.with_workload(id, |classifier, wib| classifier.activate(wib))
    }

    /// Run one classification cycle for a workload.
    pub fn classify(&self, id: &WorkloadId) -> Result<()> {
        self.with_workload(id, |classifier, wib| classifier.classify(wib))
    }

    /// Run one cycle for every registered workload, in parallel.
    ///
    /// Returns the ids whose lock was poisoned by an earlier panic.
    pub fn classify_all(&self) -> Vec<WorkloadId> {
        let slots: Vec<(WorkloadId, Slot)> = self
            .read_map()
            .iter()
            .map(|(id, slot)| (id.clone(), Arc::clone(slot)))
            .collect();

        slots
            .par_iter()
            .filter_map(|(id, slot)| match slot.lock() {
                Ok(mut wib) => {
                    self.classifier.classify(&mut wib);
                    None
                }
                Err(_) => {
                    warn!(target: targets::REGISTRY, workload = %id, "Skipping poisoned workload");
                    Some(id.clone())
                }
            })
            .collect()
    }

    /// Mutate a workload between cycles, e.g. to append observations.
    pub fn update<R>(
        &self,
        id: &WorkloadId,
        f: impl FnOnce(&mut WorkloadIntensityBehavior) -> R,
    ) -> Result<R> {
        self.with_workload(id, |_, wib| f(wib))
    }

    /// Copy of a workload's current state.
    pub fn snapshot(&self, id: &WorkloadId) -> Result<WorkloadIntensityBehavior> {
        self.with_workload(id, |_, wib| wib.clone())
    }

    fn with_workload<R>(
        &self,
        id: &WorkloadId,
        f: impl FnOnce(&Classifier, &mut WorkloadIntensityBehavior) -> R,
    ) -> Result<R> {
        let slot = self
            .read_map()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownWorkload(id.clone()))?;
        let mut wib = slot
            .lock()
            .map_err(|_| Error::WorkloadPoisoned(id.clone()))?;
        Ok(f(&self.classifier, &mut wib))
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<WorkloadId, Slot>> {
        self.workloads
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<WorkloadId, Slot>> {
        self.workloads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
