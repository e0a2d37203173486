//! Atomic counters for sampling runs.

use crate::partitioning::Partitioner;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sampling runs and the keys they consumed.
///
/// Exported as two counters sharing a name prefix: `<prefix>_runs_total`
/// and `<prefix>_keys_sampled_total`.
#[derive(Debug)]
pub struct RunCounter {
    prefix: &'static str,
    runs: AtomicU64,
    keys: AtomicU64,
}

impl RunCounter {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            runs: AtomicU64::new(0),
            keys: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Count a run that has started.
    pub fn start_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Count keys fed to the partitioners by a run.
    pub fn add_keys(&self, keys: u64) {
        self.keys.fetch_add(keys, Ordering::Relaxed);
    }

    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn keys(&self) -> u64 {
        self.keys.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.runs.store(0, Ordering::Relaxed);
        self.keys.store(0, Ordering::Relaxed);
    }
}

/// One counter per partitioner, exported with a `partitioner` label.
#[derive(Debug)]
pub struct PartitionerCounter {
    name: &'static str,
    help: &'static str,
    values: [AtomicU64; 2],
}

impl PartitionerCounter {
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            values: [AtomicU64::new(0), AtomicU64::new(0)],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn inc(&self, partitioner: Partitioner) {
        self.slot(partitioner).fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, partitioner: Partitioner) -> u64 {
        self.slot(partitioner).load(Ordering::Relaxed)
    }

    /// Sum over all partitioners.
    pub fn total(&self) -> u64 {
        self.values.iter().map(|v| v.load(Ordering::Relaxed)).sum()
    }

    pub fn reset(&self) {
        for v in &self.values {
            v.store(0, Ordering::Relaxed);
        }
    }

    fn slot(&self, partitioner: Partitioner) -> &AtomicU64 {
        match partitioner {
            Partitioner::UniformHash => &self.values[0],
            Partitioner::OrderPreserving => &self.values[1],
        }
    }
}
