//! Testing utilities for token sampling.
//!
//! This module provides helpers shared by the crate's scenario tests and
//! usable by downstream code:
//! - [`RecordingObserver`] keeps every observation handed to it
//! - [`reference_keys`] builds the `key-0 .. key-<n-1>` sample
//!
//! # Example
//!
//! ```rust
//! use ringtoken::config::SamplingConfig;
//! use ringtoken::sampling::TokenSampler;
//! use ringtoken::testing::RecordingObserver;
//!
//! let sampler = TokenSampler::new(SamplingConfig::new(3)).unwrap();
//! let mut recorder = RecordingObserver::default();
//! sampler.run_with_observer(&mut recorder).unwrap();
//!
//! assert_eq!(recorder.observations().len(), 6);
//! ```

mod property_tests;

use crate::partitioning::Partitioner;
use crate::sampling::SampleObserver;
use crate::types::TokenObservation;

/// Observer that records every observation in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    observations: Vec<TokenObservation>,
}

impl RecordingObserver {
    pub fn observations(&self) -> &[TokenObservation] {
        &self.observations
    }

    /// Observations made by one partitioner, in arrival order.
    pub fn for_partitioner(&self, partitioner: Partitioner) -> Vec<&TokenObservation> {
        self.observations
            .iter()
            .filter(|o| o.partitioner == partitioner)
            .collect()
    }

    /// Canonical texts produced by one partitioner, in arrival order.
    pub fn texts(&self, partitioner: Partitioner) -> Vec<String> {
        self.for_partitioner(partitioner)
            .into_iter()
            .map(|o| o.text.clone())
            .collect()
    }
}

impl SampleObserver for RecordingObserver {
    fn observe(&mut self, observation: &TokenObservation) {
        self.observations.push(observation.clone());
    }
}

/// Keys `key-0` through `key-<n-1>`.
pub fn reference_keys(n: u64) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("key-{}", i).into_bytes()).collect()
}
