//! Configuration types for a sampling run.

use crate::error::{Error, Result};
use crate::partitioning::Partitioner;
use crate::stats::DEFAULT_AVERAGE_SCALE;
use serde::{Deserialize, Serialize};

/// Largest number of fractional digits an exact average may keep.
pub const MAX_AVERAGE_SCALE: u32 = 64;

/// Where sample keys come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySource {
    /// `<prefix><index>` for each index in the configured range.
    #[default]
    Sequential,

    /// Seeded pseudo-random keys of a fixed length. The same seed always
    /// yields the same keys in the same order.
    Random { seed: u64, key_len: usize },
}

/// Main configuration for a token sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Prefix of sequential keys.
    pub key_prefix: String,

    /// First key index.
    pub start: u64,

    /// Number of keys to sample.
    pub sample_size: u64,

    /// Strategies to derive tokens with, in reporting order.
    pub partitioners: Vec<Partitioner>,

    /// Fractional digits kept by exact averages.
    pub average_scale: u32,

    /// Key generator.
    pub key_source: KeySource,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            key_prefix: "key-".to_string(),
            start: 0,
            sample_size: 100,
            partitioners: Partitioner::ALL.to_vec(),
            average_scale: DEFAULT_AVERAGE_SCALE,
            key_source: KeySource::Sequential,
        }
    }
}

impl SamplingConfig {
    /// Create a configuration sampling `sample_size` sequential keys.
    pub fn new(sample_size: u64) -> Self {
        Self {
            sample_size,
            ..Default::default()
        }
    }

    /// Set the sequential key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the first key index.
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Set the number of keys.
    pub fn with_sample_size(mut self, sample_size: u64) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the strategies to run. Duplicates are dropped, first wins.
    pub fn with_partitioners(mut self, partitioners: impl IntoIterator<Item = Partitioner>) -> Self {
        self.partitioners.clear();
        for p in partitioners {
            if !self.partitioners.contains(&p) {
                self.partitioners.push(p);
            }
        }
        self
    }

    /// Set the fractional digits of exact averages.
    pub fn with_average_scale(mut self, scale: u32) -> Self {
        self.average_scale = scale;
        self
    }

    /// Use seeded random keys of `key_len` bytes.
    pub fn with_random_keys(mut self, seed: u64, key_len: usize) -> Self {
        self.key_source = KeySource::Random { seed, key_len };
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::Config("sample_size must be > 0".to_string()));
        }

        if self.start.checked_add(self.sample_size).is_none() {
            return Err(Error::Config(format!(
                "key range {}..{}+{} overflows",
                self.start, self.start, self.sample_size
            )));
        }

        if self.partitioners.is_empty() {
            return Err(Error::Config("at least one partitioner is required".to_string()));
        }

        if self.average_scale > MAX_AVERAGE_SCALE {
            return Err(Error::Config(format!(
                "average_scale must be <= {}, got {}",
                MAX_AVERAGE_SCALE, self.average_scale
            )));
        }

        if let KeySource::Random { key_len: 0, .. } = self.key_source {
            return Err(Error::Config("random key_len must be > 0".to_string()));
        }

        Ok(())
    }
}
