//! Sampling pipeline: keys in, per-partitioner statistics out.
//!
//! For every key, in sample order, each configured partitioner derives a
//! token. The token is handed to the observer, then its canonical text is
//! decoded and accumulated. Text that fails to decode is counted as skipped
//! and the run continues.
//!
//! ```text
//! KeySample ──► derive_token ──► SampleObserver
//!                    │
//!                    └──► decode(text) ──► SampleStatistics ──► SampleReport
//! ```

use crate::config::{KeySource, SamplingConfig};
use crate::error::{Error, Result};
use crate::metrics::SamplingMetrics;
use crate::partitioning::Partitioner;
use crate::stats::{SampleStatistics, StrategySummary};
use crate::types::{TokenObservation, TokenSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Deterministic source of `(index, key)` pairs.
#[derive(Debug, Clone)]
pub struct KeySample {
    prefix: String,
    next: u64,
    end: u64,
    random: Option<(StdRng, usize)>,
}

impl KeySample {
    /// Keys `<prefix><i>` for `i` in `start..start + count`.
    ///
    /// Fails if the index range does not fit in a `u64`.
    pub fn sequential(prefix: impl Into<String>, start: u64, count: u64) -> Result<Self> {
        let end = start.checked_add(count).ok_or_else(|| {
            Error::Config(format!("key range {}..{}+{} overflows", start, start, count))
        })?;
        Ok(Self {
            prefix: prefix.into(),
            next: start,
            end,
            random: None,
        })
    }

    /// `count` random keys of `key_len` bytes drawn from a seeded generator.
    pub fn random(seed: u64, key_len: usize, count: u64) -> Self {
        Self {
            prefix: String::new(),
            next: 0,
            end: count,
            random: Some((StdRng::seed_from_u64(seed), key_len)),
        }
    }

    /// The key sample described by `config`.
    pub fn from_config(config: &SamplingConfig) -> Result<Self> {
        match config.key_source {
            KeySource::Sequential => {
                Self::sequential(config.key_prefix.clone(), config.start, config.sample_size)
            }
            KeySource::Random { seed, key_len } => {
                Ok(Self::random(seed, key_len, config.sample_size))
            }
        }
    }
}

impl Iterator for KeySample {
    type Item = (u64, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let index = self.next;
        self.next += 1;

        let key = match &mut self.random {
            Some((rng, key_len)) => {
                let mut key = vec![0u8; *key_len];
                rng.fill(&mut key[..]);
                key
            }
            None => format!("{}{}", self.prefix, index).into_bytes(),
        };

        Some((index, key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Receives each derived token for display or charting.
pub trait SampleObserver {
    fn observe(&mut self, observation: &TokenObservation);
}

impl<F> SampleObserver for F
where
    F: FnMut(&TokenObservation),
{
    fn observe(&mut self, observation: &TokenObservation) {
        self(observation)
    }
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SampleObserver for NullObserver {
    fn observe(&mut self, _observation: &TokenObservation) {}
}

/// Result of a sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    /// Keys fed to the partitioners.
    pub keys_sampled: u64,
    /// One entry per partitioner, in configured order.
    pub summaries: Vec<StrategySummary>,
    /// Per-index values, one series per partitioner.
    pub series: Vec<TokenSeries>,
}

impl SampleReport {
    pub fn summary(&self, partitioner: Partitioner) -> Option<&StrategySummary> {
        self.summaries.iter().find(|s| s.partitioner == partitioner)
    }

    pub fn series(&self, partitioner: Partitioner) -> Option<&TokenSeries> {
        self.series.iter().find(|s| s.partitioner == partitioner)
    }

    /// Total tokens skipped across partitioners.
    pub fn skipped(&self) -> u64 {
        self.summaries.iter().map(|s| s.skipped).sum()
    }
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} keys sampled", self.keys_sampled)?;
        for summary in &self.summaries {
            writeln!(f, "  {}", summary)?;
        }
        Ok(())
    }
}

/// Runs key samples through the configured partitioners.
#[derive(Debug)]
pub struct TokenSampler {
    config: SamplingConfig,
    metrics: Arc<SamplingMetrics>,
}

impl TokenSampler {
    /// Create a sampler, validating `config`.
    pub fn new(config: SamplingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: Arc::new(SamplingMetrics::new()),
        })
    }

    /// Report into shared metrics instead of private ones.
    pub fn with_metrics(mut self, metrics: Arc<SamplingMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<SamplingMetrics> {
        &self.metrics
    }

    /// Sample the configured keys without an observer.
    pub fn run(&self) -> Result<SampleReport> {
        self.run_with_observer(&mut NullObserver)
    }

    /// Sample the configured keys, reporting each token to `observer`.
    pub fn run_with_observer(&self, observer: &mut dyn SampleObserver) -> Result<SampleReport> {
        let keys = KeySample::from_config(&self.config)?;
        Ok(self.sample_indexed(keys, observer))
    }

    /// Sample caller-supplied keys, indexed from 0 in iteration order.
    pub fn run_keys<I, K>(&self, keys: I, observer: &mut dyn SampleObserver) -> SampleReport
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let indexed = keys.into_iter().enumerate().map(|(i, k)| (i as u64, k));
        self.sample_indexed(indexed, observer)
    }

    /// Decode and accumulate externally supplied token text for one
    /// partitioner. Malformed entries are skipped and counted.
    pub fn aggregate_texts<I, S>(&self, partitioner: Partitioner, texts: I) -> StrategySummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = SampleStatistics::with_scale(partitioner, self.config.average_scale);
        for (index, text) in texts.into_iter().enumerate() {
            self.ingest(&mut stats, index as u64, text.as_ref());
        }
        stats.summary()
    }

    fn sample_indexed<I, K>(&self, keys: I, observer: &mut dyn SampleObserver) -> SampleReport
    where
        I: IntoIterator<Item = (u64, K)>,
        K: AsRef<[u8]>,
    {
        self.metrics.record_run();
        info!(
            partitioners = ?self.config.partitioners,
            sample_size = self.config.sample_size,
            "Starting token sample"
        );

        let mut stats: Vec<SampleStatistics> = self
            .config
            .partitioners
            .iter()
            .map(|&p| SampleStatistics::with_scale(p, self.config.average_scale))
            .collect();
        let mut series: Vec<TokenSeries> = self
            .config
            .partitioners
            .iter()
            .map(|&p| TokenSeries::new(p))
            .collect();

        let mut keys_sampled = 0u64;
        for (index, key) in keys {
            keys_sampled += 1;
            for (stat, points) in stats.iter_mut().zip(series.iter_mut()) {
                let partitioner = stat.partitioner();
                let token = partitioner.derive_token(key.as_ref());
                self.metrics.record_derived(partitioner);

                let observation = TokenObservation::new(index, &token);
                debug!(index, partitioner = %partitioner, token = %observation.text, "Derived token");
                observer.observe(&observation);
                points.push(index, observation.value.clone());

                self.ingest(stat, index, &observation.text);
            }
        }

        self.metrics.record_keys_sampled(keys_sampled);

        let summaries: Vec<StrategySummary> = stats.iter().map(|s| s.summary()).collect();
        for summary in &summaries {
            info!(
                partitioner = %summary.partitioner,
                decoded = summary.decoded,
                skipped = summary.skipped,
                average = %summary.average.as_ref().map_or_else(|| "none".to_string(), |a| a.to_string()),
                "Finished token sample"
            );
        }

        SampleReport {
            keys_sampled,
            summaries,
            series,
        }
    }

    fn ingest(&self, stats: &mut SampleStatistics, index: u64, text: &str) {
        let partitioner = stats.partitioner();
        match stats.ingest(text) {
            Ok(_) => self.metrics.record_decoded(partitioner),
            Err(e) => {
                self.metrics.record_decode_failure(partitioner);
                warn!(index, partitioner = %partitioner, error = %e, "Skipping token");
            }
        }
    }
}
