//! Metrics module for observing sampling runs.
//!
//! Counters track how many tokens were derived, decoded and skipped, per
//! partitioner. They are atomic so a single [`SamplingMetrics`] can be
//! shared by several samplers.
//!
//! # Example
//!
//! ```rust
//! use ringtoken::metrics::SamplingMetrics;
//! use ringtoken::partitioning::Partitioner;
//!
//! let metrics = SamplingMetrics::new();
//! metrics.record_derived(Partitioner::UniformHash);
//! metrics.record_decode_failure(Partitioner::UniformHash);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.tokens_derived, 1);
//! assert_eq!(snapshot.decode_failures, 1);
//! ```

mod counters;

pub use counters::{PartitionerCounter, RunCounter};

use crate::partitioning::Partitioner;
use std::fmt::Write;

/// Counters for token sampling.
#[derive(Debug)]
pub struct SamplingMetrics {
    /// Sampling runs started and keys they sampled.
    pub runs: RunCounter,
    /// Tokens derived.
    pub tokens_derived: PartitionerCounter,
    /// Tokens decoded back into values.
    pub tokens_decoded: PartitionerCounter,
    /// Tokens whose text failed to decode.
    pub decode_failures: PartitionerCounter,
}

impl SamplingMetrics {
    pub fn new() -> Self {
        Self {
            runs: RunCounter::new("ringtoken"),
            tokens_derived: PartitionerCounter::new("ringtoken_tokens_derived_total", "Tokens derived"),
            tokens_decoded: PartitionerCounter::new("ringtoken_tokens_decoded_total", "Tokens decoded"),
            decode_failures: PartitionerCounter::new(
                "ringtoken_decode_failures_total",
                "Tokens that failed to decode",
            ),
        }
    }

    pub fn record_run(&self) {
        self.runs.start_run();
    }

    pub fn record_keys_sampled(&self, keys: u64) {
        self.runs.add_keys(keys);
    }

    pub fn record_derived(&self, partitioner: Partitioner) {
        self.tokens_derived.inc(partitioner);
    }

    pub fn record_decoded(&self, partitioner: Partitioner) {
        self.tokens_decoded.inc(partitioner);
    }

    pub fn record_decode_failure(&self, partitioner: Partitioner) {
        self.decode_failures.inc(partitioner);
    }

    /// Point-in-time totals.
    pub fn snapshot(&self) -> SamplingMetricsSnapshot {
        SamplingMetricsSnapshot {
            runs: self.runs.runs(),
            keys_sampled: self.runs.keys(),
            tokens_derived: self.tokens_derived.total(),
            tokens_decoded: self.tokens_decoded.total(),
            decode_failures: self.decode_failures.total(),
        }
    }

    /// Render all counters in Prometheus text exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();

        let prefix = self.runs.prefix();
        for (suffix, help, value) in [
            ("runs_total", "Sampling runs started", self.runs.runs()),
            ("keys_sampled_total", "Keys fed to the partitioners", self.runs.keys()),
        ] {
            let _ = writeln!(out, "# HELP {}_{} {}", prefix, suffix, help);
            let _ = writeln!(out, "# TYPE {}_{} counter", prefix, suffix);
            let _ = writeln!(out, "{}_{} {}", prefix, suffix, value);
        }

        for counter in [&self.tokens_derived, &self.tokens_decoded, &self.decode_failures] {
            let _ = writeln!(out, "# HELP {} {}", counter.name(), counter.help());
            let _ = writeln!(out, "# TYPE {} counter", counter.name());
            for p in Partitioner::ALL {
                let _ = writeln!(
                    out,
                    "{}{{partitioner=\"{}\"}} {}",
                    counter.name(),
                    p.name(),
                    counter.get(p)
                );
            }
        }

        out
    }

    pub fn reset(&self) {
        self.runs.reset();
        self.tokens_derived.reset();
        self.tokens_decoded.reset();
        self.decode_failures.reset();
    }
}

impl Default for SamplingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SamplingMetrics`] summed over partitioners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingMetricsSnapshot {
    pub runs: u64,
    pub keys_sampled: u64,
    pub tokens_derived: u64,
    pub tokens_decoded: u64,
    pub decode_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let metrics = SamplingMetrics::new();
        metrics.record_run();
        metrics.record_keys_sampled(1);
        metrics.record_derived(Partitioner::UniformHash);
        metrics.record_derived(Partitioner::OrderPreserving);
        metrics.record_decoded(Partitioner::OrderPreserving);
        metrics.record_decode_failure(Partitioner::UniformHash);

        assert_eq!(
            metrics.snapshot(),
            SamplingMetricsSnapshot {
                runs: 1,
                keys_sampled: 1,
                tokens_derived: 2,
                tokens_decoded: 1,
                decode_failures: 1,
            }
        );

        metrics.reset();
        assert_eq!(metrics.snapshot(), SamplingMetricsSnapshot::default());
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = SamplingMetrics::new();
        metrics.record_derived(Partitioner::OrderPreserving);

        let text = metrics.to_prometheus();
        assert!(text.contains("# TYPE ringtoken_tokens_derived_total counter"));
        assert!(text.contains(
            "ringtoken_tokens_derived_total{partitioner=\"ByteOrderedPartitioner\"} 1"
        ));
        assert!(text.contains("ringtoken_runs_total 0"));
        assert!(text.contains("# TYPE ringtoken_keys_sampled_total counter"));
        assert!(text.contains("ringtoken_keys_sampled_total 0"));
    }
}
