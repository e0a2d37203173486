//! Running statistics over a sample of tokens.
//!
//! One [`SampleStatistics`] is kept per partitioner. Sums are widened so
//! they cannot overflow: uniform-hash values are summed in an `i128`,
//! order-preserving values in a `BigUint`.
//!
//! # Example
//!
//! ```rust
//! use ringtoken::partitioning::Partitioner;
//! use ringtoken::stats::SampleStatistics;
//!
//! let mut stats = SampleStatistics::new(Partitioner::UniformHash);
//! stats.ingest("10").unwrap();
//! stats.ingest("20").unwrap();
//! assert!(stats.ingest("not-a-number").is_err());
//!
//! assert_eq!(stats.count(), 2);
//! assert_eq!(stats.skipped(), 1);
//! assert_eq!(stats.average().unwrap().to_f64(), 15.0);
//! ```

mod shared;

pub use shared::SharedStatistics;

use crate::error::{self, StatsError};
use crate::numeric::{ExactDecimal, NumericValue};
use crate::partitioning::{decode, Partitioner};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits kept by exact decimal averages unless configured.
pub const DEFAULT_AVERAGE_SCALE: u32 = 4;

#[derive(Debug, Clone)]
enum Accumulator {
    UniformHash {
        sum: i128,
        min: Option<i64>,
        max: Option<i64>,
    },
    OrderPreserving {
        sum: BigUint,
        min: Option<BigUint>,
        max: Option<BigUint>,
    },
}

impl Accumulator {
    fn new(partitioner: Partitioner) -> Self {
        match partitioner {
            Partitioner::UniformHash => Accumulator::UniformHash {
                sum: 0,
                min: None,
                max: None,
            },
            Partitioner::OrderPreserving => Accumulator::OrderPreserving {
                sum: BigUint::default(),
                min: None,
                max: None,
            },
        }
    }
}

/// Widened running sum of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSum {
    Signed(i128),
    Unsigned(BigUint),
}

impl fmt::Display for SampleSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSum::Signed(v) => write!(f, "{}", v),
            SampleSum::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

/// Count, sum, spread and skip accounting for one partitioner.
///
/// Not synchronized. Use [`SharedStatistics`] when several threads feed
/// the same sample.
#[derive(Debug, Clone)]
pub struct SampleStatistics {
    partitioner: Partitioner,
    scale: u32,
    count: u64,
    skipped: u64,
    acc: Accumulator,
}

impl SampleStatistics {
    /// Create empty statistics using [`DEFAULT_AVERAGE_SCALE`].
    pub fn new(partitioner: Partitioner) -> Self {
        Self::with_scale(partitioner, DEFAULT_AVERAGE_SCALE)
    }

    /// Create empty statistics keeping `scale` fractional digits in exact
    /// averages.
    pub fn with_scale(partitioner: Partitioner, scale: u32) -> Self {
        Self {
            partitioner,
            scale,
            count: 0,
            skipped: 0,
            acc: Accumulator::new(partitioner),
        }
    }

    pub fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    /// Number of values accumulated.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of tokens that failed to decode.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Tokens seen, decoded or not.
    pub fn sampled(&self) -> u64 {
        self.count + self.skipped
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Add a value from this partitioner's domain.
    ///
    /// Values from another domain are rejected and leave the statistics
    /// unchanged.
    pub fn accumulate(&mut self, value: &NumericValue) -> Result<(), StatsError> {
        match (&mut self.acc, value) {
            (Accumulator::UniformHash { sum, min, max }, NumericValue::Signed(v)) => {
                *sum += i128::from(*v);
                *min = Some(min.map_or(*v, |m| m.min(*v)));
                *max = Some(max.map_or(*v, |m| m.max(*v)));
            }
            (Accumulator::OrderPreserving { sum, min, max }, NumericValue::Unsigned(v)) => {
                *sum += v;
                if min.as_ref().map_or(true, |m| v < m) {
                    *min = Some(v.clone());
                }
                if max.as_ref().map_or(true, |m| v > m) {
                    *max = Some(v.clone());
                }
            }
            (_, other) => {
                return Err(StatsError::DomainMismatch {
                    partitioner: self.partitioner,
                    found: other.domain(),
                })
            }
        }

        self.count += 1;
        Ok(())
    }

    /// Decode canonical token text and accumulate it.
    ///
    /// A decode failure is counted in [`skipped`](Self::skipped) and
    /// returned as [`Error::Decode`](crate::Error::Decode); nothing else
    /// changes.
    pub fn ingest(&mut self, text: &str) -> error::Result<NumericValue> {
        match decode(self.partitioner, text) {
            Ok(value) => self.admit(value),
            Err(e) => {
                self.skipped += 1;
                Err(e.into())
            }
        }
    }

    /// Accumulate a decoded value, counting it as skipped if rejected.
    fn admit(&mut self, value: NumericValue) -> error::Result<NumericValue> {
        match self.accumulate(&value) {
            Ok(()) => Ok(value),
            Err(e) => {
                self.skipped += 1;
                Err(e.into())
            }
        }
    }

    /// Count a token that was dropped before reaching the accumulator.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// The widened running sum.
    pub fn sum(&self) -> SampleSum {
        match &self.acc {
            Accumulator::UniformHash { sum, .. } => SampleSum::Signed(*sum),
            Accumulator::OrderPreserving { sum, .. } => SampleSum::Unsigned(sum.clone()),
        }
    }

    /// Average of the accumulated values.
    ///
    /// Uniform hash: an `f64` approximation of `sum / count`. Order
    /// preserving: the exact quotient with [`scale`](Self::scale)
    /// fractional digits, rounded half-up.
    pub fn average(&self) -> Result<NumericValue, StatsError> {
        if self.count == 0 {
            return Err(StatsError::EmptySample(self.partitioner));
        }

        match &self.acc {
            Accumulator::UniformHash { sum, .. } => {
                Ok(NumericValue::Approximate(*sum as f64 / self.count as f64))
            }
            Accumulator::OrderPreserving { sum, .. } => {
                ExactDecimal::from_ratio(sum, self.count, self.scale)
                    .map(NumericValue::Decimal)
                    .ok_or(StatsError::EmptySample(self.partitioner))
            }
        }
    }

    /// Smallest value accumulated.
    pub fn min(&self) -> Option<NumericValue> {
        match &self.acc {
            Accumulator::UniformHash { min, .. } => min.map(NumericValue::Signed),
            Accumulator::OrderPreserving { min, .. } => min.clone().map(NumericValue::Unsigned),
        }
    }

    /// Largest value accumulated.
    pub fn max(&self) -> Option<NumericValue> {
        match &self.acc {
            Accumulator::UniformHash { max, .. } => max.map(NumericValue::Signed),
            Accumulator::OrderPreserving { max, .. } => max.clone().map(NumericValue::Unsigned),
        }
    }

    /// Freeze the statistics into a report entry.
    ///
    /// An empty sample yields a summary without an average.
    pub fn summary(&self) -> StrategySummary {
        let average = match self.average() {
            Ok(avg) => Some(avg),
            Err(e) => {
                tracing::warn!(partitioner = %self.partitioner, skipped = self.skipped, error = %e, "No average for sample");
                None
            }
        };

        StrategySummary {
            partitioner: self.partitioner,
            decoded: self.count,
            skipped: self.skipped,
            average,
            min: self.min(),
            max: self.max(),
        }
    }
}

/// Final figures for one partitioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub partitioner: Partitioner,
    /// Values that made it into the average.
    pub decoded: u64,
    /// Tokens that failed to decode.
    pub skipped: u64,
    /// `None` when nothing decoded.
    pub average: Option<NumericValue>,
    pub min: Option<NumericValue>,
    pub max: Option<NumericValue>,
}

impl StrategySummary {
    pub fn sampled(&self) -> u64 {
        self.decoded + self.skipped
    }
}

impl fmt::Display for StrategySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} sampled, {} decoded, {} skipped, ",
            self.partitioner,
            self.sampled(),
            self.decoded,
            self.skipped
        )?;
        match &self.average {
            Some(avg) => write!(f, "average over {} = {}", self.decoded, avg),
            None => f.write_str("no average (empty sample)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        for p in Partitioner::ALL {
            let stats = SampleStatistics::new(p);
            assert_eq!(stats.average(), Err(StatsError::EmptySample(p)));
            assert!(stats.min().is_none());
            assert!(stats.summary().average.is_none());
        }
    }

    #[test]
    fn test_uniform_sum_does_not_overflow() {
        let mut stats = SampleStatistics::new(Partitioner::UniformHash);
        for _ in 0..4 {
            stats.accumulate(&NumericValue::Signed(i64::MAX)).unwrap();
        }

        assert_eq!(stats.sum(), SampleSum::Signed(4 * i64::MAX as i128));
        assert_eq!(
            stats.average().unwrap(),
            NumericValue::Approximate(i64::MAX as f64)
        );
    }

    #[test]
    fn test_uniform_negative_average() {
        let mut stats = SampleStatistics::new(Partitioner::UniformHash);
        stats.accumulate(&NumericValue::Signed(i64::MIN)).unwrap();
        stats.accumulate(&NumericValue::Signed(i64::MIN)).unwrap();
        stats.accumulate(&NumericValue::Signed(-2)).unwrap();

        assert_eq!(stats.sum(), SampleSum::Signed(2 * i64::MIN as i128 - 2));
        assert_eq!(stats.min(), Some(NumericValue::Signed(i64::MIN)));
        assert_eq!(stats.max(), Some(NumericValue::Signed(-2)));
        assert!(stats.average().unwrap().to_f64() < 0.0);
    }

    #[test]
    fn test_order_preserving_exact_average() {
        let mut stats = SampleStatistics::with_scale(Partitioner::OrderPreserving, 2);
        stats.accumulate(&NumericValue::Unsigned(BigUint::from(1u32))).unwrap();
        stats.accumulate(&NumericValue::Unsigned(BigUint::from(2u32))).unwrap();

        let avg = stats.average().unwrap();
        assert_eq!(avg.to_string(), "1.50");
        assert_eq!(avg.as_decimal().map(|d| d.scale()), Some(2));
    }

    #[test]
    fn test_order_preserving_min_max() {
        let mut stats = SampleStatistics::new(Partitioner::OrderPreserving);
        for v in [5u32, 1, 9, 3] {
            stats.accumulate(&NumericValue::Unsigned(BigUint::from(v))).unwrap();
        }
        assert_eq!(stats.min(), Some(NumericValue::Unsigned(BigUint::from(1u32))));
        assert_eq!(stats.max(), Some(NumericValue::Unsigned(BigUint::from(9u32))));
    }

    #[test]
    fn test_domain_mismatch_leaves_state_untouched() {
        let mut stats = SampleStatistics::new(Partitioner::UniformHash);
        stats.accumulate(&NumericValue::Signed(10)).unwrap();

        let err = stats
            .accumulate(&NumericValue::Unsigned(BigUint::from(1u32)))
            .unwrap_err();
        assert_eq!(
            err,
            StatsError::DomainMismatch {
                partitioner: Partitioner::UniformHash,
                found: "unsigned-arbitrary"
            }
        );
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.sum(), SampleSum::Signed(10));

        let mut ordered = SampleStatistics::new(Partitioner::OrderPreserving);
        assert!(ordered.accumulate(&NumericValue::Signed(1)).is_err());
        assert!(ordered.accumulate(&NumericValue::Approximate(1.0)).is_err());
        assert_eq!(ordered.count(), 0);
    }

    #[test]
    fn test_ingest_counts_skips() {
        let mut stats = SampleStatistics::new(Partitioner::OrderPreserving);
        assert!(stats.ingest("0a").is_ok());
        assert!(stats.ingest("zz").is_err());
        assert!(stats.ingest("0x0a").is_err());
        assert!(stats.ingest("14").is_ok());

        assert_eq!(stats.count(), 2);
        assert_eq!(stats.skipped(), 2);
        assert_eq!(stats.sampled(), 4);
        assert_eq!(stats.average().unwrap().to_string(), "15.0000");
    }

    #[test]
    fn test_rejected_value_counts_as_skipped() {
        let mut stats = SampleStatistics::new(Partitioner::UniformHash);
        stats.ingest("7").unwrap();

        let err = stats
            .admit(NumericValue::Unsigned(BigUint::from(7u32)))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Stats(StatsError::DomainMismatch { .. })
        ));
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.skipped(), 1);
        assert_eq!(stats.sampled(), 2);
    }

    #[test]
    fn test_ingest_decode_failure_is_decode_error() {
        let mut stats = SampleStatistics::new(Partitioner::OrderPreserving);
        let err = stats.ingest("0x0a").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Decode(crate::DecodeError::MalformedHex { position: 1, .. })
        ));
    }

    #[test]
    fn test_summary_display() {
        let mut stats = SampleStatistics::new(Partitioner::UniformHash);
        stats.ingest("4").unwrap();
        stats.ingest("-2").unwrap();
        let _ = stats.ingest("x");

        let summary = stats.summary();
        assert_eq!(summary.sampled(), 3);
        assert_eq!(
            summary.to_string(),
            "Murmur3Partitioner: 3 sampled, 2 decoded, 1 skipped, average over 2 = 1"
        );

        let empty = SampleStatistics::new(Partitioner::OrderPreserving).summary();
        assert_eq!(
            empty.to_string(),
            "ByteOrderedPartitioner: 0 sampled, 0 decoded, 0 skipped, no average (empty sample)"
        );
    }
}
