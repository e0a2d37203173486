//! Mutex-guarded statistics for parallel producers.

use super::{SampleStatistics, StrategySummary};
use crate::error::{self, StatsError};
use crate::numeric::NumericValue;
use crate::partitioning::Partitioner;
use parking_lot::Mutex;

/// [`SampleStatistics`] behind a mutex.
///
/// Every update takes the lock, so updates from different threads are
/// serialized. Sums are order independent; if the caller needs per-index
/// ordering it must keep that itself.
#[derive(Debug)]
pub struct SharedStatistics {
    inner: Mutex<SampleStatistics>,
}

impl SharedStatistics {
    pub fn new(partitioner: Partitioner) -> Self {
        Self::from_statistics(SampleStatistics::new(partitioner))
    }

    pub fn from_statistics(stats: SampleStatistics) -> Self {
        Self {
            inner: Mutex::new(stats),
        }
    }

    pub fn accumulate(&self, value: &NumericValue) -> Result<(), StatsError> {
        self.inner.lock().accumulate(value)
    }

    pub fn ingest(&self, text: &str) -> error::Result<NumericValue> {
        self.inner.lock().ingest(text)
    }

    pub fn record_skipped(&self) {
        self.inner.lock().record_skipped();
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SampleStatistics {
        self.inner.lock().clone()
    }

    pub fn summary(&self) -> StrategySummary {
        self.inner.lock().summary()
    }

    pub fn into_inner(self) -> SampleStatistics {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SampleSum;

    #[test]
    fn test_parallel_ingest() {
        let shared = SharedStatistics::new(Partitioner::UniformHash);

        std::thread::scope(|s| {
            for t in 0..4 {
                let shared = &shared;
                s.spawn(move || {
                    for i in 0..250 {
                        let key = format!("key-{}", t * 250 + i);
                        let token = Partitioner::UniformHash.derive_token(key.as_bytes());
                        shared.ingest(&token.to_string()).unwrap();
                    }
                });
            }
        });

        let mut sequential = SampleStatistics::new(Partitioner::UniformHash);
        for i in 0..1000 {
            let key = format!("key-{}", i);
            let token = Partitioner::UniformHash.derive_token(key.as_bytes());
            sequential.accumulate(&token.value()).unwrap();
        }

        let stats = shared.into_inner();
        assert_eq!(stats.count(), 1000);
        assert_eq!(stats.sum(), sequential.sum());
        assert_eq!(stats.min(), sequential.min());
        assert_eq!(stats.max(), sequential.max());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedStatistics::new(Partitioner::OrderPreserving);
        shared.ingest("01").unwrap();
        let snapshot = shared.snapshot();
        shared.ingest("02").unwrap();
        shared.record_skipped();

        assert_eq!(snapshot.count(), 1);
        let stats = shared.into_inner();
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.skipped(), 1);
        assert!(matches!(stats.sum(), SampleSum::Unsigned(_)));
    }
}
