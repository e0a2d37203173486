//! Token partitioning for distributed hash-table rings.
//!
//! This crate maps keys onto ring tokens and aggregates them:
//! - **Uniform hash** tokens: Murmur3, signed 64-bit, evenly scattered
//! - **Order preserving** tokens: the key bytes as an unbounded integer
//! - **Decoding** of canonical token text, always under an explicit
//!   partitioner
//! - **Statistics** over a key sample with overflow-free sums and
//!   domain-correct averages
//!
//! # Example
//!
//! ```rust
//! use ringtoken::{Partitioner, SampleStatistics};
//!
//! let mut stats = SampleStatistics::new(Partitioner::OrderPreserving);
//! for i in 0..100 {
//!     let token = Partitioner::OrderPreserving.derive_token(format!("key-{}", i).as_bytes());
//!     stats.ingest(&token.to_string()).unwrap();
//! }
//!
//! assert_eq!(stats.count(), 100);
//! assert_eq!(stats.average().unwrap().to_string(), "106321338381415.7000");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────┐   ┌──────────────────┐
//! │ KeySample  │──►│ Partitioner  │──►│ decode()    │──►│ SampleStatistics │
//! │ (keys)     │   │ derive_token │   │ text → value│   │ sum / average    │
//! └────────────┘   └──────┬───────┘   └─────────────┘   └────────┬─────────┘
//!                         │                                      │
//!                         ▼                                      ▼
//!                  SampleObserver                          SampleReport
//! ```
//!
//! # Numeric domains
//!
//! - Uniform-hash values are `i64`; sums are `i128`; averages are `f64`
//!   approximations
//! - Order-preserving values are `BigUint`; sums are `BigUint`; averages
//!   are exact decimals with a fixed number of fractional digits
//!
//! Values from the two domains are never mixed. Accumulating a value of the
//! wrong domain is an error.

pub mod config;
pub mod error;
pub mod metrics;
pub mod numeric;
pub mod partitioning;
pub mod sampling;
pub mod stats;
pub mod testing;
pub mod types;

// Re-export main types for convenience
pub use config::{KeySource, SamplingConfig};
pub use error::{DecodeError, Error, Result, StatsError};
pub use numeric::{ExactDecimal, NumericValue};
pub use partitioning::{decode, Partitioner, Token};
pub use sampling::{KeySample, NullObserver, SampleObserver, SampleReport, TokenSampler};
pub use stats::{SampleStatistics, SampleSum, SharedStatistics, StrategySummary};
pub use types::{TokenObservation, TokenSeries};

// Re-export metrics types
pub use metrics::{SamplingMetrics, SamplingMetricsSnapshot};
