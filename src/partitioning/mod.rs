//! Partitioning module for mapping keys onto ring tokens.
//!
//! Two strategies are supported, mirroring Cassandra's partitioners:
//! - **Uniform hash** (`Murmur3Partitioner`): Murmur3 of the key, a signed
//!   64-bit token scattered evenly over the whole range
//! - **Order preserving** (`ByteOrderedPartitioner`): the key bytes read as
//!   an unbounded unsigned integer, rendered as lowercase hex
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  key bytes ──► Partitioner::derive_token ──► Token           │
//! │                                                ├─ partitioner│
//! │                                                ├─ value()    │
//! │                                                └─ to_string()│
//! │                                                      │       │
//! │  decode(partitioner, text) ◄─────────────────────────┘       │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  NumericValue::Signed(i64) | NumericValue::Unsigned(BigUint) │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use ringtoken::partitioning::{decode, Partitioner};
//!
//! let token = Partitioner::OrderPreserving.derive_token(b"key-96");
//! assert_eq!(token.to_string(), "6b65792d3936");
//!
//! let value = decode(Partitioner::OrderPreserving, &token.to_string()).unwrap();
//! assert_eq!(value, token.value());
//! ```

mod decoder;
pub mod murmur3;
mod partitioner;
mod token;

pub use decoder::decode;
pub use partitioner::Partitioner;
pub use token::Token;
