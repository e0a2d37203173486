//! The two token derivation strategies.

use super::decoder;
use super::murmur3;
use super::token::Token;
use crate::error::DecodeError;
use crate::numeric::NumericValue;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strategy that maps key bytes onto a ring token.
///
/// The set of strategies is closed. Both variants are stateless, so a
/// `Partitioner` can be copied freely and used from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Partitioner {
    /// Murmur3 hash of the key, uniformly scattered over the signed 64-bit
    /// range. Token order has no relation to key order.
    UniformHash,

    /// The key bytes themselves read as a big-endian unsigned integer.
    /// Token order follows byte-lexicographic key order.
    OrderPreserving,
}

impl Partitioner {
    /// Every strategy, in reporting order.
    pub const ALL: [Partitioner; 2] = [Partitioner::UniformHash, Partitioner::OrderPreserving];

    /// Cassandra class name of the equivalent partitioner.
    pub fn name(&self) -> &'static str {
        match self {
            Partitioner::UniformHash => "Murmur3Partitioner",
            Partitioner::OrderPreserving => "ByteOrderedPartitioner",
        }
    }

    /// Derive the token for `key`. Never fails.
    pub fn derive_token(&self, key: &[u8]) -> Token {
        match self {
            Partitioner::UniformHash => Token::UniformHash(murmur3_token(key)),
            Partitioner::OrderPreserving => Token::OrderPreserving(Bytes::copy_from_slice(key)),
        }
    }

    /// The smallest token of this strategy's domain.
    pub fn min_token(&self) -> Token {
        match self {
            Partitioner::UniformHash => Token::UniformHash(i64::MIN),
            Partitioner::OrderPreserving => Token::OrderPreserving(Bytes::new()),
        }
    }

    /// Whether token order follows key order.
    pub fn preserves_order(&self) -> bool {
        matches!(self, Partitioner::OrderPreserving)
    }

    /// Decode canonical token text produced by this strategy.
    pub fn decode(&self, text: &str) -> Result<NumericValue, DecodeError> {
        decoder::decode(*self, text)
    }
}

impl fmt::Display for Partitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Partitioner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform-hash" | "uniformhash" | "murmur3" | "murmur3partitioner" => {
                Ok(Partitioner::UniformHash)
            }
            "order-preserving" | "orderpreserving" | "byte-ordered" | "byteordered"
            | "byteorderedpartitioner" => Ok(Partitioner::OrderPreserving),
            other => Err(format!("unknown partitioner: {}", other)),
        }
    }
}

/// Murmur3 token of `key`.
///
/// The empty key maps to the minimum token. A hash that lands on
/// `i64::MIN` is moved to `i64::MAX` so the minimum stays reserved.
fn murmur3_token(key: &[u8]) -> i64 {
    if key.is_empty() {
        return i64::MIN;
    }

    let [h1, _] = murmur3::hash3_x64_128(key, 0);
    match h1 as i64 {
        i64::MIN => i64::MAX,
        v => v,
    }
}
