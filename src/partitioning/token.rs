//! Strategy-tagged ring tokens.

use super::decoder;
use super::partitioner::Partitioner;
use crate::error::DecodeError;
use crate::numeric::NumericValue;
use bytes::Bytes;
use num_bigint::BigUint;
use std::cmp::Ordering;
use std::fmt;

/// A position on the ring, tagged with the strategy that produced it.
///
/// Tokens are ordered only against tokens of the same strategy; comparing
/// across strategies yields `None`. `Display` renders the canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Murmur3 hash value.
    UniformHash(i64),

    /// Raw key bytes.
    OrderPreserving(Bytes),
}

impl Token {
    /// Rebuild a token from its canonical text.
    ///
    /// Order-preserving text must have an even number of digits, since
    /// each byte renders as exactly two.
    pub fn parse(partitioner: Partitioner, text: &str) -> Result<Self, DecodeError> {
        match partitioner {
            Partitioner::UniformHash => decoder::parse_signed(text).map(Token::UniformHash),
            Partitioner::OrderPreserving => {
                decoder::validate_hex(text)?;
                if text.len() % 2 != 0 {
                    return Err(DecodeError::MalformedHex {
                        text: text.to_string(),
                        position: text.len(),
                    });
                }
                let bytes = hex::decode(text).map_err(|_| DecodeError::MalformedHex {
                    text: text.to_string(),
                    position: 0,
                })?;
                Ok(Token::OrderPreserving(Bytes::from(bytes)))
            }
        }
    }

    /// The strategy that produced this token.
    pub fn partitioner(&self) -> Partitioner {
        match self {
            Token::UniformHash(_) => Partitioner::UniformHash,
            Token::OrderPreserving(_) => Partitioner::OrderPreserving,
        }
    }

    /// The token's numeric value in its own domain.
    pub fn value(&self) -> NumericValue {
        match self {
            Token::UniformHash(v) => NumericValue::Signed(*v),
            Token::OrderPreserving(bytes) => NumericValue::Unsigned(BigUint::from_bytes_be(bytes)),
        }
    }

    /// Canonical text. Same as `to_string()`.
    pub fn canonical_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::UniformHash(v) => write!(f, "{}", v),
            Token::OrderPreserving(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Token::UniformHash(a), Token::UniformHash(b)) => Some(a.cmp(b)),
            (Token::OrderPreserving(a), Token::OrderPreserving(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
