//! Error types for token decoding and sample statistics.

use crate::partitioning::Partitioner;
use thiserror::Error;

/// Result type alias for ringtoken operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A token's text did not parse under its partitioner's rule.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Statistics could not be updated or summarized.
    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),

    /// Observation record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failure to turn a token's canonical text back into a number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Text is not a signed base-10 integer within the 64-bit range.
    #[error("malformed integer token {text:?}: {reason}")]
    MalformedInteger { text: String, reason: String },

    /// Text contains a character outside `[0-9a-f]`, or cannot be mapped
    /// back onto whole bytes.
    #[error("malformed hex token {text:?} at position {position}")]
    MalformedHex { text: String, position: usize },
}

impl DecodeError {
    /// The text that failed to decode.
    pub fn text(&self) -> &str {
        match self {
            DecodeError::MalformedInteger { text, .. } => text,
            DecodeError::MalformedHex { text, .. } => text,
        }
    }
}

/// Sample statistics errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Average requested before any value was accumulated.
    #[error("empty sample: no values accumulated for {0}")]
    EmptySample(Partitioner),

    /// A value from another domain was offered to an accumulator.
    #[error("domain mismatch: {partitioner} accumulator cannot take a {found} value")]
    DomainMismatch {
        partitioner: Partitioner,
        found: &'static str,
    },
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_converts() {
        let err: Error = DecodeError::MalformedHex {
            text: "zz".to_string(),
            position: 0,
        }
        .into();
        assert!(matches!(err, Error::Decode(DecodeError::MalformedHex { .. })));
        assert_eq!(err.to_string(), "decode error: malformed hex token \"zz\" at position 0");
    }

    #[test]
    fn test_stats_error_message() {
        let err = StatsError::EmptySample(Partitioner::UniformHash);
        assert_eq!(err.to_string(), "empty sample: no values accumulated for Murmur3Partitioner");
    }
}
