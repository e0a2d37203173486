//! Strategy-aware decoding of canonical token text.
//!
//! Token text is not self-describing: `"1234"` is a valid uniform-hash
//! token and a valid order-preserving token, with different values. The
//! partitioner is therefore always passed in alongside the text and no
//! prefix sniffing is attempted. A `0x` prefix in particular is rejected as
//! malformed hex, since order-preserving text never carries one.

use super::partitioner::Partitioner;
use crate::error::DecodeError;
use crate::numeric::NumericValue;
use num_bigint::BigUint;

/// Decode `text` under `partitioner`'s rule.
pub fn decode(partitioner: Partitioner, text: &str) -> Result<NumericValue, DecodeError> {
    match partitioner {
        Partitioner::UniformHash => parse_signed(text).map(NumericValue::Signed),
        Partitioner::OrderPreserving => parse_unsigned_hex(text).map(NumericValue::Unsigned),
    }
}

/// Parse signed base-10 text into the uniform-hash domain.
pub(crate) fn parse_signed(text: &str) -> Result<i64, DecodeError> {
    text.parse::<i64>()
        .map_err(|e| DecodeError::MalformedInteger {
            text: text.to_string(),
            reason: e.to_string(),
        })
}

/// Parse lowercase hex text as an unsigned integer. Empty text is zero.
pub(crate) fn parse_unsigned_hex(text: &str) -> Result<BigUint, DecodeError> {
    validate_hex(text)?;
    if text.is_empty() {
        return Ok(BigUint::default());
    }

    BigUint::parse_bytes(text.as_bytes(), 16).ok_or_else(|| DecodeError::MalformedHex {
        text: text.to_string(),
        position: 0,
    })
}

/// Check every character is in `[0-9a-f]`, reporting the first that is not.
pub(crate) fn validate_hex(text: &str) -> Result<(), DecodeError> {
    match text
        .char_indices()
        .find(|(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
    {
        Some((position, _)) => Err(DecodeError::MalformedHex {
            text: text.to_string(),
            position,
        }),
        None => Ok(()),
    }
}
