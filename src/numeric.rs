//! Numeric values produced by token decoding and sample statistics.
//!
//! The two partitioner domains never share a representation. A value
//! decoded from a uniform-hash token is always [`NumericValue::Signed`], a
//! value decoded from an order-preserving token is always
//! [`NumericValue::Unsigned`], and averages come back as either an exact
//! decimal or an explicitly approximate float. Nothing in this module
//! converts between variants implicitly.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A number in exactly one of the token domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumericValue {
    /// Fixed-width signed value of the uniform-hash domain.
    Signed(i64),

    /// Arbitrary-precision unsigned value of the order-preserving domain.
    Unsigned(BigUint),

    /// Exact decimal with a fixed number of fractional digits.
    Decimal(ExactDecimal),

    /// Floating point approximation. Precision is lost relative to the
    /// exact ratio it was computed from.
    Approximate(f64),
}

impl NumericValue {
    /// Short name of the variant, used in error messages.
    pub fn domain(&self) -> &'static str {
        match self {
            NumericValue::Signed(_) => "signed-64",
            NumericValue::Unsigned(_) => "unsigned-arbitrary",
            NumericValue::Decimal(_) => "exact-decimal",
            NumericValue::Approximate(_) => "approximate",
        }
    }

    /// Project the value onto an `f64` axis for plotting.
    ///
    /// Lossy for magnitudes beyond 2^53; unsigned values too large for an
    /// `f64` saturate to infinity.
    pub fn to_f64(&self) -> f64 {
        match self {
            NumericValue::Signed(v) => *v as f64,
            NumericValue::Unsigned(v) => v.to_f64().unwrap_or(f64::INFINITY),
            NumericValue::Decimal(d) => d.to_f64(),
            NumericValue::Approximate(v) => *v,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self {
            NumericValue::Signed(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<&BigUint> {
        match self {
            NumericValue::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&ExactDecimal> {
        match self {
            NumericValue::Decimal(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Signed(v) => write!(f, "{}", v),
            NumericValue::Unsigned(v) => write!(f, "{}", v),
            NumericValue::Decimal(d) => write!(f, "{}", d),
            NumericValue::Approximate(v) => write!(f, "{}", v),
        }
    }
}

/// A non-negative decimal stored as `unscaled / 10^scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExactDecimal {
    unscaled: BigUint,
    scale: u32,
}

impl ExactDecimal {
    /// Create a decimal from its unscaled integer and scale.
    pub fn new(unscaled: BigUint, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// Divide `numerator` by `denominator`, keeping `scale` fractional
    /// digits and rounding the last digit half-up.
    ///
    /// Returns `None` when `denominator` is zero.
    pub fn from_ratio(numerator: &BigUint, denominator: u64, scale: u32) -> Option<Self> {
        if denominator == 0 {
            return None;
        }

        let denominator = BigUint::from(denominator);
        let scaled = numerator * BigUint::from(10u32).pow(scale);
        let (mut quotient, remainder) = scaled.div_rem(&denominator);

        if remainder * 2u32 >= denominator {
            quotient += 1u32;
        }

        Some(Self::new(quotient, scale))
    }

    /// The integer holding every digit of the decimal.
    pub fn unscaled(&self) -> &BigUint {
        &self.unscaled
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    /// Nearest `f64`, parsed from the plain decimal rendering.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for ExactDecimal {
    /// Plain notation with exactly `scale` fractional digits, no exponent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.to_string();
        let scale = self.scale as usize;

        if scale == 0 {
            return f.write_str(&digits);
        }

        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_division() {
        let d = ExactDecimal::from_ratio(&BigUint::from(10632133838141570u64), 100, 2).unwrap();
        assert_eq!(d.to_string(), "106321338381415.70");

        let d = ExactDecimal::from_ratio(&BigUint::from(10632133838141570u64), 100, 4).unwrap();
        assert_eq!(d.to_string(), "106321338381415.7000");
    }

    #[test]
    fn test_rounding_half_up() {
        // 2 / 3 = 0.666...
        let d = ExactDecimal::from_ratio(&BigUint::from(2u32), 3, 3).unwrap();
        assert_eq!(d.to_string(), "0.667");

        // 1 / 8 = 0.125 -> 0.13
        let d = ExactDecimal::from_ratio(&BigUint::from(1u32), 8, 2).unwrap();
        assert_eq!(d.to_string(), "0.13");

        // 1 / 3 = 0.333...
        let d = ExactDecimal::from_ratio(&BigUint::from(1u32), 3, 2).unwrap();
        assert_eq!(d.to_string(), "0.33");
    }

    #[test]
    fn test_zero_denominator() {
        assert!(ExactDecimal::from_ratio(&BigUint::from(1u32), 0, 2).is_none());
    }

    #[test]
    fn test_display_pads_small_values() {
        let d = ExactDecimal::new(BigUint::from(5u32), 3);
        assert_eq!(d.to_string(), "0.005");

        let d = ExactDecimal::new(BigUint::from(0u32), 2);
        assert_eq!(d.to_string(), "0.00");
        assert!(d.is_zero());

        let d = ExactDecimal::new(BigUint::from(42u32), 0);
        assert_eq!(d.to_string(), "42");
    }

    #[test]
    fn test_to_f64_projection() {
        assert_eq!(NumericValue::Signed(-5).to_f64(), -5.0);
        assert_eq!(
            NumericValue::Unsigned(BigUint::from(1u64 << 60)).to_f64(),
            (1u64 << 60) as f64
        );
        let d = ExactDecimal::new(BigUint::from(12345u32), 2);
        assert_eq!(NumericValue::Decimal(d).to_f64(), 123.45);
    }

    #[test]
    fn test_variant_accessors_do_not_coerce() {
        let signed = NumericValue::Signed(7);
        assert_eq!(signed.as_signed(), Some(7));
        assert!(signed.as_unsigned().is_none());

        let unsigned = NumericValue::Unsigned(BigUint::from(7u32));
        assert!(unsigned.as_signed().is_none());
        assert_eq!(unsigned.as_unsigned(), Some(&BigUint::from(7u32)));
        assert_ne!(signed, unsigned);
    }
}
