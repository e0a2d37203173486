//! Property-based tests for token derivation and decoding.

#[cfg(test)]
mod tests {
    use crate::numeric::NumericValue;
    use crate::partitioning::{decode, Partitioner, Token};
    use crate::stats::{SampleStatistics, SampleSum};
    use num_bigint::BigUint;
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Two keys of the same length.
    fn equal_length_keys() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
        (1usize..24).prop_flat_map(|n| (vec(any::<u8>(), n), vec(any::<u8>(), n)))
    }

    fn partitioner_strategy() -> impl Strategy<Value = Partitioner> {
        prop_oneof![Just(Partitioner::UniformHash), Just(Partitioner::OrderPreserving)]
    }

    proptest! {
        #[test]
        fn prop_derivation_is_deterministic(
            key in vec(any::<u8>(), 0..64),
            p in partitioner_strategy()
        ) {
            prop_assert_eq!(p.derive_token(&key), p.derive_token(&key.clone()));
        }

        #[test]
        fn prop_order_preserved_for_equal_length((k1, k2) in equal_length_keys()) {
            let p = Partitioner::OrderPreserving;
            let (t1, t2) = (p.derive_token(&k1), p.derive_token(&k2));
            prop_assert_eq!(t1.partial_cmp(&t2), Some(k1.cmp(&k2)));

            let v1 = BigUint::from_bytes_be(&k1);
            let v2 = BigUint::from_bytes_be(&k2);
            prop_assert_eq!(v1.cmp(&v2), k1.cmp(&k2));
            prop_assert_eq!(t1.value(), NumericValue::Unsigned(v1));
        }

        #[test]
        fn prop_decode_round_trip(
            key in vec(any::<u8>(), 0..64),
            p in partitioner_strategy()
        ) {
            let token = p.derive_token(&key);
            let text = token.to_string();
            prop_assert_eq!(decode(p, &text), Ok(token.value()));
            prop_assert_eq!(Token::parse(p, &text), Ok(token));
        }

        #[test]
        fn prop_uniform_text_not_decodable_as_order_preserving(key in vec(any::<u8>(), 1..64)) {
            let token = Partitioner::UniformHash.derive_token(&key);
            let v = match token.value() {
                NumericValue::Signed(v) => v,
                other => return Err(TestCaseError::fail(format!("unexpected {:?}", other))),
            };
            prop_assume!(v.unsigned_abs() >= 10);

            match decode(Partitioner::OrderPreserving, &token.to_string()) {
                Err(_) => prop_assert!(v < 0),
                Ok(NumericValue::Unsigned(hex_value)) => {
                    prop_assert!(v > 0);
                    prop_assert_ne!(hex_value, BigUint::from(v as u64));
                }
                Ok(other) => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        #[test]
        fn prop_order_preserving_text_not_decodable_as_uniform(
            first in 0x10u8..=0xff,
            rest in vec(any::<u8>(), 0..16)
        ) {
            let mut key = vec![first];
            key.extend(rest);
            let token = Partitioner::OrderPreserving.derive_token(&key);

            match decode(Partitioner::UniformHash, &token.to_string()) {
                Err(_) => {}
                Ok(NumericValue::Signed(decimal)) => {
                    prop_assert!(decimal >= 0);
                    prop_assert_ne!(
                        NumericValue::Unsigned(BigUint::from(decimal as u64)),
                        token.value()
                    );
                }
                Ok(other) => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        #[test]
        fn prop_uniform_sum_matches_i128(values in vec(any::<i64>(), 0..200)) {
            let mut stats = SampleStatistics::new(Partitioner::UniformHash);
            for v in &values {
                stats.accumulate(&NumericValue::Signed(*v)).unwrap();
            }
            let expected: i128 = values.iter().map(|v| i128::from(*v)).sum();
            prop_assert_eq!(stats.sum(), SampleSum::Signed(expected));
            prop_assert_eq!(stats.count(), values.len() as u64);
        }
    }
}
