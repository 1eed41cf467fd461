use fixed_point::numeric::{Fp16, Fp32, NumericError};
use num_bigint::BigInt;
use num_integer::Integer;
use proptest::prelude::*;

/// floor(a * b / 2^frac_bits) computed without any fixed-width intermediate
fn reference_mul(a: i64, b: i64, frac_bits: u32) -> BigInt {
    let product = BigInt::from(a) * BigInt::from(b);
    product.div_floor(&(BigInt::from(1) << frac_bits))
}

/// trunc((a * 2^frac_bits) / b), matching native integer division
fn reference_div(a: i64, b: i64, frac_bits: u32) -> BigInt {
    (BigInt::from(a) << frac_bits) / BigInt::from(b)
}

fn fits_i16(value: &BigInt) -> bool {
    *value >= BigInt::from(i16::MIN) && *value <= BigInt::from(i16::MAX)
}

// Property 1: integer construction round-trips through the floor conversion
proptest! {
    #[test]
    fn prop_int_roundtrip_fp16(i in -128i32..128) {
        prop_assert_eq!(Fp16::from_int(i).to_int::<i32>(), i);
    }

    #[test]
    fn prop_int_roundtrip_fp32(i in -32_768i32..32_768) {
        prop_assert_eq!(Fp32::from_int(i).to_int::<i32>(), i);
    }
}

// Property 2: (a + b) - b == a, bit-exact even when the sum wraps
proptest! {
    #[test]
    fn prop_add_sub_inverse(a in any::<i16>(), b in any::<i16>()) {
        let a = Fp16::from_raw(a);
        let b = Fp16::from_raw(b);
        prop_assert_eq!((a + b) - b, a);
    }

    #[test]
    fn prop_add_commutative(a in any::<i32>(), b in any::<i32>()) {
        let a = Fp32::from_raw(a);
        let b = Fp32::from_raw(b);
        prop_assert_eq!(a + b, b + a);
    }
}

// Property 3: one is the multiplicative identity
proptest! {
    #[test]
    fn prop_one_identity_fp16(raw in any::<i16>()) {
        let a = Fp16::from_raw(raw);
        prop_assert_eq!(a * Fp16::one(), a);
        prop_assert_eq!(a / Fp16::one(), a);
    }

    #[test]
    fn prop_one_identity_fp32(raw in any::<i32>()) {
        let a = Fp32::from_raw(raw);
        prop_assert_eq!(a * Fp32::one(), a);
        prop_assert_eq!(a / Fp32::one(), a);
    }
}

// Property 4: integer conversion is floor of the represented value
proptest! {
    #[test]
    fn prop_to_int_is_floor(value in -127.0f64..127.0) {
        let x = Fp16::from_f64(value);
        prop_assert_eq!(x.to_int::<i32>(), x.to_f64().floor() as i32);
        prop_assert!(x.to_int::<i32>() as f64 <= x.to_f64());
    }
}

// Property 5: quantization error is below one step
proptest! {
    #[test]
    fn prop_quantization_bound_fp16(value in -127.0f64..127.0) {
        let error = (Fp16::from_f64(value).to_f64() - value).abs();
        prop_assert!(error < 1.0 / 256.0, "{} quantized with error {}", value, error);
    }

    #[test]
    fn prop_quantization_bound_fp32(value in -32_000.0f64..32_000.0) {
        let error = (Fp32::from_f64(value).to_f64() - value).abs();
        prop_assert!(error < 1.0 / 65_536.0, "{} quantized with error {}", value, error);
    }
}

// Property 6: raw ordering matches the ordering of the represented values
proptest! {
    #[test]
    fn prop_order_matches_value(a in any::<i16>(), b in any::<i16>()) {
        let x = Fp16::from_raw(a);
        let y = Fp16::from_raw(b);
        prop_assert_eq!(Some(x.cmp(&y)), x.to_f64().partial_cmp(&y.to_f64()));
        prop_assert_eq!(x < y, x.to_f64() < y.to_f64());
        prop_assert_eq!(x == y, x.to_f64() == y.to_f64());
    }
}

// Property 7: widened multiply matches an arbitrary precision reference
proptest! {
    #[test]
    fn prop_mul_matches_reference(a in any::<i16>(), b in any::<i16>()) {
        let expected = reference_mul(a as i64, b as i64, 8);
        let product = Fp16::from_raw(a) * Fp16::from_raw(b);
        let checked = Fp16::from_raw(a).checked_mul(Fp16::from_raw(b));

        if fits_i16(&expected) {
            prop_assert_eq!(BigInt::from(product.raw_value()), expected);
            prop_assert_eq!(checked, Ok(product));
        } else {
            prop_assert!(checked.is_err());
        }
    }

    #[test]
    fn prop_mul_near_max_is_not_corrupted(
        a in 16_384i16..=i16::MAX,
        b in 0i16..=256,
    ) {
        // |b| <= 1.0, so the true product always fits the storage
        let expected = reference_mul(a as i64, b as i64, 8);
        let product = Fp16::from_raw(a) * Fp16::from_raw(b);
        prop_assert_eq!(BigInt::from(product.raw_value()), expected);
    }

    #[test]
    fn prop_mul_matches_reference_fp32(a in any::<i32>(), b in any::<i32>()) {
        let expected = reference_mul(a as i64, b as i64, 16);
        let checked = Fp32::from_raw(a).checked_mul(Fp32::from_raw(b));
        match checked {
            Ok(product) => prop_assert_eq!(BigInt::from(product.raw_value()), expected),
            Err(_) => prop_assert!(
                expected > BigInt::from(i32::MAX) || expected < BigInt::from(i32::MIN)
            ),
        }
    }
}

// Property 8: widened divide matches an arbitrary precision reference
proptest! {
    #[test]
    fn prop_div_matches_reference(a in any::<i16>(), b in any::<i16>()) {
        prop_assume!(b != 0);
        let expected = reference_div(a as i64, b as i64, 8);
        let checked = Fp16::from_raw(a).checked_div(Fp16::from_raw(b));

        if fits_i16(&expected) {
            let quotient = Fp16::from_raw(a) / Fp16::from_raw(b);
            prop_assert_eq!(BigInt::from(quotient.raw_value()), expected);
            prop_assert_eq!(checked, Ok(quotient));
        } else {
            prop_assert!(checked.is_err());
        }
    }

    #[test]
    fn prop_div_by_zero_is_reported(a in any::<i16>()) {
        prop_assert_eq!(
            Fp16::from_raw(a).checked_div(Fp16::ZERO),
            Err(NumericError::DivisionByZero)
        );
    }
}

// Property 9: checked add/sub agree with the wrapping operators in range
proptest! {
    #[test]
    fn prop_checked_add_agrees(a in any::<i16>(), b in any::<i16>()) {
        let exact = a as i32 + b as i32;
        let x = Fp16::from_raw(a);
        let y = Fp16::from_raw(b);
        match x.checked_add(y) {
            Ok(sum) => {
                prop_assert_eq!(sum, x + y);
                prop_assert_eq!(sum.raw_value() as i32, exact);
            },
            Err(NumericError::Overflow) => prop_assert!(exact > i16::MAX as i32),
            Err(NumericError::Underflow) => prop_assert!(exact < i16::MIN as i32),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn prop_checked_sub_agrees(a in any::<i16>(), b in any::<i16>()) {
        let exact = a as i32 - b as i32;
        let x = Fp16::from_raw(a);
        let y = Fp16::from_raw(b);
        match x.checked_sub(y) {
            Ok(diff) => prop_assert_eq!(diff, x - y),
            Err(NumericError::Overflow) => prop_assert!(exact > i16::MAX as i32),
            Err(NumericError::Underflow) => prop_assert!(exact < i16::MIN as i32),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}
