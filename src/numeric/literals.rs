// ============================================================================
// Literal Conveniences
// Ready-made instantiations and literal constructors
// ============================================================================

use super::fixed_point::FixedPoint;
use super::storage::{RawInt, Widen};

/// 16-bit storage, 32-bit scratch, 8 fractional bits (Q7.8).
pub type Fp16 = FixedPoint<i16, i32, 8>;

/// 32-bit storage, 64-bit scratch, 16 fractional bits (Q15.16).
pub type Fp32 = FixedPoint<i32, i64, 16>;

/// A numeric literal that can be turned into any fixed-point instantiation.
///
/// Implemented for the default literal types. An integer literal is cast to
/// the storage type and shifted left by `FRAC_BITS`, wrapping the same way
/// [`FixedPoint::from_int`] does. A float literal goes through
/// [`FixedPoint::from_f64`].
pub trait FixedLiteral: Copy {
    /// Convert the literal into the fixed-point layout `FixedPoint<B, O, F>`.
    fn into_fixed<B: Widen<O>, O: RawInt, const F: u32>(self) -> FixedPoint<B, O, F>;
}

impl FixedLiteral for i32 {
    #[inline]
    fn into_fixed<B: Widen<O>, O: RawInt, const F: u32>(self) -> FixedPoint<B, O, F> {
        FixedPoint::from_raw(B::wrapping_from_i128(i128::from(self)) << F as usize)
    }
}

impl FixedLiteral for f64 {
    #[inline]
    fn into_fixed<B: Widen<O>, O: RawInt, const F: u32>(self) -> FixedPoint<B, O, F> {
        FixedPoint::from_f64(self)
    }
}

/// Build an [`Fp16`] from an integer or float literal.
///
/// ```
/// use fixed_point::numeric::{fp16, Fp16};
///
/// assert_eq!(fp16(10) + fp16(5), fp16(15));
/// assert_eq!(fp16(2.5).to_f64(), 2.5);
/// assert_eq!(fp16(-3), Fp16::from_int(-3));
/// ```
#[inline]
pub fn fp16<L: FixedLiteral>(literal: L) -> Fp16 {
    literal.into_fixed()
}

/// Build an [`Fp32`] from an integer or float literal.
#[inline]
pub fn fp32<L: FixedLiteral>(literal: L) -> Fp32 {
    literal.into_fixed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_literals() {
        assert_eq!(fp16(10).raw_value(), 2560);
        assert_eq!(fp32(10).raw_value(), 655_360);
        assert_eq!(fp16(-1), -Fp16::one());
        assert_eq!(fp16(200), Fp16::from_int(200));
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(fp16(2.5).raw_value(), 640);
        assert_eq!(fp32(0.5).raw_value(), 32_768);
        assert_eq!(fp16(-66.3).to_int::<i32>(), -67);
    }

    #[test]
    fn test_literal_arithmetic() {
        assert_eq!(fp16(10) + fp16(5), fp16(15));
        assert_eq!(fp16(2.5) * fp16(4.0), fp16(10.0));
        assert_eq!(fp32(1) / fp32(4), fp32(0.25));
    }

    #[test]
    fn test_into_fixed_other_layouts() {
        let x: FixedPoint<u8, u16, 4> = 3i32.into_fixed();
        assert_eq!(x.raw_value(), 48);
        let y: FixedPoint<i64, i128, 32> = 1.5f64.into_fixed();
        assert_eq!(y.raw_value(), 3i64 << 31);
    }
}
