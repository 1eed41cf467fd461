// ============================================================================
// Dynamic-Scale Fixed Point
// Fixed-point value whose fractional-bit count is chosen at runtime
// ============================================================================
//
// Kept apart from `FixedPoint`: the two types never mix implicitly. Convert
// with `From` / `TryFrom` / `to_fixed`.
//
// Alignment rules:
// - Arithmetic aligns both operands to the SMALLER fractional-bit count by
//   arithmetic right shift (floor). The result carries that scale.
// - Comparison widens both operands and aligns to the LARGER count, so it is
//   exact and never loses bits.

use super::errors::{NumericError, NumericResult};
use super::fixed_point::FixedPoint;
use super::format::QFormat;
use super::storage::{RawInt, Widen};
use num_traits::AsPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// Fixed-point number carrying its own fractional-bit count.
///
/// Slower than [`FixedPoint`] since every binary operation re-aligns scales,
/// but useful when precision is only known at runtime.
pub struct DynFixed<B, O> {
    raw: B,
    frac_bits: u32,
    _overflow: PhantomData<O>,
}

/// 16-bit storage with 32-bit scratch and a runtime scale.
pub type DynFp16 = DynFixed<i16, i32>;

/// 32-bit storage with 64-bit scratch and a runtime scale.
pub type DynFp32 = DynFixed<i32, i64>;

impl<B: Widen<O>, O: RawInt> DynFixed<B, O> {
    /// Create from a raw value and its fractional-bit count.
    ///
    /// # Errors
    /// Returns `InvalidScale` if `frac_bits` is not smaller than `B`'s width.
    pub fn new(raw: B, frac_bits: u32) -> NumericResult<Self> {
        Self::check_scale(frac_bits)?;
        Ok(Self::with_scale(raw, frac_bits))
    }

    /// Create from an integer: `raw = value << frac_bits`, wrapping.
    ///
    /// # Errors
    /// Returns `InvalidScale` if `frac_bits` is not smaller than `B`'s width.
    pub fn from_int<T: AsPrimitive<B>>(value: T, frac_bits: u32) -> NumericResult<Self> {
        Self::check_scale(frac_bits)?;
        let raw: B = value.as_();
        Ok(Self::with_scale(raw << frac_bits as usize, frac_bits))
    }

    /// Create from a double, truncating toward zero. Out-of-range values
    /// wrap like [`from_int`](Self::from_int).
    ///
    /// # Errors
    /// Returns `InvalidScale` if `frac_bits` is not smaller than `B`'s width.
    pub fn from_f64(value: f64, frac_bits: u32) -> NumericResult<Self> {
        Self::check_scale(frac_bits)?;
        let raw = B::wrapping_from_f64(value * Self::scale_f64(frac_bits));
        Ok(Self::with_scale(raw, frac_bits))
    }

    #[inline]
    fn with_scale(raw: B, frac_bits: u32) -> Self {
        Self {
            raw,
            frac_bits,
            _overflow: PhantomData,
        }
    }

    fn check_scale(frac_bits: u32) -> NumericResult<()> {
        if frac_bits >= <B as RawInt>::BITS {
            tracing::debug!(
                frac_bits,
                storage_bits = <B as RawInt>::BITS,
                "rejected fractional bit count"
            );
            return Err(NumericError::InvalidScale);
        }
        Ok(())
    }

    #[inline]
    fn scale_f64(frac_bits: u32) -> f64 {
        (1u128 << frac_bits) as f64
    }

    /// Get the raw internal value (`value × 2^frac_bits`).
    #[inline]
    pub fn raw_value(self) -> B {
        self.raw
    }

    /// Number of fractional bits this value currently carries.
    #[inline]
    pub fn frac_bits(self) -> u32 {
        self.frac_bits
    }

    /// Layout of this value.
    pub fn format(self) -> QFormat {
        QFormat::for_storage(<B as RawInt>::BITS, self.frac_bits, <B as RawInt>::SIGNED)
    }

    // ========================================================================
    // Rescaling
    // ========================================================================

    /// Change the fractional-bit count.
    ///
    /// Gaining bits shifts left (wrapping if the integer part no longer
    /// fits); losing bits shifts right, rounding toward negative infinity.
    ///
    /// # Errors
    /// Returns `InvalidScale` if `frac_bits` is not smaller than `B`'s width.
    pub fn rescale(self, frac_bits: u32) -> NumericResult<Self> {
        Self::check_scale(frac_bits)?;
        Ok(self.rescaled(frac_bits))
    }

    fn rescaled(self, target: u32) -> Self {
        if target >= self.frac_bits {
            let shift = (target - self.frac_bits) as usize;
            Self::with_scale(self.raw << shift, target)
        } else {
            Self::with_scale(self.shr_to(target), target)
        }
    }

    /// Raw value right-shifted down to `target` fractional bits.
    fn shr_to(self, target: u32) -> B {
        let shift = (self.frac_bits - target) as usize;
        let mask = (B::ONE << shift).wrapping_sub(&B::ONE);
        if self.raw & mask != B::ZERO {
            tracing::trace!(
                from = self.frac_bits,
                to = target,
                "rescale discarded low-order bits"
            );
        }
        self.raw >> shift
    }

    /// Both raw values at the smaller of the two scales.
    fn align(self, rhs: Self) -> (B, B, u32) {
        let target = self.frac_bits.min(rhs.frac_bits);
        (self.shr_to(target), rhs.shr_to(target), target)
    }

    /// Exact comparison in the overflow type at the larger of the two scales.
    fn cmp_exact(&self, other: &Self) -> Ordering {
        let target = self.frac_bits.max(other.frac_bits);
        let lhs = <B as Widen<O>>::widen(self.raw) << (target - self.frac_bits) as usize;
        let rhs = <B as Widen<O>>::widen(other.raw) << (target - other.frac_bits) as usize;
        lhs.cmp(&rhs)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Convert to an integer, rounding toward negative infinity.
    #[inline]
    pub fn to_int<T>(self) -> T
    where
        T: Copy + 'static,
        B: AsPrimitive<T>,
    {
        (self.raw >> self.frac_bits as usize).as_()
    }

    /// Convert to a float, computed as `raw / 2^frac_bits` in `f32`.
    #[inline]
    pub fn to_f32(self) -> f32 {
        let raw: f32 = self.raw.as_();
        raw / Self::scale_f64(self.frac_bits) as f32
    }

    /// Convert to a double, computed as `raw / 2^frac_bits` in `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        let raw: f64 = self.raw.as_();
        raw / Self::scale_f64(self.frac_bits)
    }

    /// Rescale into the compile-time-scale type.
    ///
    /// An `F` that does not fit the storage is rejected at compile time by
    /// `FixedPoint` itself.
    pub fn to_fixed<const F: u32>(self) -> FixedPoint<B, O, F> {
        FixedPoint::from_raw(self.rescaled(F).raw)
    }
}

// ============================================================================
// Arithmetic Operators
// ============================================================================

impl<B: Widen<O>, O: RawInt> Add for DynFixed<B, O> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let (a, b, frac_bits) = self.align(rhs);
        Self::with_scale(a.wrapping_add(&b), frac_bits)
    }
}

impl<B: Widen<O>, O: RawInt> Sub for DynFixed<B, O> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        let (a, b, frac_bits) = self.align(rhs);
        Self::with_scale(a.wrapping_sub(&b), frac_bits)
    }
}

impl<B: Widen<O>, O: RawInt> Mul for DynFixed<B, O> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b, frac_bits) = self.align(rhs);
        let product = <B as Widen<O>>::widen(a).wrapping_mul(&<B as Widen<O>>::widen(b));
        Self::with_scale(
            <B as Widen<O>>::narrow(product >> frac_bits as usize),
            frac_bits,
        )
    }
}

impl<B: Widen<O>, O: RawInt> Div for DynFixed<B, O> {
    type Output = Self;

    /// # Panics
    /// Panics if `rhs` is zero at the aligned scale.
    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        let (a, b, frac_bits) = self.align(rhs);
        let dividend = <B as Widen<O>>::widen(a) << frac_bits as usize;
        Self::with_scale(
            <B as Widen<O>>::narrow(dividend / <B as Widen<O>>::widen(b)),
            frac_bits,
        )
    }
}

impl<B: Widen<O>, O: RawInt> Rem for DynFixed<B, O> {
    type Output = Self;

    /// # Panics
    /// Panics if `rhs` is zero at the aligned scale.
    #[inline]
    fn rem(self, rhs: Self) -> Self::Output {
        let (a, b, frac_bits) = self.align(rhs);
        Self::with_scale(a.wrapping_rem(b), frac_bits)
    }
}

impl<B: Widen<O>, O: RawInt> Neg for DynFixed<B, O> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::with_scale(self.raw.wrapping_neg(), self.frac_bits)
    }
}

macro_rules! impl_assign_op {
    ($($assign:ident, $method:ident, $op:tt);* $(;)?) => {$(
        impl<B: Widen<O>, O: RawInt> $assign for DynFixed<B, O> {
            #[inline]
            fn $method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    )*};
}

impl_assign_op!(
    AddAssign, add_assign, +;
    SubAssign, sub_assign, -;
    MulAssign, mul_assign, *;
    DivAssign, div_assign, /;
    RemAssign, rem_assign, %;
);

// ============================================================================
// Trait Implementations
// ============================================================================

impl<B: Widen<O>, O: RawInt> Clone for DynFixed<B, O> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Widen<O>, O: RawInt> Copy for DynFixed<B, O> {}

impl<B: Widen<O>, O: RawInt> PartialEq for DynFixed<B, O> {
    /// Value equality: `1.0` at 8 bits equals `1.0` at 4 bits.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp_exact(other) == Ordering::Equal
    }
}

impl<B: Widen<O>, O: RawInt> Eq for DynFixed<B, O> {}

impl<B: Widen<O>, O: RawInt> PartialOrd for DynFixed<B, O> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_exact(other))
    }
}

impl<B: Widen<O>, O: RawInt> Ord for DynFixed<B, O> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_exact(other)
    }
}

impl<B: Widen<O>, O: RawInt> fmt::Debug for DynFixed<B, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynFixed<{}>({}, raw={})", self.format(), self, self.raw)
    }
}

impl<B: Widen<O>, O: RawInt> fmt::Display for DynFixed<B, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> From<FixedPoint<B, O, F>> for DynFixed<B, O> {
    #[inline]
    fn from(value: FixedPoint<B, O, F>) -> Self {
        Self::with_scale(value.raw_value(), F)
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> TryFrom<DynFixed<B, O>> for FixedPoint<B, O, F> {
    type Error = NumericError;

    /// Scale-strict conversion; use [`DynFixed::to_fixed`] to rescale instead.
    fn try_from(value: DynFixed<B, O>) -> Result<Self, Self::Error> {
        if value.frac_bits != F {
            tracing::debug!(
                expected = F,
                actual = value.frac_bits,
                "dynamic value has a different scale"
            );
            return Err(NumericError::ScaleMismatch);
        }
        Ok(FixedPoint::from_raw(value.raw))
    }
}
