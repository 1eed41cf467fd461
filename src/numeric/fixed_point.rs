// ============================================================================
// Fixed-Point Value
// Binary fixed-point arithmetic with compile-time scale
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::format::QFormat;
use super::storage::{RawInt, Widen};
use num_traits::{AsPrimitive, Bounded, One, PrimInt, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{Product, Sum};
use std::marker::PhantomData;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// Binary fixed-point number with compile-time scale.
///
/// Internally stores `value × 2^FRAC_BITS` in the storage integer `B`.
/// Multiplication and division go through the wider integer `O`, so the
/// intermediate product never overflows.
///
/// # Type Parameters
/// - `B`: storage integer (`i8`..`i64`, `u8`..`u64`)
/// - `O`: overflow integer, at least twice as wide as `B` (enforced by [`Widen`])
/// - `FRAC_BITS`: number of fractional bits, must be smaller than `B`'s width
///
/// Values of different scale are different types, so they can never be
/// mixed by accident.
///
/// # Overflow
/// The operators never signal errors. Addition, subtraction, negation and
/// the narrowing step of multiply/divide wrap like the storage integer.
/// A zero divisor in `/` or `%` panics, as native integer division does.
/// Use the `checked_*` methods when the inputs are not trusted.
///
/// # Example
/// ```
/// use fixed_point::numeric::Fp16;
///
/// let a = Fp16::from_f64(2.5);
/// let b = Fp16::from_int(4);
/// assert_eq!(a * b, Fp16::from_int(10));
/// assert_eq!(Fp16::from_f64(-66.3).to_int::<i32>(), -67);
/// ```
#[repr(transparent)]
pub struct FixedPoint<B, O, const FRAC_BITS: u32> {
    raw: B,
    _overflow: PhantomData<O>,
}

impl<B: Widen<O>, O: RawInt, const F: u32> FixedPoint<B, O, F> {
    /// Rejects instantiations whose fractional bits do not fit the storage.
    const VALID_SCALE: () = assert!(
        F < <B as RawInt>::BITS,
        "FRAC_BITS must be smaller than the storage width"
    );

    /// Number of fractional bits
    pub const FRAC_BITS: u32 = F;

    /// Zero value
    pub const ZERO: Self = Self::from_raw(B::ZERO);

    /// Smallest positive step (raw value 1)
    pub const EPSILON: Self = Self::from_raw(B::ONE);

    /// Maximum representable value
    pub const MAX: Self = Self::from_raw(<B as RawInt>::MAX);

    /// Minimum representable value
    pub const MIN: Self = Self::from_raw(<B as RawInt>::MIN);

    /// Layout of this instantiation
    pub const FORMAT: QFormat =
        QFormat::for_storage(<B as RawInt>::BITS, F, <B as RawInt>::SIGNED);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation.
    #[inline]
    pub const fn from_raw(raw: B) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SCALE;
        Self {
            raw,
            _overflow: PhantomData,
        }
    }

    /// One (1.0)
    ///
    /// Only representable when the layout has at least one integer bit. With
    /// `FRAC_BITS == B::BITS - 1` on signed storage (e.g. Q0.15) the shift
    /// lands on the sign bit and this returns `MIN`, i.e. -1.0.
    #[inline]
    pub fn one() -> Self {
        Self::from_raw(B::ONE << F as usize)
    }

    /// Create from an integer value: `raw = value << FRAC_BITS`.
    ///
    /// The integer is first cast to the storage type, then shifted. Bits
    /// shifted past the storage width are lost, no check is performed.
    #[inline]
    pub fn from_int<T: AsPrimitive<B>>(value: T) -> Self {
        let raw: B = value.as_();
        Self::from_raw(raw << F as usize)
    }

    /// Create from a double: `raw = (value × 2^FRAC_BITS) as B`.
    ///
    /// Truncates toward zero. Out-of-range values wrap like
    /// [`from_int`](Self::from_int): the low storage bits are kept. NaN
    /// becomes zero.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self::from_raw(B::wrapping_from_f64(value * Self::scale_f64()))
    }

    /// Create from a float. See [`from_f64`](Self::from_f64).
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }

    /// Checked integer construction.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if `value` does not fit once scaled.
    pub fn checked_from_int<T: PrimInt>(value: T) -> NumericResult<Self> {
        let out_of_range = if value < T::zero() {
            NumericError::Underflow
        } else {
            NumericError::Overflow
        };
        let raw: B = num_traits::cast(value).ok_or(out_of_range)?;
        let shifted = raw << F as usize;
        if shifted >> F as usize != raw {
            return Err(out_of_range);
        }
        Ok(Self::from_raw(shifted))
    }

    /// Checked float construction.
    ///
    /// # Errors
    /// - `InvalidInput` if `value` is NaN or infinite
    /// - `Overflow` / `Underflow` if the scaled value does not fit
    pub fn checked_from_f64(value: f64) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::InvalidInput);
        }
        let scaled = (value * Self::scale_f64()).trunc();
        let magnitude_bits = <B as RawInt>::BITS - <B as RawInt>::SIGNED as u32;
        let upper = 2f64.powi(magnitude_bits as i32);
        let lower = if <B as RawInt>::SIGNED { -upper } else { 0.0 };
        if scaled >= upper {
            Err(NumericError::Overflow)
        } else if scaled < lower {
            Err(NumericError::Underflow)
        } else {
            Ok(Self::from_raw(B::wrapping_from_f64(scaled)))
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (`value × 2^FRAC_BITS`).
    #[inline]
    pub fn raw_value(self) -> B {
        self.raw
    }

    /// Number of fractional bits of this value.
    #[inline]
    pub fn frac_bits(self) -> u32 {
        F
    }

    /// Integer part, rounded toward negative infinity.
    #[inline]
    pub fn integer_part(self) -> B {
        self.raw >> F as usize
    }

    /// The low `FRAC_BITS` bits of the raw value.
    ///
    /// Always non-negative: for negative values this is the distance above
    /// [`integer_part`](Self::integer_part), in raw units.
    #[inline]
    pub fn fractional_raw(self) -> B {
        let mask = (B::ONE << F as usize).wrapping_sub(&B::ONE);
        self.raw & mask
    }

    /// Check if value is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.raw == B::ZERO
    }

    /// Check if value is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.raw > B::ZERO
    }

    /// Check if value is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.raw < B::ZERO
    }

    /// Absolute value. `MIN.abs()` wraps to `MIN`.
    #[inline]
    pub fn abs(self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self
        }
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Convert to an integer by arithmetic right shift.
    ///
    /// Rounds toward negative infinity: `66.3 → 66`, `-66.3 → -67`.
    #[inline]
    pub fn to_int<T>(self) -> T
    where
        T: Copy + 'static,
        B: AsPrimitive<T>,
    {
        (self.raw >> F as usize).as_()
    }

    /// Convert to a float, computed as `raw / 2^FRAC_BITS` in `f32`.
    #[inline]
    pub fn to_f32(self) -> f32 {
        let raw: f32 = self.raw.as_();
        raw / Self::scale_f64() as f32
    }

    /// Convert to a double, computed as `raw / 2^FRAC_BITS` in `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        let raw: f64 = self.raw.as_();
        raw / Self::scale_f64()
    }

    /// `2^FRAC_BITS` as a double. Exact for every valid scale.
    #[inline]
    fn scale_f64() -> f64 {
        (1u128 << F) as f64
    }

    #[inline]
    fn widened(self) -> O {
        <B as Widen<O>>::widen(self.raw)
    }

    #[inline]
    fn narrowed(wide: O) -> B {
        <B as Widen<O>>::narrow(wide)
    }

    /// Range-check a widened result before narrowing it.
    #[inline]
    fn from_wide_checked(wide: O) -> NumericResult<Self> {
        if wide > Self::MAX.widened() {
            Err(NumericError::Overflow)
        } else if wide < Self::MIN.widened() {
            Err(NumericError::Underflow)
        } else {
            Ok(Self::from_raw(Self::narrowed(wide)))
        }
    }

    // ========================================================================
    // Checked Arithmetic
    // ========================================================================

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.raw
            .checked_add(&rhs.raw)
            .map(Self::from_raw)
            .ok_or_else(|| {
                if rhs.raw > B::ZERO {
                    NumericError::Overflow
                } else {
                    NumericError::Underflow
                }
            })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.raw
            .checked_sub(&rhs.raw)
            .map(Self::from_raw)
            .ok_or_else(|| {
                if rhs.raw < B::ZERO {
                    NumericError::Overflow
                } else {
                    NumericError::Underflow
                }
            })
    }

    /// Checked multiplication.
    ///
    /// The product is formed in the overflow type and rounded toward
    /// negative infinity, exactly like `*`.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_mul(self, rhs: Self) -> NumericResult<Self> {
        let product = self.widened() * rhs.widened();
        Self::from_wide_checked(product >> F as usize)
    }

    /// Checked division.
    ///
    /// # Errors
    /// - `DivisionByZero` if `rhs` is zero
    /// - `Overflow` / `Underflow` if the quotient is out of range
    #[inline]
    pub fn checked_div(self, rhs: Self) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let dividend = self.widened() << F as usize;
        Self::from_wide_checked(dividend / rhs.widened())
    }

    /// Checked remainder.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    #[inline]
    pub fn checked_rem(self, rhs: Self) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self::from_raw(self.raw.wrapping_rem(rhs.raw)))
    }

    /// Checked negation.
    ///
    /// # Errors
    /// Returns `Overflow` for `MIN` of a signed type, `Underflow` for any
    /// non-zero unsigned value.
    #[inline]
    pub fn checked_neg(self) -> NumericResult<Self> {
        self.raw.checked_neg().map(Self::from_raw).ok_or_else(|| {
            if self.raw < B::ZERO {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }
}

// ============================================================================
// Compound Arithmetic Operators
// ============================================================================

impl<B: Widen<O>, O: RawInt, const F: u32> AddAssign for FixedPoint<B, O, F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.raw = self.raw.wrapping_add(&rhs.raw);
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> SubAssign for FixedPoint<B, O, F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.raw = self.raw.wrapping_sub(&rhs.raw);
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> MulAssign for FixedPoint<B, O, F> {
    /// Widen, multiply, drop one factor of `2^FRAC_BITS`, narrow.
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        let product = self.widened().wrapping_mul(&rhs.widened());
        self.raw = Self::narrowed(product >> F as usize);
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> DivAssign for FixedPoint<B, O, F> {
    /// Pre-scale the widened dividend by `2^FRAC_BITS`, divide, narrow.
    ///
    /// # Panics
    /// Panics if `rhs` is zero.
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        let dividend = self.widened() << F as usize;
        self.raw = Self::narrowed(dividend / rhs.widened());
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> RemAssign for FixedPoint<B, O, F> {
    /// Raw remainder; the sign follows the dividend.
    ///
    /// # Panics
    /// Panics if `rhs` is zero.
    #[inline]
    fn rem_assign(&mut self, rhs: Self) {
        self.raw = self.raw.wrapping_rem(rhs.raw);
    }
}

// ============================================================================
// Binary Arithmetic Operators
// ============================================================================

macro_rules! impl_binary_op {
    ($($op:ident, $method:ident, $assign:ident);* $(;)?) => {$(
        impl<B: Widen<O>, O: RawInt, const F: u32> $op for FixedPoint<B, O, F> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self::Output {
                let mut result = self;
                result.$assign(rhs);
                result
            }
        }
    )*};
}

impl_binary_op!(
    Add, add, add_assign;
    Sub, sub, sub_assign;
    Mul, mul, mul_assign;
    Div, div, div_assign;
    Rem, rem, rem_assign;
);

impl<B: Widen<O>, O: RawInt, const F: u32> Neg for FixedPoint<B, O, F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::from_raw(self.raw.wrapping_neg())
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Sum for FixedPoint<B, O, F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Product for FixedPoint<B, O, F> {
    /// Folds from the first element, so all-fractional layouts, where
    /// `one()` is not representable, still multiply correctly.
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(Mul::mul).unwrap_or_else(Self::one)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<B: Widen<O>, O: RawInt, const F: u32> Clone for FixedPoint<B, O, F> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Copy for FixedPoint<B, O, F> {}

impl<B: Widen<O>, O: RawInt, const F: u32> Default for FixedPoint<B, O, F> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> PartialEq for FixedPoint<B, O, F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Eq for FixedPoint<B, O, F> {}

impl<B: Widen<O>, O: RawInt, const F: u32> PartialOrd for FixedPoint<B, O, F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Ord for FixedPoint<B, O, F> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Hash for FixedPoint<B, O, F> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Zero for FixedPoint<B, O, F> {
    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.raw == B::ZERO
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> One for FixedPoint<B, O, F> {
    /// Same caveat as the inherent [`one`](FixedPoint::one).
    #[inline]
    fn one() -> Self {
        Self::from_raw(B::ONE << F as usize)
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> Bounded for FixedPoint<B, O, F> {
    #[inline]
    fn min_value() -> Self {
        Self::MIN
    }

    #[inline]
    fn max_value() -> Self {
        Self::MAX
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> From<FixedPoint<B, O, F>> for f64 {
    #[inline]
    fn from(value: FixedPoint<B, O, F>) -> Self {
        value.to_f64()
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> From<FixedPoint<B, O, F>> for f32 {
    #[inline]
    fn from(value: FixedPoint<B, O, F>) -> Self {
        value.to_f32()
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<B: Widen<O>, O: RawInt, const F: u32> fmt::Debug for FixedPoint<B, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedPoint<{}>({}, raw={})", Self::FORMAT, self, self.raw)
    }
}

impl<B: Widen<O>, O: RawInt, const F: u32> fmt::Display for FixedPoint<B, O, F> {
    /// Renders the `f64` equivalent; width and precision flags are honoured.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

#[cfg(feature = "serde")]
impl<B: Widen<O>, O: RawInt, const F: u32> serde::Serialize for FixedPoint<B, O, F> {
    /// Serialized as the human-readable numeric string.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl<B: Widen<O>, O: RawInt, const F: u32> FixedPoint<B, O, F> {
    /// Convert from rust_decimal::Decimal.
    ///
    /// # Errors
    /// - `PrecisionLoss` if `d` is not a multiple of `2^-FRAC_BITS`
    /// - `Overflow` / `Underflow` if the value is out of range
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        use rust_decimal::prelude::ToPrimitive;

        let out_of_range = if d.is_sign_negative() {
            NumericError::Underflow
        } else {
            NumericError::Overflow
        };

        let scale = rust_decimal::Decimal::from(1u64 << F);
        let scaled = d.checked_mul(scale).ok_or(out_of_range)?;
        if !scaled.fract().is_zero() {
            return Err(NumericError::PrecisionLoss);
        }

        let wide = scaled.to_i128().ok_or(out_of_range)?;
        num_traits::cast::<i128, B>(wide)
            .map(Self::from_raw)
            .ok_or(out_of_range)
    }

    /// Convert to rust_decimal::Decimal.
    ///
    /// Exact whenever `raw × 5^FRAC_BITS` fits a decimal mantissa with at most
    /// 28 fractional digits; otherwise rounded by decimal division.
    pub fn to_decimal(self) -> rust_decimal::Decimal {
        let raw: i128 = self.raw.as_();
        if F <= 28 {
            let exact = 5i128
                .checked_pow(F)
                .and_then(|pow5| raw.checked_mul(pow5))
                .and_then(|mantissa| {
                    rust_decimal::Decimal::try_from_i128_with_scale(mantissa, F).ok()
                });
            if let Some(d) = exact {
                return d;
            }
        }
        rust_decimal::Decimal::from_i128_with_scale(raw, 0)
            / rust_decimal::Decimal::from(1u64 << F)
    }
}

// ============================================================================
// Tests
// ============================================================================
