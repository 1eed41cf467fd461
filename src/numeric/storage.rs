// ============================================================================
// Raw Storage Types
// Integer types usable as fixed-point storage and as widened scratch space
// ============================================================================

use num_traits::{
    AsPrimitive, CheckedAdd, CheckedMul, CheckedNeg, CheckedSub, ConstOne, ConstZero, PrimInt,
    WrappingAdd, WrappingMul, WrappingNeg, WrappingSub,
};
use std::fmt;
use std::hash::Hash;

mod sealed {
    pub trait Sealed {}
}

/// Primitive integer usable as the raw representation of a fixed-point value.
///
/// Sealed: implemented for every built-in integer from 8 to 128 bits, signed
/// and unsigned. The 128-bit types only make sense as the widened side of a
/// [`Widen`] pair.
pub trait RawInt:
    sealed::Sealed
    + PrimInt
    + ConstZero
    + ConstOne
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + WrappingNeg
    + CheckedAdd
    + CheckedSub
    + CheckedMul
    + CheckedNeg
    + AsPrimitive<f32>
    + AsPrimitive<f64>
    + AsPrimitive<i128>
    + Hash
    + Default
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// Width of the type in bits.
    const BITS: u32;

    /// Whether `>>` is an arithmetic (sign-extending) shift.
    const SIGNED: bool;

    /// Smallest representable raw value.
    const MIN: Self;

    /// Largest representable raw value.
    const MAX: Self;

    /// Remainder that wraps instead of panicking on `MIN % -1`.
    ///
    /// Still panics on a zero divisor, like the native operator.
    fn wrapping_rem(self, rhs: Self) -> Self;

    /// Truncate `value` toward zero and keep the low bits, like an integer
    /// cast. NaN maps to zero.
    fn wrapping_from_f64(value: f64) -> Self;

    /// Native `as` cast from `i128`, keeping the low bits.
    fn wrapping_from_i128(value: i128) -> Self;
}

/// A storage type together with an overflow type wide enough to hold the
/// full product of two storage values.
///
/// Only implemented where `O` has at least twice the bits of `Self` and the
/// same signedness, so an undersized scratch type is a compile error.
pub trait Widen<O: RawInt>: RawInt {
    /// Sign- or zero-extend into the overflow type.
    fn widen(self) -> O;

    /// Truncate back to the storage width, keeping the low bits.
    fn narrow(wide: O) -> Self;
}

macro_rules! impl_raw_int {
    ($($t:ty => $signed:expr),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl RawInt for $t {
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = $signed;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn wrapping_rem(self, rhs: Self) -> Self {
                <$t>::wrapping_rem(self, rhs)
            }

            #[inline]
            fn wrapping_from_f64(value: f64) -> Self {
                value as i128 as $t
            }

            #[inline]
            fn wrapping_from_i128(value: i128) -> Self {
                value as $t
            }
        }
    )*};
}

impl_raw_int!(
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    i128 => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    u128 => false,
);

macro_rules! impl_widen {
    ($base:ty => $($wide:ty),+) => {$(
        impl Widen<$wide> for $base {
            #[inline]
            fn widen(self) -> $wide {
                self as $wide
            }

            #[inline]
            fn narrow(wide: $wide) -> Self {
                wide as $base
            }
        }
    )+};
}

impl_widen!(i8 => i16, i32, i64, i128);
impl_widen!(i16 => i32, i64, i128);
impl_widen!(i32 => i64, i128);
impl_widen!(i64 => i128);
impl_widen!(u8 => u16, u32, u64, u128);
impl_widen!(u16 => u32, u64, u128);
impl_widen!(u32 => u64, u128);
impl_widen!(u64 => u128);
