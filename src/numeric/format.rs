// ============================================================================
// Q Format
// Runtime description of a fixed-point layout (Qm.n notation)
// ============================================================================

use super::errors::{NumericError, NumericResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout of a binary fixed-point value: sign, integer bits, fractional bits.
///
/// Every [`FixedPoint`](super::FixedPoint) instantiation exposes its layout
/// as the `FORMAT` constant. `QFormat::new` builds and validates one at
/// runtime, e.g. when choosing a precision for a
/// [`DynFixed`](super::DynFixed).
///
/// For signed layouts the sign bit is not counted in `integer_bits`, so a
/// 16-bit signed layout with 8 fractional bits is `Q7.8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedQFormat"))]
pub struct QFormat {
    /// Whether the storage is two's complement signed
    pub signed: bool,

    /// Bits left of the binary point (sign bit excluded)
    pub integer_bits: u32,

    /// Bits right of the binary point
    pub frac_bits: u32,
}

/// Deserialized fields, validated through [`QFormat::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct UncheckedQFormat {
    signed: bool,
    integer_bits: u32,
    frac_bits: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedQFormat> for QFormat {
    type Error = NumericError;

    fn try_from(raw: UncheckedQFormat) -> NumericResult<Self> {
        let total_bits = raw
            .integer_bits
            .checked_add(raw.frac_bits)
            .and_then(|bits| bits.checked_add(raw.signed as u32))
            .ok_or(NumericError::InvalidScale)?;
        Self::new(total_bits, raw.frac_bits, raw.signed)
    }
}

/// Storage widths a fixed-point layout may use.
const SUPPORTED_WIDTHS: [u32; 4] = [8, 16, 32, 64];

impl QFormat {
    /// Build a layout for `total_bits` of storage.
    ///
    /// # Errors
    /// Returns `InvalidScale` if the width is not 8, 16, 32 or 64 bits, or if
    /// `frac_bits` leaves no room in the storage.
    pub fn new(total_bits: u32, frac_bits: u32, signed: bool) -> NumericResult<Self> {
        if !SUPPORTED_WIDTHS.contains(&total_bits) || frac_bits >= total_bits {
            return Err(NumericError::InvalidScale);
        }
        Ok(Self::for_storage(total_bits, frac_bits, signed))
    }

    /// Layout of a storage type whose width was already checked.
    pub(crate) const fn for_storage(total_bits: u32, frac_bits: u32, signed: bool) -> Self {
        Self {
            signed,
            integer_bits: total_bits.saturating_sub(frac_bits + signed as u32),
            frac_bits,
        }
    }

    /// Total storage width, including the sign bit.
    #[inline]
    pub const fn total_bits(&self) -> u32 {
        self.integer_bits + self.frac_bits + self.signed as u32
    }

    /// Scaling factor `2^frac_bits`.
    #[inline]
    pub fn scale(&self) -> f64 {
        2f64.powi(self.frac_bits as i32)
    }

    /// Smallest representable step, `2^-frac_bits`.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.scale().recip()
    }

    /// Largest representable value.
    pub fn max_value(&self) -> f64 {
        let magnitude_bits = self.integer_bits + self.frac_bits;
        (2f64.powi(magnitude_bits as i32) - 1.0) / self.scale()
    }

    /// Smallest representable value (zero for unsigned layouts).
    pub fn min_value(&self) -> f64 {
        if self.signed {
            -(2f64.powi(self.integer_bits as i32))
        } else {
            0.0
        }
    }

    /// Whether `value` lies within `[min_value, max_value]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }
}

impl fmt::Display for QFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.signed { "Q" } else { "UQ" };
        write!(f, "{}{}.{}", prefix, self.integer_bits, self.frac_bits)
    }
}
