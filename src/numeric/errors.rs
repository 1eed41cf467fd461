// ============================================================================
// Numeric Errors
// Error types for checked fixed-point operations
// ============================================================================

use std::fmt;

/// Errors reported by the checked and boundary operations.
///
/// The default operators never produce these: they wrap (or panic on a
/// zero divisor) exactly like the underlying integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Result exceeded the storage type's maximum
    Overflow,
    /// Result below the storage type's minimum
    Underflow,
    /// Attempted division by a zero raw value
    DivisionByZero,
    /// Conversion would lose significant digits
    PrecisionLoss,
    /// Input value is not representable at all (NaN, infinity)
    InvalidInput,
    /// Operands carry different fractional-bit counts
    ScaleMismatch,
    /// Fractional-bit count does not fit the storage width
    InvalidScale,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded maximum value")
            },
            NumericError::Underflow => {
                write!(f, "arithmetic underflow: result below minimum value")
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::PrecisionLoss => write!(
                f,
                "precision loss: conversion would lose significant digits"
            ),
            NumericError::InvalidInput => write!(f, "invalid input: value is not finite"),
            NumericError::ScaleMismatch => write!(f, "scale mismatch between operands"),
            NumericError::InvalidScale => write!(
                f,
                "invalid scale: fractional bits must be smaller than the storage width"
            ),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
