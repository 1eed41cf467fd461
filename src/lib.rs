// ============================================================================
// Fixed-Point Library
// Scaled-integer arithmetic for targets without (or avoiding) an FPU
// ============================================================================

//! # Fixed Point
//!
//! A binary fixed-point number type: a raw integer with an implicit binary
//! point `FRAC_BITS` bits from the right.
//!
//! ## Features
//!
//! - **Compile-time scale**: `FRAC_BITS` is a const generic, so values of
//!   different scale are different types
//! - **Widened multiply/divide** through an overflow type at least twice as
//!   wide as the storage
//! - **Floor conversion** to integers via arithmetic shift (`-66.3 → -67`)
//! - **Checked variants** of every operator returning [`numeric::NumericResult`]
//! - **Runtime scale** via [`numeric::DynFixed`] when precision is only known
//!   at runtime
//!
//! ## Example
//!
//! ```rust
//! use fixed_point::prelude::*;
//!
//! let a = fp16(2.5);
//! let b = fp16(4);
//! assert_eq!(a * b, fp16(10));
//! assert_eq!(fp16(10) + fp16(5), fp16(15));
//!
//! // Conversions round toward negative infinity
//! assert_eq!(fp16(66.3).to_int::<i32>(), 66);
//! assert_eq!(fp16(-66.3).to_int::<i32>(), -67);
//!
//! // Checked arithmetic reports what the operators silently wrap
//! assert_eq!(fp16(100).checked_mul(fp16(100)), Err(NumericError::Overflow));
//! ```

pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::numeric::{
        fp16, fp32, DynFixed, DynFp16, DynFp32, FixedLiteral, FixedPoint, Fp16, Fp32,
        NumericError, NumericResult, QFormat,
    };
}
