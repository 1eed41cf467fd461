// ============================================================================
// Numeric Module
// Binary fixed-point arithmetic without floating-point hardware
// ============================================================================
//
// This module provides:
// - FixedPoint<B, O, FRAC_BITS>: fixed-point value with compile-time scale
// - DynFixed<B, O>: fixed-point value with a runtime scale
// - RawInt / Widen: storage and widened scratch integer traits
// - QFormat: runtime description of a layout
// - NumericError: error type for checked operations
// - Fp16/Fp32 type aliases and literal constructors
//
// Design principles:
// - Floats only at the construction/conversion boundary
// - Default operators never signal errors; checked_* variants return Result
// - Multiply/divide go through a type at least twice as wide as the storage
// - Scale is part of the type, so mismatched scales do not compile

mod dynamic;
mod errors;
mod fixed_point;
mod format;
mod literals;
mod storage;

pub use dynamic::{DynFixed, DynFp16, DynFp32};
pub use errors::{NumericError, NumericResult};
pub use fixed_point::FixedPoint;
pub use format::QFormat;
pub use literals::{fp16, fp32, FixedLiteral, Fp16, Fp32};
pub use storage::{RawInt, Widen};
