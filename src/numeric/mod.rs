// ============================================================================
// Numeric Module
// Bit-accurate simulation of signed binary fixed-point arithmetic
// ============================================================================
//
// This module provides:
// - FormatDescriptor / Format: (total_bits, frac_width) and its unset state
// - FixedPointValue: scaled BigInt payload with checked assignment
// - OverflowGuard: format-derived bounds of the stored integer
// - Arithmetic with Matlab-style format propagation (+, -, *, unary -)
// - Format sizing helpers for a range of magnitudes
//
// Design principles:
// - Stored integers are arbitrary precision; no width is too large
// - Inputs are truncated toward zero, never rounded
// - Overflow is checked on assign/resize only, never on arithmetic results
// - All fallible operations return Result; operators panic like checked_*.expect

mod errors;
mod fixed_point;
mod format;
mod guard;
mod ops;
mod scalar;
mod sizing;

pub use errors::{FixedPointError, FixedPointResult, OverflowReport};
pub use fixed_point::FixedPointValue;
pub use format::{Format, FormatDescriptor};
pub use guard::OverflowGuard;
pub use scalar::Scalar;
pub use sizing::{required_format, significant_bit_place};
