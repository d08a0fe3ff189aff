// ============================================================================
// Fixed-Point Errors
// Error types for format-checked fixed-point operations
// ============================================================================

use super::format::FormatDescriptor;
use num_bigint::BigInt;
use std::fmt;

/// Diagnostic snapshot of a rejected assignment or resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowReport {
    /// The value the caller tried to store, as rendered at the call site
    pub attempted: String,
    /// Scaled integer computed from `attempted`
    pub stored: BigInt,
    /// Target format
    pub format: FormatDescriptor,
    /// Smallest stored integer the format admits
    pub min_stored: BigInt,
    /// Largest stored integer the format admits
    pub max_stored: BigInt,
}

impl OverflowReport {
    /// Position of the stored integer relative to the bound it crossed.
    ///
    /// `1.5` means "one and a half times the maximum". Only meant for
    /// diagnostics, so lossy float conversion is fine here.
    pub fn excess_ratio(&self) -> f64 {
        use num_traits::{Signed, ToPrimitive};

        let bound = if self.stored.is_negative() {
            &self.min_stored
        } else {
            &self.max_stored
        };
        let stored = self.stored.to_f64().unwrap_or(f64::NAN);
        let bound = bound.to_f64().unwrap_or(f64::NAN);
        stored / bound
    }
}

/// Errors that can occur while assigning, resizing or combining fixed-point values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    /// Stored integer falls outside the signed range of the target format
    Overflow(Box<OverflowReport>),
    /// Inherited copy between two formatted values whose formats differ
    FormatMismatch {
        expected: FormatDescriptor,
        found: FormatDescriptor,
    },
    /// Negating the most negative stored value of a format
    UnrepresentableNegation { format: FormatDescriptor },
    /// Input is not a finite integer or real number
    InvalidInput(String),
    /// Operation needs a concrete format but the value's format is still unset
    UnsetFormat,
    /// Requested widths do not describe a usable format
    InvalidFormat { total_bits: i32, frac_width: i32 },
    /// Operand has a format but no value was ever assigned to it
    Unassigned,
    /// Conversion would lose significant bits
    PrecisionLoss,
}

impl fmt::Display for FixedPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedPointError::Overflow(report) => write!(
                f,
                "overflow: {} scales to stored integer {} which is outside [{}, {}] for format {}",
                report.attempted, report.stored, report.min_stored, report.max_stored, report.format
            ),
            FixedPointError::FormatMismatch { expected, found } => write!(
                f,
                "format mismatch: target has format {} but source has format {}",
                expected, found
            ),
            FixedPointError::UnrepresentableNegation { format } => write!(
                f,
                "cannot negate the minimum stored value of format {}",
                format
            ),
            FixedPointError::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            FixedPointError::UnsetFormat => write!(f, "fixed-point format is not set"),
            FixedPointError::InvalidFormat {
                total_bits,
                frac_width,
            } => write!(
                f,
                "invalid format: total_bits={} frac_width={} (need total_bits >= 1 and frac_width >= 0)",
                total_bits, frac_width
            ),
            FixedPointError::Unassigned => write!(f, "fixed-point value has never been assigned"),
            FixedPointError::PrecisionLoss => write!(
                f,
                "precision loss: conversion would lose significant bits"
            ),
        }
    }
}

impl std::error::Error for FixedPointError {}

/// Result type alias for fixed-point operations
pub type FixedPointResult<T> = Result<T, FixedPointError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stored: i64) -> OverflowReport {
        let format = FormatDescriptor::new(3, 0).unwrap();
        OverflowReport {
            attempted: stored.to_string(),
            stored: BigInt::from(stored),
            format,
            min_stored: format.min_stored(),
            max_stored: format.max_stored(),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FixedPointError::UnsetFormat.to_string(),
            "fixed-point format is not set"
        );
        assert_eq!(
            FixedPointError::Overflow(Box::new(report(4))).to_string(),
            "overflow: 4 scales to stored integer 4 which is outside [-4, 3] for format (3, 3, 0)"
        );
    }

    #[test]
    fn test_format_mismatch_display() {
        let err = FixedPointError::FormatMismatch {
            expected: FormatDescriptor::new(5, 0).unwrap(),
            found: FormatDescriptor::new(4, 0).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "format mismatch: target has format (5, 5, 0) but source has format (4, 4, 0)"
        );
    }

    #[test]
    fn test_excess_ratio() {
        assert!((report(6).excess_ratio() - 2.0).abs() < 1e-12);
        assert!((report(-8).excess_ratio() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(FixedPointError::Unassigned, FixedPointError::Unassigned);
        assert_ne!(FixedPointError::Unassigned, FixedPointError::UnsetFormat);
    }
}
