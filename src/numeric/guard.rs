// ============================================================================
// Overflow Guard
// Format-derived stored-integer bounds and the range check against them
// ============================================================================

use super::errors::{FixedPointError, FixedPointResult, OverflowReport};
use super::format::FormatDescriptor;
use num_bigint::BigInt;

/// Cached signed range of a format's stored integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowGuard {
    format: FormatDescriptor,
    min_stored: BigInt,
    max_stored: BigInt,
}

impl OverflowGuard {
    pub fn new(format: FormatDescriptor) -> Self {
        Self {
            format,
            min_stored: format.min_stored(),
            max_stored: format.max_stored(),
        }
    }

    #[inline]
    pub fn format(&self) -> FormatDescriptor {
        self.format
    }

    #[inline]
    pub fn min_stored(&self) -> &BigInt {
        &self.min_stored
    }

    #[inline]
    pub fn max_stored(&self) -> &BigInt {
        &self.max_stored
    }

    #[inline]
    pub fn contains(&self, stored: &BigInt) -> bool {
        *stored >= self.min_stored && *stored <= self.max_stored
    }

    /// Fail with `Overflow` if `stored` is outside the format's range.
    ///
    /// `attempted` is only evaluated on failure; it renders the caller's
    /// input for the error report.
    pub fn check<F>(&self, stored: &BigInt, attempted: F) -> FixedPointResult<()>
    where
        F: FnOnce() -> String,
    {
        if self.contains(stored) {
            return Ok(());
        }

        Err(FixedPointError::Overflow(Box::new(OverflowReport {
            attempted: attempted(),
            stored: stored.clone(),
            format: self.format,
            min_stored: self.min_stored.clone(),
            max_stored: self.max_stored.clone(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(total_bits: i32, frac_width: i32) -> OverflowGuard {
        OverflowGuard::new(FormatDescriptor::new(total_bits, frac_width).unwrap())
    }

    #[test]
    fn test_bounds() {
        let g = guard(3, 0);
        assert_eq!(g.min_stored(), &BigInt::from(-4));
        assert_eq!(g.max_stored(), &BigInt::from(3));

        // Fraction bits do not change the stored range
        let g = guard(3, 2);
        assert_eq!(g.min_stored(), &BigInt::from(-4));
        assert_eq!(g.max_stored(), &BigInt::from(3));
    }

    #[test]
    fn test_check_boundaries() {
        let g = guard(3, 0);
        for stored in -4..=3 {
            assert!(g.check(&BigInt::from(stored), || unreachable!()).is_ok());
        }
        assert!(g.check(&BigInt::from(4), || "4".to_string()).is_err());
        assert!(g.check(&BigInt::from(-5), || "-5".to_string()).is_err());
    }

    #[test]
    fn test_check_report() {
        let g = guard(4, 1);
        let err = g.check(&BigInt::from(10), || "5".to_string()).unwrap_err();
        match err {
            FixedPointError::Overflow(report) => {
                assert_eq!(report.attempted, "5");
                assert_eq!(report.stored, BigInt::from(10));
                assert_eq!(report.format.as_tuple(), (4, 3, 1));
                assert_eq!(report.min_stored, BigInt::from(-8));
                assert_eq!(report.max_stored, BigInt::from(7));
            }
            other => panic!("expected overflow, got {:?}", other),
        }
    }
}
