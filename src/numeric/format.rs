// ============================================================================
// Fixed-Point Format
// Bit-width descriptor and the unset/fixed format state of a value
// ============================================================================

use super::errors::{FixedPointError, FixedPointResult};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Signed binary fixed-point format.
///
/// A value in this format is a two's-complement integer of `total_bits`
/// bits (sign included) whose real value is `stored / 2^frac_width`.
/// `frac_width` may exceed `total_bits`, in which case `int_width` is
/// negative and the value has no integer bits at all.
///
/// # Example
/// ```
/// use fixedpnt_sim::numeric::FormatDescriptor;
///
/// let q = FormatDescriptor::new(4, 1).unwrap();
/// assert_eq!(q.as_tuple(), (4, 3, 1));
/// assert_eq!(q.limits(), (-4.0, 3.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatDescriptor {
    total_bits: i32,
    frac_width: i32,
}

impl FormatDescriptor {
    /// Create a format from total width (sign included) and fractional width.
    ///
    /// # Errors
    /// Returns `InvalidFormat` if `total_bits < 1` or `frac_width < 0`.
    pub fn new(total_bits: i32, frac_width: i32) -> FixedPointResult<Self> {
        if total_bits < 1 || frac_width < 0 {
            return Err(FixedPointError::InvalidFormat {
                total_bits,
                frac_width,
            });
        }
        Ok(Self {
            total_bits,
            frac_width,
        })
    }

    /// Build a format from integer and fractional widths.
    ///
    /// Only used for arithmetic results, whose widths are derived from
    /// already-valid operands and therefore always satisfy `new`'s checks.
    pub(crate) fn from_widths(int_width: i32, frac_width: i32) -> Self {
        debug_assert!(frac_width >= 0 && int_width + frac_width >= 1);
        Self {
            total_bits: int_width + frac_width,
            frac_width,
        }
    }

    #[inline]
    pub const fn total_bits(&self) -> i32 {
        self.total_bits
    }

    #[inline]
    pub const fn frac_width(&self) -> i32 {
        self.frac_width
    }

    /// Width left of the binary point, sign bit included. May be negative.
    #[inline]
    pub const fn int_width(&self) -> i32 {
        self.total_bits - self.frac_width
    }

    /// `(total_bits, int_width, frac_width)`
    #[inline]
    pub const fn as_tuple(&self) -> (i32, i32, i32) {
        (self.total_bits, self.int_width(), self.frac_width)
    }

    /// Largest stored integer: `2^(total_bits-1) - 1`.
    pub fn max_stored(&self) -> BigInt {
        (BigInt::one() << (self.total_bits - 1) as usize) - 1
    }

    /// Smallest stored integer: `-2^(total_bits-1)`.
    pub fn min_stored(&self) -> BigInt {
        -(BigInt::one() << (self.total_bits - 1) as usize)
    }

    /// Weight of the least significant bit, `2^-frac_width`.
    pub fn resolution(&self) -> f64 {
        (-(self.frac_width as f64)).exp2()
    }

    /// Smallest and largest representable real values.
    pub fn limits(&self) -> (f64, f64) {
        (
            self.stored_to_f64(&self.min_stored()),
            self.stored_to_f64(&self.max_stored()),
        )
    }

    /// Real value of a stored integer in this format.
    pub(crate) fn stored_to_f64(&self, stored: &BigInt) -> f64 {
        // Drop low bits beyond f64 range first, then apply the rest of the
        // scale in steps so 2^-frac never underflows on its own.
        let excess = (stored.bits() as i64 - 1000).clamp(0, self.frac_width as i64);
        let mut value = (stored >> excess as usize).to_f64().unwrap_or(f64::NAN);
        let mut remaining = self.frac_width - excess as i32;
        while remaining > 0 {
            let step = remaining.min(1000);
            value *= (-(step as f64)).exp2();
            remaining -= step;
        }
        value
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.total_bits,
            self.int_width(),
            self.frac_width
        )
    }
}

/// Format state of a value.
///
/// A value created without widths starts `Unset` and becomes `Fixed` the
/// first time it inherits a format through
/// [`FixedPointValue::copy_from`](super::FixedPointValue::copy_from).
/// Once fixed, the format never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    #[default]
    Unset,
    Fixed(FormatDescriptor),
}

impl Format {
    #[inline]
    pub const fn is_set(&self) -> bool {
        matches!(self, Format::Fixed(_))
    }

    #[inline]
    pub const fn descriptor(&self) -> Option<FormatDescriptor> {
        match self {
            Format::Unset => None,
            Format::Fixed(descriptor) => Some(*descriptor),
        }
    }

    /// The concrete format, or `UnsetFormat`.
    #[inline]
    pub fn require(&self) -> FixedPointResult<FormatDescriptor> {
        self.descriptor().ok_or(FixedPointError::UnsetFormat)
    }

    /// `(total_bits, int_width, frac_width)` if set.
    pub fn as_tuple(&self) -> Option<(i32, i32, i32)> {
        self.descriptor().map(|d| d.as_tuple())
    }
}

impl From<FormatDescriptor> for Format {
    fn from(descriptor: FormatDescriptor) -> Self {
        Format::Fixed(descriptor)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Unset => write!(f, "(unset)"),
            Format::Fixed(descriptor) => fmt::Display::fmt(descriptor, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_format() {
        let q = FormatDescriptor::new(32, 16).unwrap();
        assert_eq!(q.total_bits(), 32);
        assert_eq!(q.frac_width(), 16);
        assert_eq!(q.int_width(), 16);
    }

    #[test]
    fn test_frac_wider_than_total() {
        let q = FormatDescriptor::new(4, 6).unwrap();
        assert_eq!(q.as_tuple(), (4, -2, 6));
        assert_eq!(q.limits(), (-8.0 / 64.0, 7.0 / 64.0));
    }

    #[test]
    fn test_new_invalid_format() {
        assert_eq!(
            FormatDescriptor::new(0, 0),
            Err(FixedPointError::InvalidFormat {
                total_bits: 0,
                frac_width: 0
            })
        );
        assert!(FormatDescriptor::new(8, -1).is_err());
    }

    #[test]
    fn test_stored_bounds() {
        let q = FormatDescriptor::new(3, 0).unwrap();
        assert_eq!(q.max_stored(), BigInt::from(3));
        assert_eq!(q.min_stored(), BigInt::from(-4));

        let one_bit = FormatDescriptor::new(1, 0).unwrap();
        assert_eq!(one_bit.max_stored(), BigInt::from(0));
        assert_eq!(one_bit.min_stored(), BigInt::from(-1));

        let wide = FormatDescriptor::new(200, 0).unwrap();
        assert_eq!(wide.max_stored().bits(), 199);
    }

    #[test]
    fn test_limits() {
        let q = FormatDescriptor::new(32, 20).unwrap();
        let (lo, hi) = q.limits();
        assert!((lo + 2048.0).abs() < 1e-6);
        assert!((hi - 2048.0).abs() < 1e-6);
    }

    #[test]
    fn test_resolution() {
        assert_eq!(FormatDescriptor::new(8, 3).unwrap().resolution(), 0.125);
        assert_eq!(FormatDescriptor::new(8, 0).unwrap().resolution(), 1.0);
    }

    #[test]
    fn test_wide_frac_scaling() {
        let q = FormatDescriptor::new(2100, 2050).unwrap();
        let stored = BigInt::one() << 2049usize;
        assert_eq!(q.stored_to_f64(&stored), 0.5);
    }

    #[test]
    fn test_format_state() {
        let unset = Format::default();
        assert!(!unset.is_set());
        assert_eq!(unset.require(), Err(FixedPointError::UnsetFormat));
        assert_eq!(unset.as_tuple(), None);
        assert_eq!(unset.to_string(), "(unset)");

        let fixed = Format::from(FormatDescriptor::new(5, 0).unwrap());
        assert!(fixed.is_set());
        assert_eq!(fixed.as_tuple(), Some((5, 5, 0)));
        assert_eq!(fixed.to_string(), "(5, 5, 0)");
    }
}
