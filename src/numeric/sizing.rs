// ============================================================================
// Format Sizing
// Minimal fixed-point format for a range of magnitudes
// ============================================================================

use super::errors::{FixedPointError, FixedPointResult};
use super::format::FormatDescriptor;
use num_bigint::BigInt;
use num_traits::FromPrimitive;

/// Nudge so exact powers of two land on the same place as values just below.
const PLACE_EPSILON: f64 = 1.000_000_1;

/// Place of the most significant bit of `|x|`.
///
/// Positive: bit length of the integer part (`33 -> 6`, `0b100001`).
/// Negative: minus the bit length of the integer part of `1/|x|`
/// (`1/33 -> -6`, `0b0.000001111100001`).
///
/// # Errors
/// Returns `InvalidInput` for zero, NaN and infinite inputs.
pub fn significant_bit_place(x: f64) -> FixedPointResult<i32> {
    if !x.is_finite() || x == 0.0 {
        return Err(FixedPointError::InvalidInput(format!(
            "bit place of {} is undefined",
            x
        )));
    }

    let mut magnitude = x.abs() * PLACE_EPSILON;
    let sign = if magnitude < 1.0 {
        magnitude = 1.0 / magnitude;
        -1
    } else {
        1
    };

    // 1/x can overflow for subnormal x
    let integer_part = BigInt::from_f64(magnitude.trunc()).ok_or_else(|| {
        FixedPointError::InvalidInput(format!("bit place of {} is out of range", x))
    })?;
    Ok(integer_part.bits() as i32 * sign)
}

/// Smallest format that resolves `smallest_magnitude` and holds
/// `largest_magnitude`.
///
/// `frac_width = -place(smallest)`, clamped at zero; `total_bits =
/// place(largest) + frac_width + 2`, one bit for sign plus one guard bit.
///
/// # Example
/// ```
/// use fixedpnt_sim::numeric::required_format;
///
/// let q = required_format(0.001, 220_000.0).unwrap();
/// assert_eq!((q.total_bits(), q.frac_width()), (30, 10));
/// ```
///
/// # Errors
/// Returns `InvalidInput` if either magnitude is zero or not finite, or if
/// `|smallest| > |largest|`.
pub fn required_format(
    smallest_magnitude: f64,
    largest_magnitude: f64,
) -> FixedPointResult<FormatDescriptor> {
    if smallest_magnitude.abs() > largest_magnitude.abs() {
        return Err(FixedPointError::InvalidInput(format!(
            "smallest magnitude {} exceeds largest magnitude {}",
            smallest_magnitude, largest_magnitude
        )));
    }

    let smallest_place = significant_bit_place(smallest_magnitude)?;
    let largest_place = significant_bit_place(largest_magnitude)?;

    let frac_width = (-smallest_place).max(0);
    FormatDescriptor::new(largest_place + frac_width + 2, frac_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_bit_place_examples() {
        assert_eq!(significant_bit_place(33.0).unwrap(), 6);
        assert_eq!(significant_bit_place(1.0 / 33.0).unwrap(), -6);
        assert_eq!(significant_bit_place(-33.0).unwrap(), 6);
        assert_eq!(significant_bit_place(1.0).unwrap(), 1);
        assert_eq!(significant_bit_place(0.5).unwrap(), -1);
        assert_eq!(significant_bit_place(0.3).unwrap(), -2);
    }

    #[test]
    fn test_bit_place_powers_of_two() {
        // 8.0 and 7.999... agree thanks to the epsilon nudge
        assert_eq!(significant_bit_place(8.0).unwrap(), 4);
        assert_eq!(significant_bit_place(7.9999999).unwrap(), 4);
        assert_eq!(significant_bit_place(0.125).unwrap(), -3);
        assert_eq!(significant_bit_place(0.1250001).unwrap(), -3);
        assert_eq!(significant_bit_place(0.12).unwrap(), -4);
    }

    #[test]
    fn test_bit_place_invalid() {
        assert!(significant_bit_place(0.0).is_err());
        assert!(significant_bit_place(f64::NAN).is_err());
        assert!(significant_bit_place(f64::INFINITY).is_err());
    }

    #[test]
    fn test_bit_place_huge() {
        assert_eq!(significant_bit_place(1e300).unwrap(), 997);
        assert_eq!(significant_bit_place(1e-300).unwrap(), -997);
    }

    #[test]
    fn test_required_format() {
        let q = required_format(0.001, 220_000.0).unwrap();
        assert_eq!(q.as_tuple(), (30, 20, 10));

        let q = required_format(0.001, 22_000.0).unwrap();
        assert_eq!(q.as_tuple(), (27, 17, 10));
    }

    #[test]
    fn test_required_format_integer_resolution() {
        // No fractional bits needed once the smallest step is >= 1
        let q = required_format(4.0, 100.0).unwrap();
        assert_eq!(q.as_tuple(), (9, 9, 0));
    }

    #[test]
    fn test_required_format_invalid() {
        assert!(required_format(0.0, 1.0).is_err());
        assert!(required_format(2.0, 1.0).is_err());
        assert!(required_format(0.5, f64::NAN).is_err());
    }

    quickcheck! {
        fn prop_required_format_holds_largest(small: u16, large: u32) -> bool {
            let smallest = (small as f64 + 1.0) / 65_536.0;
            let largest = 1.0 + large as f64;
            let q = match required_format(smallest, largest) {
                Ok(q) => q,
                Err(_) => return false,
            };
            let (lo, hi) = q.limits();
            lo <= -largest && hi >= largest && q.resolution() <= smallest
        }
    }
}
