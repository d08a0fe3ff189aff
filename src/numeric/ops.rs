// ============================================================================
// Fixed-Point Arithmetic
// Format propagation for +, -, * and unary - (Matlab sizing rules)
// ============================================================================
//
// | op     | int_width                 | frac_width             |
// |--------|---------------------------|------------------------|
// | a + b  | max(a.int, b.int) + 1     | max(a.frac, b.frac)    |
// | a - b  | max(a.int, b.int) + 1     | max(a.frac, b.frac)    |
// | a * b  | a.int + b.int             | a.frac + b.frac        |
// | -a     | a.int                     | a.frac                 |
//
// Results are never overflow-checked. Intermediate bit growth is expected;
// only fitting a result into a register (resize_from) is checked.

use super::errors::{FixedPointError, FixedPointResult};
use super::fixed_point::FixedPointValue;
use super::format::FormatDescriptor;
use num_bigint::BigInt;
use std::ops::{Add, Mul, Neg, Sub};

impl FixedPointValue {
    /// Sum in a format one guard bit wider than the wider operand.
    ///
    /// # Errors
    /// Returns `UnsetFormat` or `Unassigned` if either operand has no value.
    pub fn checked_add(&self, rhs: &FixedPointValue) -> FixedPointResult<FixedPointValue> {
        self.add_sub(rhs, |a, b| a + b)
    }

    /// Difference, sized like `checked_add`.
    ///
    /// # Errors
    /// Returns `UnsetFormat` or `Unassigned` if either operand has no value.
    pub fn checked_sub(&self, rhs: &FixedPointValue) -> FixedPointResult<FixedPointValue> {
        self.add_sub(rhs, |a, b| a - b)
    }

    /// Full-precision product. Widths add up, no alignment needed.
    ///
    /// # Errors
    /// Returns `UnsetFormat` or `Unassigned` if either operand has no value.
    pub fn checked_mul(&self, rhs: &FixedPointValue) -> FixedPointResult<FixedPointValue> {
        let (lf, ls) = self.operand()?;
        let (rf, rs) = rhs.operand()?;

        let format = FormatDescriptor::from_widths(
            lf.int_width() + rf.int_width(),
            lf.frac_width() + rf.frac_width(),
        );
        Ok(self.result(format, ls * rs))
    }

    /// Negation in the same format.
    ///
    /// The result starts with an empty tracker.
    ///
    /// # Errors
    /// - `UnrepresentableNegation` for the format's minimum stored value
    /// - `UnsetFormat` or `Unassigned` if there is no value
    pub fn checked_neg(&self) -> FixedPointResult<FixedPointValue> {
        let (format, stored) = self.operand()?;
        if stored == self.guard()?.min_stored() {
            return Err(FixedPointError::UnrepresentableNegation { format });
        }
        Ok(self.result(format, -stored))
    }

    fn add_sub<F>(&self, rhs: &FixedPointValue, combine: F) -> FixedPointResult<FixedPointValue>
    where
        F: FnOnce(BigInt, BigInt) -> BigInt,
    {
        let (lf, ls) = self.operand()?;
        let (rf, rs) = rhs.operand()?;

        let format = FormatDescriptor::from_widths(
            lf.int_width().max(rf.int_width()) + 1,
            lf.frac_width().max(rf.frac_width()),
        );

        // Align both operands to the result's fractional width
        let frac = format.frac_width();
        let l = ls << (frac - lf.frac_width()) as usize;
        let r = rs << (frac - rf.frac_width()) as usize;

        Ok(self.result(format, combine(l, r)))
    }

    fn result(&self, format: FormatDescriptor, stored: BigInt) -> FixedPointValue {
        FixedPointValue::derived(format, stored, self.tracking().clone(), self.log_overflows())
    }
}

// ============================================================================
// Operator Traits
// ============================================================================

// Infallible operators for ergonomics (panic on unassigned operands or on
// negating the minimum value - use checked_* where that can happen)
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $checked:ident, $what:literal) => {
        impl $trait<&FixedPointValue> for &FixedPointValue {
            type Output = FixedPointValue;

            #[inline]
            fn $method(self, rhs: &FixedPointValue) -> Self::Output {
                match self.$checked(rhs) {
                    Ok(result) => result,
                    Err(err) => panic!("fixed-point {} failed: {}", $what, err),
                }
            }
        }

        impl $trait<FixedPointValue> for FixedPointValue {
            type Output = FixedPointValue;

            #[inline]
            fn $method(self, rhs: FixedPointValue) -> Self::Output {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&FixedPointValue> for FixedPointValue {
            type Output = FixedPointValue;

            #[inline]
            fn $method(self, rhs: &FixedPointValue) -> Self::Output {
                (&self).$method(rhs)
            }
        }

        impl $trait<FixedPointValue> for &FixedPointValue {
            type Output = FixedPointValue;

            #[inline]
            fn $method(self, rhs: FixedPointValue) -> Self::Output {
                self.$method(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, checked_add, "addition");
impl_binary_op!(Sub, sub, checked_sub, "subtraction");
impl_binary_op!(Mul, mul, checked_mul, "multiplication");

impl Neg for &FixedPointValue {
    type Output = FixedPointValue;

    #[inline]
    fn neg(self) -> Self::Output {
        match self.checked_neg() {
            Ok(result) => result,
            Err(err) => panic!("fixed-point negation failed: {}", err),
        }
    }
}

impl Neg for FixedPointValue {
    type Output = FixedPointValue;

    #[inline]
    fn neg(self) -> Self::Output {
        -&self
    }
}
