// ============================================================================
// Scalar Input
// Plain numbers accepted by fixed-point assignment
// ============================================================================

use super::errors::{FixedPointError, FixedPointResult};
use num_bigint::BigInt;
use num_traits::{Float, Zero};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A number that can be assigned into a fixed-point value.
///
/// Integers are scaled exactly. Reals and decimals are scaled exactly and
/// then truncated toward zero; nothing is ever rounded.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(BigInt),
    Real(f64),
    Decimal(Decimal),
}

impl Scalar {
    /// Scale by `2^frac_width` and truncate toward zero.
    ///
    /// # Errors
    /// Returns `InvalidInput` for NaN and infinite reals.
    pub fn to_stored(&self, frac_width: i32) -> FixedPointResult<BigInt> {
        debug_assert!(frac_width >= 0);
        let frac = frac_width as usize;
        match self {
            Scalar::Integer(value) => Ok(value << frac),
            Scalar::Real(value) => real_to_stored(*value, frac_width),
            Scalar::Decimal(value) => {
                let scaled = BigInt::from(value.mantissa()) << frac;
                let divisor = num_traits::pow(BigInt::from(10u8), value.scale() as usize);
                // BigInt division truncates toward zero
                Ok(scaled / divisor)
            }
        }
    }
}

/// Exact `trunc(value * 2^frac_width)` via the IEEE-754 decomposition,
/// so wide fractional formats never overflow an intermediate float.
fn real_to_stored(value: f64, frac_width: i32) -> FixedPointResult<BigInt> {
    if !value.is_finite() {
        return Err(FixedPointError::InvalidInput(format!(
            "{} is not a finite number",
            value
        )));
    }
    if value == 0.0 {
        return Ok(BigInt::zero());
    }

    let (mantissa, exponent, sign) = Float::integer_decode(value);
    let magnitude = BigInt::from(mantissa);
    let shift = exponent as i64 + frac_width as i64;
    let magnitude = if shift >= 0 {
        magnitude << shift as usize
    } else {
        // Magnitude is non-negative, so flooring here truncates toward zero
        magnitude >> (-shift) as usize
    };

    Ok(if sign < 0 { -magnitude } else { magnitude })
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(value) => write!(f, "{}", value),
            Scalar::Real(value) => write!(f, "{:?}", value),
            Scalar::Decimal(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                #[inline]
                fn from(value: $t) -> Self {
                    Scalar::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Scalar {
    fn from(value: BigInt) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Real(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Real(value as f64)
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Decimal(value)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for Scalar {
    type Err = FixedPointError;

    /// Parse a plain number.
    ///
    /// # Examples
    /// - "-12" -> Integer(-12)
    /// - "3.25" -> Decimal(3.25), exact
    /// - "1e-3" -> Real(0.001)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FixedPointError::InvalidInput("empty string".to_string()));
        }
        // BigInt and Decimal parsers both skip digit separators
        if s.contains('_') {
            return Err(FixedPointError::InvalidInput(format!(
                "digit separators are not allowed in '{}'",
                s
            )));
        }

        if let Ok(integer) = s.parse::<BigInt>() {
            return Ok(Scalar::Integer(integer));
        }
        if let Ok(decimal) = Decimal::from_str_exact(s) {
            return Ok(Scalar::Decimal(decimal));
        }
        match s.parse::<f64>() {
            Ok(real) if real.is_finite() => Ok(Scalar::Real(real)),
            _ => Err(FixedPointError::InvalidInput(format!(
                "could not parse '{}' as a number",
                s
            ))),
        }
    }
}
