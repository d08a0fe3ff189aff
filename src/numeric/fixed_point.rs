// ============================================================================
// Fixed-Point Value
// Scaled integer plus format, with checked assignment and usage tracking
// ============================================================================

use super::errors::{FixedPointError, FixedPointResult};
use super::format::{Format, FormatDescriptor};
use super::guard::OverflowGuard;
use super::scalar::Scalar;
use crate::tracking::{TrackingSwitch, UsageTracker};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::cell::OnceCell;
use std::fmt;

/// Simulated hardware fixed-point register.
///
/// Holds a stored two's-complement integer whose real value is
/// `stored / 2^frac_width`. There are three ways to put a value in:
///
/// - [`assign`](Self::assign): from a plain number, checked for overflow
/// - [`copy_from`](Self::copy_from): from a value of the *same* format,
///   adopting that format if this value has none yet
/// - [`resize_from`](Self::resize_from): from a value of *any* format,
///   rescaled into this one and checked for overflow
///
/// Arithmetic (`+`, `-`, `*`, unary `-`) never mutates its operands and
/// never checks for overflow; results get a format wide enough for any
/// operand values. Fit them into a register with `resize_from`.
///
/// # Example
/// ```
/// use fixedpnt_sim::numeric::FixedPointValue;
///
/// let mut a = FixedPointValue::new(4, 1).unwrap();
/// let mut b = FixedPointValue::new(4, 1).unwrap();
/// a.assign(-3).unwrap();
/// b.assign(3).unwrap();
///
/// let product = &a * &b;
/// assert_eq!(product.format().as_tuple(), Some((8, 6, 2)));
/// assert_eq!(product.to_f64().unwrap(), -9.0);
/// ```
#[derive(Debug, Clone)]
pub struct FixedPointValue {
    format: Format,
    stored: Option<BigInt>,
    /// Bounds for `format`, computed on first use
    guard: OnceCell<OverflowGuard>,
    tracker: UsageTracker,
    tracking: TrackingSwitch,
    log_overflows: bool,
}

impl FixedPointValue {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an unassigned value with a fixed format.
    ///
    /// # Errors
    /// Returns `InvalidFormat` if `total_bits < 1` or `frac_width < 0`.
    pub fn new(total_bits: i32, frac_width: i32) -> FixedPointResult<Self> {
        Ok(Self::with_format(Format::Fixed(FormatDescriptor::new(
            total_bits, frac_width,
        )?)))
    }

    /// Create a value whose format is inherited from the first `copy_from`.
    pub fn unformatted() -> Self {
        Self::with_format(Format::Unset)
    }

    /// Create a value with a fixed format and assign `value` to it.
    pub fn with_value(
        total_bits: i32,
        frac_width: i32,
        value: impl Into<Scalar>,
    ) -> FixedPointResult<Self> {
        let mut fp = Self::new(total_bits, frac_width)?;
        fp.assign(value)?;
        Ok(fp)
    }

    /// General constructor with every part optional.
    ///
    /// Both widths fix the format, neither leaves it unset. A value is
    /// assigned immediately, which needs a format.
    ///
    /// # Errors
    /// - `InvalidInput` if only one of the widths is given
    /// - `UnsetFormat` if a value is given without widths
    /// - anything `new` or `assign` can return
    pub fn create(
        total_bits: Option<i32>,
        frac_width: Option<i32>,
        value: Option<Scalar>,
    ) -> FixedPointResult<Self> {
        let mut fp = match (total_bits, frac_width) {
            (Some(total_bits), Some(frac_width)) => Self::new(total_bits, frac_width)?,
            (None, None) => Self::unformatted(),
            _ => {
                return Err(FixedPointError::InvalidInput(
                    "total_bits and frac_width must be given together".to_string(),
                ))
            }
        };
        if let Some(value) = value {
            fp.assign(value)?;
        }
        Ok(fp)
    }

    /// Attach a tracking switch, replacing the value's own.
    pub fn with_tracking(mut self, tracking: TrackingSwitch) -> Self {
        self.tracking = tracking;
        self
    }

    /// Enable or disable the `warn!` emitted when an overflow is rejected.
    pub fn with_overflow_logging(mut self, enabled: bool) -> Self {
        self.log_overflows = enabled;
        self
    }

    fn with_format(format: Format) -> Self {
        Self {
            format,
            stored: None,
            guard: OnceCell::new(),
            tracker: UsageTracker::new(),
            tracking: TrackingSwitch::disabled(),
            log_overflows: true,
        }
    }

    /// Arithmetic result: stored integer taken as-is, nothing tracked yet.
    pub(crate) fn derived(
        format: FormatDescriptor,
        stored: BigInt,
        tracking: TrackingSwitch,
        log_overflows: bool,
    ) -> Self {
        let mut fp = Self::with_format(Format::Fixed(format));
        fp.stored = Some(stored);
        fp.tracking = tracking;
        fp.log_overflows = log_overflows;
        fp
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Stored (scaled) integer, if a value was ever assigned.
    #[inline]
    pub fn stored_int(&self) -> Option<&BigInt> {
        self.stored.as_ref()
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.stored.is_some()
    }

    #[inline]
    pub fn tracking(&self) -> &TrackingSwitch {
        &self.tracking
    }

    #[inline]
    pub(crate) fn log_overflows(&self) -> bool {
        self.log_overflows
    }

    /// Overflow bounds for the current format.
    pub fn guard(&self) -> FixedPointResult<&OverflowGuard> {
        let format = self.format.require()?;
        Ok(self.guard.get_or_init(|| OverflowGuard::new(format)))
    }

    /// Smallest and largest assignable real values.
    pub fn limits(&self) -> FixedPointResult<(f64, f64)> {
        let guard = self.guard()?;
        let format = guard.format();
        Ok((
            format.stored_to_f64(guard.min_stored()),
            format.stored_to_f64(guard.max_stored()),
        ))
    }

    /// Format and stored integer of a value used as an operand.
    pub(crate) fn operand(&self) -> FixedPointResult<(FormatDescriptor, &BigInt)> {
        let format = self.format.require()?;
        let stored = self.stored.as_ref().ok_or(FixedPointError::Unassigned)?;
        Ok((format, stored))
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Assign a plain number, truncating toward zero.
    ///
    /// On failure the previously stored value is kept.
    ///
    /// # Errors
    /// - `UnsetFormat` if the format was never set
    /// - `InvalidInput` for NaN or infinite reals
    /// - `Overflow` if the scaled value does not fit the format
    pub fn assign(&mut self, value: impl Into<Scalar>) -> FixedPointResult<&mut Self> {
        let value = value.into();
        let format = self.format.require()?;
        let stored = value.to_stored(format.frac_width())?;
        self.store_checked(stored, || value.to_string())?;
        Ok(self)
    }

    /// Copy `other`'s stored integer verbatim.
    ///
    /// An unformatted value adopts `other`'s format first. A formatted one
    /// must already have exactly that format. No overflow check is made:
    /// the source is by definition valid for its own format.
    ///
    /// # Errors
    /// - `UnsetFormat` / `Unassigned` if `other` has no format or value
    /// - `FormatMismatch` if both formats are set and differ
    pub fn copy_from(&mut self, other: &FixedPointValue) -> FixedPointResult<&mut Self> {
        let (source_format, stored) = other.operand()?;

        match self.format {
            Format::Unset => {
                tracing::debug!("Inheriting fixed-point format {}", source_format);
                self.format = Format::Fixed(source_format);
            }
            Format::Fixed(own) if own != source_format => {
                return Err(FixedPointError::FormatMismatch {
                    expected: own,
                    found: source_format,
                });
            }
            Format::Fixed(_) => {}
        }

        self.stored = Some(stored.clone());
        self.track();
        Ok(self)
    }

    /// Rescale `other` into this value's format, then check for overflow.
    ///
    /// A wider target fraction shifts in zero bits. A narrower one drops
    /// the excess low bits (two's-complement truncation, toward -inf).
    ///
    /// # Errors
    /// - `UnsetFormat` if this value has no format
    /// - `UnsetFormat` / `Unassigned` if `other` has no format or value
    /// - `Overflow` if the rescaled value does not fit
    pub fn resize_from(&mut self, other: &FixedPointValue) -> FixedPointResult<&mut Self> {
        let target = self.format.require()?;
        let (source_format, stored) = other.operand()?;

        let shift = target.frac_width() - source_format.frac_width();
        let resized = if shift >= 0 {
            stored << shift as usize
        } else {
            tracing::debug!(
                "Resize {} -> {} drops {} fractional bits",
                source_format,
                target,
                -shift
            );
            stored >> (-shift) as usize
        };

        self.store_checked(resized, || other.to_string())?;
        Ok(self)
    }

    fn store_checked<F>(&mut self, stored: BigInt, attempted: F) -> FixedPointResult<()>
    where
        F: FnOnce() -> String,
    {
        if let Err(err) = self.guard()?.check(&stored, attempted) {
            if let (true, FixedPointError::Overflow(report)) = (self.log_overflows, &err) {
                tracing::warn!(
                    attempted = %report.attempted,
                    stored = %report.stored,
                    format = %report.format,
                    min_stored = %report.min_stored,
                    max_stored = %report.max_stored,
                    "Fixed-point overflow rejected ({:.3}x the bound)",
                    report.excess_ratio()
                );
            }
            return Err(err);
        }

        self.stored = Some(stored);
        self.track();
        Ok(())
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    fn track(&mut self) {
        if !self.tracking.is_enabled() {
            return;
        }
        if let Some(stored) = &self.stored {
            self.tracker.observe(stored);
            tracing::trace!("Tracked stored integer {}", stored);
        }
    }

    /// `(min_assigned, max_assigned)` as stored integers.
    pub fn tracked_stored_range(&self) -> Option<(&BigInt, &BigInt)> {
        self.tracker.range()
    }

    /// Smallest and largest real values tracked so far.
    pub fn tracked_range(&self) -> Option<(f64, f64)> {
        let format = self.format.descriptor()?;
        let (min, max) = self.tracker.range()?;
        Some((format.stored_to_f64(min), format.stored_to_f64(max)))
    }

    /// Tracked extremes as fractions of the format's own extremes.
    ///
    /// `(min_assigned / min_stored, max_assigned / max_stored)`; a value of
    /// `1.0` means that end of the dynamic range was fully used.
    ///
    /// `None` for a 1-bit format, whose `max_stored` is zero.
    pub fn relative_tracked_range(&self) -> Option<(f64, f64)> {
        let guard = self.guard().ok()?;
        if guard.max_stored().is_zero() {
            return None;
        }
        let (min, max) = self.tracker.range()?;
        Some((
            ratio(min, guard.min_stored()),
            ratio(max, guard.max_stored()),
        ))
    }

    pub fn reset_tracking(&mut self) {
        self.tracker.reset();
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Real value, `stored / 2^frac_width`.
    pub fn to_f64(&self) -> FixedPointResult<f64> {
        let (format, stored) = self.operand()?;
        Ok(format.stored_to_f64(stored))
    }

    /// Integer part, truncated toward zero.
    pub fn to_integer(&self) -> FixedPointResult<BigInt> {
        let (format, stored) = self.operand()?;
        Ok(stored / (BigInt::one() << format.frac_width() as usize))
    }

    /// Exact decimal value.
    ///
    /// # Errors
    /// Returns `PrecisionLoss` if `frac_width > 28` or the exact value does
    /// not fit a `Decimal` mantissa.
    pub fn to_decimal(&self) -> FixedPointResult<Decimal> {
        let (format, stored) = self.operand()?;
        let frac = format.frac_width() as u32;
        if frac > 28 {
            return Err(FixedPointError::PrecisionLoss);
        }

        // stored / 2^f == stored * 5^f / 10^f
        let mantissa = stored * num_traits::pow(BigInt::from(5u8), frac as usize);
        let mantissa = mantissa.to_i128().ok_or(FixedPointError::PrecisionLoss)?;
        Decimal::try_from_i128_with_scale(mantissa, frac)
            .map_err(|_| FixedPointError::PrecisionLoss)
    }

    /// Two's-complement digits of the stored integer, `total_bits` wide.
    ///
    /// `None` if the value was never assigned.
    pub fn to_binary_string(&self) -> Option<String> {
        let (format, stored) = self.operand().ok()?;
        let width = format.total_bits() as usize;
        let bits = if stored.is_negative() {
            (BigInt::one() << width) + stored
        } else {
            stored.clone()
        };
        Some(format!("{:0width$b}", bits, width = width))
    }

    /// Binary digits with the binary point inserted.
    ///
    /// If the format has no integer bits (`frac_width > total_bits`), the
    /// missing leading digits are shown as `x`: a `(4, -2, 6)` value
    /// renders as `x.xx0101`.
    pub fn to_binary_string_punctuated(&self) -> Option<String> {
        let digits = self.to_binary_string()?;
        let int_width = self.format.descriptor()?.int_width();

        if int_width >= 0 {
            let (int_part, frac_part) = digits.split_at(int_width as usize);
            Some(format!("{}.{}", int_part, frac_part))
        } else {
            Some(format!("x.{}{}", "x".repeat((-int_width) as usize), digits))
        }
    }
}

fn ratio(numerator: &BigInt, denominator: &BigInt) -> f64 {
    let n = numerator.to_f64().unwrap_or(f64::NAN);
    let d = denominator.to_f64().unwrap_or(f64::NAN);
    n / d
}

impl fmt::Display for FixedPointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_f64() {
            Ok(value) => write!(f, "{:?} {}", value, self.format),
            Err(_) => write!(f, "<unassigned> {}", self.format),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
