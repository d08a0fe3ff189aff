// ============================================================================
// Fixed-Point Simulation Library
// Hardware binary fixed-point arithmetic with format propagation and tracking
// ============================================================================

//! # fixedpnt-sim
//!
//! Bit-accurate simulation of signed binary fixed-point arithmetic, for
//! predicting bit growth and overflow risk of a hardware datapath before
//! it is built.
//!
//! ## Features
//!
//! - **Arbitrary widths**: stored integers are `BigInt`, any format works
//! - **Matlab-style format propagation** for `+`, `-`, `*` and unary `-`
//! - **Overflow checks** on assignment and resize, never on intermediates
//! - **Format inheritance**: unformatted values adopt the first format copied in
//! - **Min/max tracking** of every assignment, with a usage report
//! - **Format sizing** from the smallest step and largest magnitude needed
//!
//! ## Example
//!
//! ```rust
//! use fixedpnt_sim::prelude::*;
//!
//! let ctx = FixedPointContext::new(SimulationConfig::tracking()).unwrap();
//!
//! let mut a = ctx.value(4, 0).unwrap();
//! let mut b = ctx.value(4, 0).unwrap();
//! let mut c = ctx.unformatted();
//!
//! a.assign(2).unwrap();
//! b.assign(3).unwrap();
//! c.copy_from(&(&a + &b)).unwrap();
//!
//! assert_eq!(c.format().as_tuple(), Some((5, 5, 0)));
//! assert_eq!(c.to_f64().unwrap(), 5.0);
//!
//! // Fit the sum back into a 4-bit register
//! let mut r = ctx.value(4, 0).unwrap();
//! assert!(r.resize_from(&c).is_ok());
//! ```

pub mod config;
pub mod numeric;
pub mod tracking;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{FixedPointContext, SimulationConfig};
    pub use crate::numeric::{
        required_format, significant_bit_place, FixedPointError, FixedPointResult,
        FixedPointValue, Format, FormatDescriptor, Scalar,
    };
    pub use crate::tracking::{TrackingSwitch, UsageReport};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;

    #[test]
    fn test_end_to_end_bit_growth() {
        let ctx = FixedPointContext::new(SimulationConfig::tracking()).unwrap();

        let mut a = ctx.value(64, 8).unwrap();
        let mut b = ctx.value(64, 8).unwrap();
        let mut c = ctx.unformatted();

        for j in 0..10_000i64 {
            a.assign(j).unwrap();
            b.assign(2.2 * j as f64).unwrap();
            if j > 5000 {
                c.copy_from(&(&a - &b)).unwrap();
            } else {
                c.copy_from(&(&a + &b)).unwrap();
            }
        }

        assert_eq!(a.tracked_range(), Some((0.0, 9999.0)));
        assert_eq!(b.tracked_range(), Some((0.0, 21997.796875)));
        assert_eq!(c.tracked_range(), Some((-11998.796875, 16000.0)));
        assert_eq!(c.format().as_tuple(), Some((65, 57, 8)));

        let mut report = UsageReport::new();
        report.record("a", &a).record("b", &b).record("c", &c);
        let c_entry = report.get("c").unwrap();
        // 16000 needs 14 integer bits, plus sign and guard
        assert_eq!(c_entry.suggested_format.unwrap().as_tuple(), (24, 16, 8));
    }

    #[test]
    fn test_accumulator_fits_register() {
        let ctx = FixedPointContext::new(SimulationConfig::quiet()).unwrap();

        let coeffs = [0.25, -0.5, 0.75];
        let samples = [1.5, 2.0, -3.25];

        let mut acc = ctx.unformatted();
        for (&coeff, &sample) in coeffs.iter().zip(samples.iter()) {
            let c = ctx.value_with(8, 6, coeff).unwrap();
            let s = ctx.value_with(8, 2, sample).unwrap();
            let product = &c * &s;
            if acc.is_assigned() {
                let sum = &acc + &product;
                acc = ctx.unformatted();
                acc.copy_from(&sum).unwrap();
            } else {
                acc.copy_from(&product).unwrap();
            }
        }
        assert_eq!(acc.to_f64().unwrap(), 0.375 - 1.0 - 2.4375);

        // Register too narrow for the result
        let mut narrow = ctx.value(4, 2).unwrap();
        assert!(matches!(
            narrow.resize_from(&acc),
            Err(FixedPointError::Overflow(_))
        ));

        let mut wide = ctx.value(8, 2).unwrap();
        wide.resize_from(&acc).unwrap();
        assert_eq!(wide.to_f64().unwrap(), -3.25);
    }

    #[test]
    fn test_sized_format_holds_range() {
        let q = required_format(0.01, 300.0).unwrap();
        let mut x = FixedPointValue::new(q.total_bits(), q.frac_width()).unwrap();
        assert!(x.assign(300.0).is_ok());
        assert!(x.assign(-300.0).is_ok());
        assert!(x.resize_from(&FixedPointValue::with_value(16, 8, 0.01).unwrap()).is_ok());
    }
}
