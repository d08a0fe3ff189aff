// ============================================================================
// Bit Growth Example
// ============================================================================

use fixedpnt_sim::prelude::*;

fn main() -> FixedPointResult<()> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt::init();

    println!("=== Fixed-Point Bit Growth Example ===\n");

    let ctx = FixedPointContext::new(SimulationConfig::tracking())?;

    let mut a = ctx.value(64, 8)?;
    let mut b = ctx.value(64, 8)?;
    // Format comes from the first value copied in
    let mut c = ctx.unformatted();

    println!("Simulating 100000 steps of c = a +/- b ...");
    for j in 0..100_000i64 {
        a.assign(j)?;
        b.assign(2.2 * j as f64)?;
        if j > 50_000 {
            c.copy_from(&(&a - &b))?;
        } else {
            c.copy_from(&(&a + &b))?;
        }
    }

    println!("\nTracked ranges:");
    for (name, value) in [("a", &a), ("b", &b), ("c", &c)] {
        println!(
            "  {}: {:?}  relative {:?}",
            name,
            value.tracked_range(),
            value.relative_tracked_range()
        );
    }
    println!("\nc inherited format {}", c.format());
    println!("c = {} ({})", c, c.to_binary_string_punctuated().unwrap_or_default());

    // What the datapath actually needs
    let q = required_format(0.001, 220_000.0)?;
    println!("\nFormat for steps of 0.001 up to 220000: {}", q);

    let mut report = UsageReport::new();
    report.record("a", &a).record("b", &b).record("c", &c);
    println!("\n{}", report);

    // Fitting c into the suggested register
    if let Some(suggested) = report.get("c").and_then(|entry| entry.suggested_format) {
        let mut register = ctx.value(suggested.total_bits(), suggested.frac_width())?;
        register.resize_from(&c)?;
        println!("c resized into {}: {}", suggested, register);
    }

    // Too narrow: rejected, previous contents kept
    let mut narrow = ctx.value(16, 8)?;
    match narrow.resize_from(&c) {
        Ok(_) => println!("unexpected fit: {}", narrow),
        Err(err) => println!("rejected: {}", err),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
