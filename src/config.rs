// ============================================================================
// Simulation Configuration
// Tracking and default-format settings, and the context that applies them
// ============================================================================

use crate::numeric::{FixedPointError, FixedPointResult, FixedPointValue, FormatDescriptor, Scalar};
use crate::tracking::TrackingSwitch;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// Settings shared by all values of one simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Record min/max of every assignment
    pub track_min_max: bool,

    /// Optional: format for values created without explicit widths,
    /// as `(total_bits, frac_width)`
    pub default_format: Option<(i32, i32)>,

    /// Emit a `warn!` for every rejected overflow
    pub log_overflows: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            track_min_max: false,
            default_format: None,
            log_overflows: true,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Enable or disable min/max tracking
    pub fn with_tracking(mut self, enabled: bool) -> Self {
        self.track_min_max = enabled;
        self
    }

    /// Builder method: Set the default format
    pub fn with_default_format(mut self, total_bits: i32, frac_width: i32) -> Self {
        self.default_format = Some((total_bits, frac_width));
        self
    }

    /// Builder method: Enable or disable overflow warnings
    pub fn with_overflow_logging(mut self, enabled: bool) -> Self {
        self.log_overflows = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> FixedPointResult<()> {
        if let Some((total_bits, frac_width)) = self.default_format {
            FormatDescriptor::new(total_bits, frac_width)?;
        }
        Ok(())
    }

    /// Range-finding run: tracking on
    pub fn tracking() -> Self {
        Self::new().with_tracking(true)
    }

    /// Quiet run: no tracking, no overflow warnings
    pub fn quiet() -> Self {
        Self::new().with_overflow_logging(false)
    }
}

// ============================================================================
// Context
// ============================================================================

/// Factory for values that share one configuration and tracking switch.
///
/// # Example
/// ```
/// use fixedpnt_sim::config::{FixedPointContext, SimulationConfig};
///
/// let ctx = FixedPointContext::new(SimulationConfig::tracking()).unwrap();
/// let mut x = ctx.value(16, 8).unwrap();
/// x.assign(1.5).unwrap();
/// x.assign(-0.25).unwrap();
/// assert_eq!(x.tracked_range(), Some((-0.25, 1.5)));
/// ```
#[derive(Debug, Clone)]
pub struct FixedPointContext {
    config: SimulationConfig,
    default_format: Option<FormatDescriptor>,
    tracking: TrackingSwitch,
}

impl FixedPointContext {
    /// Create a context from a validated configuration.
    pub fn new(config: SimulationConfig) -> FixedPointResult<Self> {
        let default_format = config
            .default_format
            .map(|(total_bits, frac_width)| FormatDescriptor::new(total_bits, frac_width))
            .transpose()?;

        Ok(Self {
            tracking: TrackingSwitch::new(config.track_min_max),
            default_format,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Switch shared by every value this context creates.
    pub fn tracking(&self) -> &TrackingSwitch {
        &self.tracking
    }

    /// Turn tracking on or off for all values of this context.
    pub fn set_tracking(&self, enabled: bool) {
        tracing::debug!("Min/max tracking {}", if enabled { "enabled" } else { "disabled" });
        self.tracking.set(enabled);
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.is_enabled()
    }

    /// Unassigned value with the given format.
    pub fn value(&self, total_bits: i32, frac_width: i32) -> FixedPointResult<FixedPointValue> {
        Ok(self.attach(FixedPointValue::new(total_bits, frac_width)?))
    }

    /// Value with the given format and an initial (tracked) assignment.
    pub fn value_with(
        &self,
        total_bits: i32,
        frac_width: i32,
        value: impl Into<Scalar>,
    ) -> FixedPointResult<FixedPointValue> {
        let mut fp = self.value(total_bits, frac_width)?;
        fp.assign(value)?;
        Ok(fp)
    }

    /// Value whose format is inherited on first `copy_from`.
    pub fn unformatted(&self) -> FixedPointValue {
        self.attach(FixedPointValue::unformatted())
    }

    /// Unassigned value in the configured default format.
    ///
    /// # Errors
    /// Returns `UnsetFormat` if the configuration has no default format.
    pub fn default_value(&self) -> FixedPointResult<FixedPointValue> {
        let format = self.default_format.ok_or(FixedPointError::UnsetFormat)?;
        self.value(format.total_bits(), format.frac_width())
    }

    fn attach(&self, value: FixedPointValue) -> FixedPointValue {
        value
            .with_tracking(self.tracking.clone())
            .with_overflow_logging(self.config.log_overflows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = SimulationConfig::new();
        assert!(!config.track_min_max);
        assert!(config.log_overflows);
        assert_eq!(config.default_format, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulationConfig::tracking()
            .with_default_format(32, 16)
            .with_overflow_logging(false);

        assert!(config.track_min_max);
        assert_eq!(config.default_format, Some((32, 16)));
        assert!(!config.log_overflows);
    }

    #[test]
    fn test_validation() {
        let config = SimulationConfig::new().with_default_format(0, 4);
        assert!(matches!(
            config.validate(),
            Err(FixedPointError::InvalidFormat { .. })
        ));
        assert!(FixedPointContext::new(config).is_err());
    }

    #[test]
    fn test_preset_configs() {
        assert!(SimulationConfig::tracking().track_min_max);
        let quiet = SimulationConfig::quiet();
        assert!(!quiet.track_min_max);
        assert!(!quiet.log_overflows);
    }

    #[test]
    fn test_context_shares_switch() {
        let ctx = FixedPointContext::new(SimulationConfig::new()).unwrap();
        let mut a = ctx.value(8, 0).unwrap();
        let mut b = ctx.unformatted();

        a.assign(10).unwrap();
        assert_eq!(a.tracked_range(), None);

        ctx.set_tracking(true);
        assert!(ctx.is_tracking());
        a.assign(20).unwrap();
        b.copy_from(&a).unwrap();

        assert_eq!(a.tracked_range(), Some((20.0, 20.0)));
        assert_eq!(b.tracked_range(), Some((20.0, 20.0)));
        assert!(a.tracking().same_switch(ctx.tracking()));
    }

    #[test]
    fn test_value_with_tracks_initial_assignment() {
        let ctx = FixedPointContext::new(SimulationConfig::tracking()).unwrap();
        let x = ctx.value_with(8, 2, 1.25).unwrap();
        assert_eq!(x.tracked_range(), Some((1.25, 1.25)));
    }

    #[test]
    fn test_default_value() {
        let ctx =
            FixedPointContext::new(SimulationConfig::new().with_default_format(16, 4)).unwrap();
        let x = ctx.default_value().unwrap();
        assert_eq!(x.format().as_tuple(), Some((16, 12, 4)));

        let bare = FixedPointContext::new(SimulationConfig::new()).unwrap();
        assert!(matches!(
            bare.default_value(),
            Err(FixedPointError::UnsetFormat)
        ));
    }

    #[test]
    fn test_independent_contexts() {
        let on = FixedPointContext::new(SimulationConfig::tracking()).unwrap();
        let off = FixedPointContext::new(SimulationConfig::new()).unwrap();

        let mut a = on.value(8, 0).unwrap();
        let mut b = off.value(8, 0).unwrap();
        a.assign(1).unwrap();
        b.assign(1).unwrap();

        assert!(a.tracked_range().is_some());
        assert!(b.tracked_range().is_none());
    }
}
