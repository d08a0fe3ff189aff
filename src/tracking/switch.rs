// ============================================================================
// Tracking Switch
// Shared on/off handle for min/max usage tracking
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared handle deciding whether attached values record their usage.
///
/// Every value holds a clone of the switch it was created with. Values
/// created from the same [`FixedPointContext`](crate::config::FixedPointContext)
/// share one switch, so flipping it takes effect on all of them for the
/// next assignment. Values are not synchronized; toggling while another
/// thread assigns is the caller's problem.
#[derive(Debug, Clone, Default)]
pub struct TrackingSwitch(Arc<AtomicBool>);

impl TrackingSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn enabled() -> Self {
        Self::new(true)
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    /// True if both handles control the same switch.
    pub fn same_switch(&self, other: &TrackingSwitch) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
