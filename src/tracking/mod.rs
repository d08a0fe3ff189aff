// ============================================================================
// Tracking Module
// Min/max usage tracking for fixed-point values
// ============================================================================

mod report;
mod switch;
mod usage;

pub use report::{UsageEntry, UsageReport};
pub use switch::TrackingSwitch;
pub use usage::UsageTracker;
