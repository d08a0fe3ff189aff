// ============================================================================
// Usage Tracker
// Running extremes of the stored integers a value has held
// ============================================================================

use num_bigint::BigInt;

/// Minimum and maximum stored integer observed so far.
///
/// Empty until the first observation; there are no sentinel extremes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageTracker {
    range: Option<(BigInt, BigInt)>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the tracked range to include `stored`.
    pub fn observe(&mut self, stored: &BigInt) {
        match &mut self.range {
            None => self.range = Some((stored.clone(), stored.clone())),
            Some((min, max)) => {
                if *stored < *min {
                    *min = stored.clone();
                }
                if *stored > *max {
                    *max = stored.clone();
                }
            }
        }
    }

    /// `(min_assigned, max_assigned)` if anything was observed.
    pub fn range(&self) -> Option<(&BigInt, &BigInt)> {
        self.range.as_ref().map(|(min, max)| (min, max))
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    pub fn reset(&mut self) {
        self.range = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker() {
        let tracker = UsageTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.range(), None);
    }

    #[test]
    fn test_running_extremes() {
        let mut tracker = UsageTracker::new();
        for stored in [5, 9, 1, -3, 2] {
            tracker.observe(&BigInt::from(stored));
        }
        assert_eq!(
            tracker.range(),
            Some((&BigInt::from(-3), &BigInt::from(9)))
        );
    }

    #[test]
    fn test_first_observation_sets_both_ends() {
        let mut tracker = UsageTracker::new();
        tracker.observe(&BigInt::from(-7));
        assert_eq!(
            tracker.range(),
            Some((&BigInt::from(-7), &BigInt::from(-7)))
        );
    }

    #[test]
    fn test_reset() {
        let mut tracker = UsageTracker::new();
        tracker.observe(&BigInt::from(1));
        tracker.reset();
        assert!(tracker.is_empty());
    }
}
