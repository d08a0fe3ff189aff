// ============================================================================
// Usage Report
// Side-by-side view of tracked ranges and the formats they call for
// ============================================================================

use crate::numeric::{required_format, FixedPointValue, Format, FormatDescriptor};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of one value's format and usage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsageEntry {
    pub name: String,
    pub format: Format,
    /// Representable range of `format`
    pub limits: Option<(f64, f64)>,
    /// Extremes actually assigned
    pub tracked_range: Option<(f64, f64)>,
    /// Tracked extremes relative to the format's extremes
    pub relative_range: Option<(f64, f64)>,
    /// Smallest format holding the tracked range at the current resolution
    pub suggested_format: Option<FormatDescriptor>,
}

impl UsageEntry {
    pub fn capture(name: impl Into<String>, value: &FixedPointValue) -> Self {
        let tracked_range = value.tracked_range();
        let suggested_format = match (value.format().descriptor(), tracked_range) {
            (Some(format), Some((min, max))) => suggest(format, min, max),
            _ => None,
        };

        Self {
            name: name.into(),
            format: value.format(),
            limits: value.limits().ok(),
            tracked_range,
            relative_range: value.relative_tracked_range(),
            suggested_format,
        }
    }

    /// Bits the current format spends beyond the suggested one.
    pub fn spare_bits(&self) -> Option<i32> {
        let current = self.format.descriptor()?;
        let suggested = self.suggested_format?;
        Some(current.total_bits() - suggested.total_bits())
    }
}

fn suggest(format: FormatDescriptor, min: f64, max: f64) -> Option<FormatDescriptor> {
    let largest = min.abs().max(max.abs());
    if largest == 0.0 {
        return None;
    }
    required_format(format.resolution(), largest).ok()
}

/// Collection of usage snapshots, typically taken after a simulation run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsageReport {
    entries: Vec<UsageEntry>,
}

impl UsageReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `value` under `name`.
    pub fn record(&mut self, name: impl Into<String>, value: &FixedPointValue) -> &mut Self {
        let entry = UsageEntry::capture(name, value);
        tracing::debug!(
            "Usage of {}: format {} tracked {:?}",
            entry.name,
            entry.format,
            entry.tracked_range
        );
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&UsageEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the report as pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn pair(range: Option<(f64, f64)>, precision: usize) -> (String, String) {
    match range {
        Some((lo, hi)) => (
            format!("{:.*}", precision, lo),
            format!("{:.*}", precision, hi),
        ),
        None => ("-".to_string(), "-".to_string()),
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>14} {:>14} {:>14} {:>9} {:>9} {:>14}",
            "name", "format", "min", "max", "rel_min", "rel_max", "suggested"
        )?;
        for entry in &self.entries {
            let (min, max) = pair(entry.tracked_range, 6);
            let (rel_min, rel_max) = pair(entry.relative_range, 6);
            let suggested = entry
                .suggested_format
                .map(|q| q.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<12} {:>14} {:>14} {:>14} {:>9} {:>9} {:>14}",
                entry.name,
                entry.format.to_string(),
                min,
                max,
                rel_min,
                rel_max,
                suggested
            )?;
        }
        Ok(())
    }
}
