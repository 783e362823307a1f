//! Report comparison engine.
//!
//! Diffs a current normalized report against the previous run's report for
//! the same tool, producing a delta of error counts and a percentage change.
//! Absence is first-class and three-way: consumers distinguish "no prior
//! baseline" from "baseline exists but no numeric value", so the wire encoding
//! of absent fields (the literal string `"null"`) is preserved exactly.

use crate::report::NormalizedReport;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Wire marker for an absent count or percentage.
const ABSENT: &str = "null";

/// Error-count delta between two runs of one tool.
///
/// Serializes with the stored-artifact field names `errorsThen`, `errorsNow`
/// and `percentageChange`; present counts are JSON numbers, the percentage is
/// a formatted string, and absent values are the string `"null"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub errors_then: Option<i64>,
    pub errors_now: Option<i64>,
    pub percentage_change: Option<f64>,
}

impl Delta {
    /// Delta with every field absent.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            errors_then: None,
            errors_now: None,
            percentage_change: None,
        }
    }
}

/// Compares a current report against the previous one.
///
/// - Both present: percentage change is `(then - now) / then`, rounded to
///   three decimal places on serialization. A sentinel `then == -1` marks an
///   unknown baseline and leaves the percentage at 0 instead of dividing, as
///   does `then == 0` (nothing meaningful to divide by).
/// - Only current present: previous count and percentage are absent.
/// - Current absent: treated as if neither existed. A run that produced no
///   usable output cannot be meaningfully compared, even when a baseline
///   exists.
#[must_use]
pub fn diff(current: Option<&NormalizedReport>, previous: Option<&NormalizedReport>) -> Delta {
    match (current, previous) {
        (Some(cur), Some(prev)) => {
            let then = prev.metrics.errors;
            let now = cur.metrics.errors;
            let mut percentage = 0.0;
            if then != -1 && then != 0 {
                #[allow(clippy::cast_precision_loss)]
                {
                    percentage = (then - now) as f64 / then as f64;
                }
            }
            Delta {
                errors_then: Some(then),
                errors_now: Some(now),
                percentage_change: Some(percentage),
            }
        }
        (Some(cur), None) => Delta {
            errors_then: None,
            errors_now: Some(cur.metrics.errors),
            percentage_change: None,
        },
        (None, _) => Delta::absent(),
    }
}

/// Formats a percentage the way the stored artifacts expect: up to three
/// decimal places with trailing zeros (and a bare trailing dot) trimmed, so
/// `0.5` stays `0.5` and `0.0` becomes `0`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    let rounded = format!("{value:.3}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

impl Serialize for Delta {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        match self.errors_then {
            Some(n) => map.serialize_entry("errorsThen", &n)?,
            None => map.serialize_entry("errorsThen", ABSENT)?,
        }
        match self.errors_now {
            Some(n) => map.serialize_entry("errorsNow", &n)?,
            None => map.serialize_entry("errorsNow", ABSENT)?,
        }
        match self.percentage_change {
            Some(p) => map.serialize_entry("percentageChange", &format_percentage(p))?,
            None => map.serialize_entry("percentageChange", ABSENT)?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_percentage(0.5), "0.5");
        assert_eq!(format_percentage(0.0), "0");
        assert_eq!(format_percentage(1.0), "1");
        assert_eq!(format_percentage(-0.25), "-0.25");
        assert_eq!(format_percentage(1.0 / 3.0), "0.333");
    }

    #[test]
    fn negative_rounds_to_zero() {
        // -0.0001 rounds to "-0.000"; must not surface as "-"
        assert_eq!(format_percentage(-0.0001), "0");
    }
}
