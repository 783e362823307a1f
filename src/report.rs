//! Normalized report shapes.
//!
//! Every tool run collapses into the same structure: a metrics summary plus a
//! per-file list of findings. The serialized field names (`report`, `metrics`,
//! `errors`, `buildStatus`) are part of the stored-artifact contract and must
//! not change.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One reported problem at a location in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub line: u32,
    /// Severity/priority marker in the tool's own vocabulary
    /// ("warning", "3", "error", ...).
    pub severity: String,
    pub message: String,
}

/// Summary numbers for a single tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Total error/violation count across all files.
    pub errors: i64,
    /// Build outcome, only produced by the build runner.
    #[serde(
        rename = "buildStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub build_status: Option<String>,
}

/// The tool-agnostic result of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    /// File path -> findings, in tool-output document order.
    pub report: IndexMap<String, Vec<Finding>>,
    pub metrics: Metrics,
}

impl NormalizedReport {
    /// Report with the given error count and no findings.
    #[must_use]
    pub fn with_errors(errors: i64) -> Self {
        Self {
            metrics: Metrics {
                errors,
                build_status: None,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn finding_count(&self) -> usize {
        self.report.values().map(Vec::len).sum()
    }
}

/// Aggregate of one run's per-tool reports, keyed by tool name.
///
/// A tool that produced no usable output is stored as an explicit JSON null so
/// the run is still visible in the artifact. This document replaces the
/// previous one wholesale after each run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectReport(pub IndexMap<String, Option<NormalizedReport>>);

impl ProjectReport {
    /// Parses a stored report document.
    ///
    /// # Errors
    /// Returns the underlying JSON error; callers treat an unparsable previous
    /// report as "no previous report".
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The report for one tool, if that tool ran and produced output.
    ///
    /// A stored null entry (tool ran, no usable output) reads as absent.
    #[must_use]
    pub fn get(&self, tool: &str) -> Option<&NormalizedReport> {
        self.0.get(tool).and_then(Option::as_ref)
    }

    pub fn insert(&mut self, tool: String, report: Option<NormalizedReport>) {
        self.0.insert(tool, report);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
