//! Lint result types.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::violation::{Severity, Violation};

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    /// Path to the linted file.
    pub path: PathBuf,

    /// Violations found in the file, ordered by position.
    pub violations: Vec<Violation>,

    /// Fixes applied before the violations were collected.
    #[serde(skip_serializing_if = "is_zero")]
    pub fixes_applied: usize,

    /// Time spent per rule, when timings are enabled.
    #[serde(skip)]
    pub timings: HashMap<String, Duration>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl LintResult {
    /// Creates a new lint result.
    pub fn new(path: PathBuf, violations: Vec<Violation>) -> Self {
        Self {
            path,
            violations,
            fixes_applied: 0,
            timings: HashMap::new(),
        }
    }

    pub fn with_fixes_applied(mut self, fixes_applied: usize) -> Self {
        self.fixes_applied = fixes_applied;
        self
    }

    pub fn with_timings(mut self, timings: HashMap<String, Duration>) -> Self {
        self.timings = timings;
        self
    }

    /// Returns true if there are any violations.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Returns the number of error-severity violations.
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count()
    }
}

/// Summary of linting multiple files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LintSummary {
    /// Total files processed.
    pub files_checked: usize,

    /// Total violations found.
    pub total_violations: usize,

    /// Files with at least one violation.
    pub files_with_violations: usize,

    /// Fixes applied across all files.
    pub fixes_applied: usize,
}

impl LintSummary {
    /// Creates a summary from results.
    pub fn from_results(results: &[LintResult]) -> Self {
        let mut summary = Self::default();

        for result in results {
            summary.files_checked += 1;
            summary.total_violations += result.violations.len();
            summary.fixes_applied += result.fixes_applied;
            if result.has_violations() {
                summary.files_with_violations += 1;
            }
        }

        summary
    }
}
