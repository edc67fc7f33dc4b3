//! # Validation Results
//!
//! Every checker returns a fresh [`GdtValidationResult`]: a set of summable
//! counters, a list of self-contained issues, and the numbers the position
//! engine computed along the way.
//!
//! ## Counting Rules
//!
//! Each check lands in exactly one bucket:
//!
//! ```text
//! record_pass     → total_checks += 1, passed   += 1   (optionally with an INFO issue)
//! record_failure  → total_checks += 1, failed   += 1   (ERROR issue)
//! record_warning  → total_checks += 1, warnings += 1   (WARNING issue)
//! annotate        → no count change                    (INFO issue)
//! ```
//!
//! so `passed + failed + warnings ≤ total_checks` holds for every result and
//! for any sum of results.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "total_checks": 3,
//!   "passed": 3,
//!   "failed": 0,
//!   "warnings": 0,
//!   "issues": [
//!     {
//!       "severity": "INFO",
//!       "check_type": "position_bonus",
//!       "message": "MMC bonus 0.020 available on hole ⌀0.500 ±0.010; total position tolerance 0.030",
//!       "standard_reference": "ASME Y14.5-2018 Section 10"
//!     }
//!   ],
//!   "bonus_tolerance": 0.02,
//!   "total_tolerance": 0.03,
//!   "virtual_condition": 0.48
//! }
//! ```

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Issue severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Diagnostic only
    Info,
    /// Discouraged but legal
    Warning,
    /// A GD&T rule is violated
    Error,
    /// Reserved for other validators; never emitted by this engine
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One finding. Issues never reference each other and serialize on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,

    /// Stable tag, e.g. `position_bonus` or `perpendicularity_datum`
    pub check_type: String,

    pub message: String,

    /// Drawing location of the callout, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// What to change on the drawing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    pub standard_reference: String,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        check_type: impl Into<String>,
        message: impl Into<String>,
        standard_reference: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            severity,
            check_type: check_type.into(),
            message: message.into(),
            location: None,
            suggestion: None,
            standard_reference: standard_reference.into(),
        }
    }

    pub fn info(check_type: impl Into<String>, message: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(Severity::Info, check_type, message, reference)
    }

    pub fn warning(check_type: impl Into<String>, message: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(Severity::Warning, check_type, message, reference)
    }

    pub fn error(check_type: impl Into<String>, message: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(Severity::Error, check_type, message, reference)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.check_type, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

/// Check counters. Summable across any number of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationCounts {
    pub total_checks: u32,
    pub passed: u32,
    pub failed: u32,
    pub warnings: u32,
}

impl ValidationCounts {
    /// `passed + failed + warnings ≤ total_checks`
    pub fn is_consistent(&self) -> bool {
        self.passed + self.failed + self.warnings <= self.total_checks
    }
}

impl Add for ValidationCounts {
    type Output = ValidationCounts;

    fn add(self, rhs: ValidationCounts) -> ValidationCounts {
        ValidationCounts {
            total_checks: self.total_checks + rhs.total_checks,
            passed: self.passed + rhs.passed,
            failed: self.failed + rhs.failed,
            warnings: self.warnings + rhs.warnings,
        }
    }
}

impl AddAssign for ValidationCounts {
    fn add_assign(&mut self, rhs: ValidationCounts) {
        *self = *self + rhs;
    }
}

impl Sum for ValidationCounts {
    fn sum<I: Iterator<Item = ValidationCounts>>(iter: I) -> Self {
        iter.fold(ValidationCounts::default(), Add::add)
    }
}

/// Outcome of validating one feature control frame (or one checker call).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GdtValidationResult {
    #[serde(flatten)]
    pub counts: ValidationCounts,

    #[serde(default)]
    pub issues: Vec<ValidationIssue>,

    /// Extra tolerance earned by an MMC/LMC modifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_tolerance: Option<f64>,

    /// Stated tolerance plus bonus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tolerance: Option<f64>,

    /// Measured diametral position deviation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_deviation: Option<f64>,

    /// Worst-case functional boundary (gage size)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_condition: Option<f64>,

    /// Opposite worst-case boundary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultant_condition: Option<f64>,
}

impl GdtValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a passing check, optionally with an INFO issue explaining it.
    pub fn record_pass(&mut self, issue: Option<ValidationIssue>) {
        self.counts.total_checks += 1;
        self.counts.passed += 1;
        self.issues.extend(issue);
    }

    /// Count a failing check.
    pub fn record_failure(&mut self, issue: ValidationIssue) {
        self.counts.total_checks += 1;
        self.counts.failed += 1;
        self.issues.push(issue);
    }

    /// Count a check that passed with reservations.
    pub fn record_warning(&mut self, issue: ValidationIssue) {
        self.counts.total_checks += 1;
        self.counts.warnings += 1;
        self.issues.push(issue);
    }

    /// Attach a diagnostic without counting a check.
    pub fn annotate(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Fold another result into this one.
    ///
    /// Counts add, issues append in order, and each computed field takes the
    /// other result's value when it has one.
    pub fn merge(&mut self, other: GdtValidationResult) {
        self.counts += other.counts;
        self.issues.extend(other.issues);
        self.bonus_tolerance = other.bonus_tolerance.or(self.bonus_tolerance);
        self.total_tolerance = other.total_tolerance.or(self.total_tolerance);
        self.position_deviation = other.position_deviation.or(self.position_deviation);
        self.virtual_condition = other.virtual_condition.or(self.virtual_condition);
        self.resultant_condition = other.resultant_condition.or(self.resultant_condition);
    }

    /// Fill in the location on every issue that lacks one.
    pub fn stamp_location(&mut self, location: &str) {
        for issue in self.issues.iter_mut().filter(|i| i.location.is_none()) {
            issue.location = Some(location.to_string());
        }
    }

    pub fn total_checks(&self) -> u32 {
        self.counts.total_checks
    }

    pub fn passed(&self) -> u32 {
        self.counts.passed
    }

    pub fn failed(&self) -> u32 {
        self.counts.failed
    }

    pub fn warnings(&self) -> u32 {
        self.counts.warnings
    }

    /// No check failed
    pub fn passes(&self) -> bool {
        self.counts.failed == 0
    }

    /// Highest severity among the issues
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }

    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn find_issue(&self, check_type: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.check_type == check_type)
    }
}

/// Format a length for messages: six decimals, trailing zeros trimmed down
/// to a minimum of three (0.48 → "0.480", 0.0301 → "0.0301").
pub(crate) fn fmt_len(value: f64) -> String {
    let mut s = format!("{:.6}", value);
    while let Some(dot) = s.find('.') {
        if s.len() - dot - 1 > 3 && s.ends_with('0') {
            s.pop();
        } else {
            break;
        }
    }
    s
}
