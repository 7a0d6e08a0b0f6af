//! Violations and the aggregate scan report.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};

use crate::passport::Layer;

/// Severity level for conformance violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the scan.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// An architectural conformance violation on one import edge.
///
/// Produced only by the rule engine, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule name (e.g. "Domain Purity").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Logical path of the importing module.
    pub source_module: String,
    /// Layer of the importing module.
    pub source_layer: Layer,
    /// Logical path of the imported module.
    pub target_module: String,
    /// Layer of the imported module.
    pub target_layer: Layer,
    /// Context of the imported module, when it belongs to one.
    pub target_context: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        source_module: impl Into<String>,
        source_layer: Layer,
        target_module: impl Into<String>,
        target_layer: Layer,
        target_context: Option<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            message: message.into(),
            source_module: source_module.into(),
            source_layer,
            target_module: target_module.into(),
            target_layer,
            target_context,
        }
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} ({} -> {})\n",
            self.rule, self.source_module, self.target_module
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        let _ = writeln!(
            output,
            "  = layers: {} -> {}",
            self.source_layer, self.target_layer
        );
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}: {} [{}] {}",
            self.source_module, self.target_module, self.severity, self.rule, self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[allow(dead_code)] // Public API for miette integration
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.rule, v.message),
            help: Some(format!(
                "{} ({}) imports {} ({})",
                v.source_module, v.source_layer, v.target_module, v.target_layer
            )),
        }
    }
}

/// Aggregate result of one scan.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// All violations found, in deterministic order.
    pub violations: Vec<Violation>,
    /// Number of source files scanned.
    pub files_scanned: usize,
    /// Number of files skipped by filters or unreadable.
    pub files_skipped: usize,
    /// Number of files whose syntax could not be parsed.
    pub parse_failures: usize,
}

impl ScanReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any error-severity violations.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity: `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for v in &self.violations {
            match v.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Prints a summary report to stdout.
    pub fn print_report(&self) {
        let (errors, warnings, infos) = self.count_by_severity();

        for violation in &self.violations {
            println!("{}", violation.format());
        }

        println!(
            "\nFound {} error(s), {} warning(s), {} info(s) in {} file(s) ({} skipped, {} unparseable)",
            errors, warnings, infos, self.files_scanned, self.files_skipped, self.parse_failures
        );
    }

    /// Adds counters and violations from another report.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_scanned += other.files_scanned;
        self.files_skipped += other.files_skipped;
        self.parse_failures += other.parse_failures;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "Domain Purity",
            severity,
            "domain must not depend on adapters",
            "billing.domain.order_service",
            Layer::Domain,
            "billing.adapters.driven.db_repo",
            Layer::Adapters,
            Some("billing".into()),
        )
    }

    #[test]
    fn has_errors_checks_severity() {
        let mut report = ScanReport::new();
        report.violations.push(make_violation(Severity::Warning));
        assert!(!report.has_errors());

        report.violations.push(make_violation(Severity::Error));
        assert!(report.has_errors());
    }

    #[test]
    fn count_by_severity_tallies_each() {
        let mut report = ScanReport::new();
        report.violations.push(make_violation(Severity::Error));
        report.violations.push(make_violation(Severity::Error));
        report.violations.push(make_violation(Severity::Info));
        assert_eq!(report.count_by_severity(), (2, 0, 1));
    }

    #[test]
    fn format_names_both_endpoints() {
        let v = make_violation(Severity::Error);
        let formatted = v.format();
        assert!(formatted.contains("billing.domain.order_service"));
        assert!(formatted.contains("billing.adapters.driven.db_repo"));
        assert!(formatted.contains("error"));
    }

    #[test]
    fn extend_merges_counters() {
        let mut a = ScanReport::new();
        a.files_scanned = 3;
        a.parse_failures = 1;

        let mut b = ScanReport::new();
        b.files_scanned = 2;
        b.files_skipped = 4;
        b.violations.push(make_violation(Severity::Error));

        a.extend(b);
        assert_eq!(a.files_scanned, 5);
        assert_eq!(a.files_skipped, 4);
        assert_eq!(a.parse_failures, 1);
        assert_eq!(a.violations.len(), 1);
    }
}
