//! Core data models for codevibe
//!
//! These are plain value objects returned by the analyzers, scanners and
//! the fix generator. Nothing here is persisted by the library itself;
//! callers own ids, timestamps and the user/snippet association.

use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of a linter issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Info => write!(f, "info"),
            IssueSeverity::Warning => write!(f, "warning"),
            IssueSeverity::Error => write!(f, "error"),
        }
    }
}

/// A finding reported by an external linter, normalized across tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Issue {
    /// Linter category (pylint message type, ESLint rule id)
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub message: String,
    /// 1-based; 0 when the tool did not report one
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub severity: IssueSeverity,
}

/// Metric name -> value. Ordered so reports are stable.
pub type ComplexityMetrics = BTreeMap<String, usize>;

/// Outcome of one static-analysis run
///
/// `error` is always serialized (as `null` on success) so callers can rely
/// on the field being present even when issues/metrics are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub issues: Vec<Issue>,
    pub complexity_metrics: ComplexityMetrics,
    pub language: Language,
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn new(language: Language) -> Self {
        Self {
            issues: Vec::new(),
            complexity_metrics: ComplexityMetrics::new(),
            language,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Look up a single metric
    pub fn metric(&self, name: &str) -> Option<usize> {
        self.complexity_metrics.get(name).copied()
    }
}

/// Severity levels for heuristic findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A likely bug matched by a line pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugPrediction {
    pub line_number: usize,
    pub severity: Severity,
    pub bug_type: String,
    pub description: String,
    /// Confidence score from 0.0 to 1.0
    pub confidence: f64,
    pub suggestion: Option<String>,
}

/// A whole-snippet or per-line code smell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSmell {
    pub line_number: usize,
    pub smell_type: String,
    pub description: String,
    pub severity: Severity,
    pub confidence: f64,
    pub refactoring_suggestion: Option<String>,
}

/// A security anti-pattern with its CWE classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub line_number: usize,
    pub vulnerability_type: String,
    pub description: String,
    pub severity: Severity,
    pub confidence: f64,
    pub cwe_id: Option<String>,
    pub fix_suggestion: Option<String>,
}

/// Kind of edit a fix suggestion performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixType {
    /// Unused imports, whitespace and similar mechanical edits
    Simple,
    Refactor,
    Performance,
    Security,
    Style,
}

impl std::fmt::Display for FixType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixType::Simple => write!(f, "simple"),
            FixType::Refactor => write!(f, "refactor"),
            FixType::Performance => write!(f, "performance"),
            FixType::Security => write!(f, "security"),
            FixType::Style => write!(f, "style"),
        }
    }
}

/// A proposed textual edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSuggestion {
    /// Unique within the generating `AutoFixer`
    pub fix_id: String,
    pub fix_type: FixType,
    pub title: String,
    pub description: String,
    /// 1-based, inclusive
    pub line_start: usize,
    /// 1-based, inclusive
    pub line_end: usize,
    pub before_code: String,
    /// Empty means "delete the line(s)"
    pub after_code: String,
    pub diff: String,
    /// Confidence score from 0.0 to 1.0
    pub confidence: f64,
    pub auto_applicable: bool,
}

impl FixSuggestion {
    pub fn is_single_line(&self) -> bool {
        self.line_start == self.line_end
    }

    pub fn is_deletion(&self) -> bool {
        self.after_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_error_field_always_serialized() {
        let result = AnalysisResult::new(Language::Python);
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json.get("error").is_some());
        assert!(json["error"].is_null());
        assert_eq!(json["language"], "python");
    }

    #[test]
    fn test_issue_serializes_category_as_type() {
        let issue = Issue {
            category: "convention".into(),
            symbol: "missing-docstring".into(),
            message: "Missing module docstring".into(),
            line: 1,
            column: 0,
            severity: IssueSeverity::Info,
        };
        let json = serde_json::to_value(&issue).expect("serialize");
        assert_eq!(json["type"], "convention");
        assert_eq!(json["severity"], "info");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(IssueSeverity::Error > IssueSeverity::Warning);
    }
}
