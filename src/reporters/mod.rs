//! Output reporters for codevibe results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::FixSuggestion;
use crate::pipeline::SubmissionReport;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Outcome for one analyzed file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub report: Option<SubmissionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn ok(path: impl Into<String>, report: SubmissionReport) -> Self {
        Self {
            path: path.into(),
            report: Some(report),
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            path: path.into(),
            report: None,
            error: Some(error.to_string()),
        }
    }
}

/// Fix suggestions for one file
#[derive(Debug, Clone, Serialize)]
pub struct FixReport<'a> {
    pub path: &'a str,
    pub fixes: &'a [FixSuggestion],
}

/// Render analysis results
pub fn report(reports: &[FileReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(reports),
        OutputFormat::Json => json::render(reports),
    }
}

/// Render fix suggestions
pub fn fixes_report(fixes: &FixReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_fixes(fixes)),
        OutputFormat::Json => json::render_fixes(fixes),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::language::Language;
    use crate::models::{BugPrediction, FixType, Severity};
    use crate::scoring::ScoreBreakdown;
    use crate::style::extract_style;

    /// Create a minimal SubmissionReport for testing
    pub(crate) fn test_report() -> SubmissionReport {
        SubmissionReport {
            language: Language::Python,
            analysis: None,
            bugs: vec![BugPrediction {
                line_number: 3,
                severity: Severity::High,
                bug_type: "bare_except".into(),
                description: "Bare except clause catches all exceptions".into(),
                confidence: 0.8,
                suggestion: Some("Catch specific exceptions".into()),
            }],
            smells: Vec::new(),
            security: Vec::new(),
            fixes: vec![test_fix()],
            style: extract_style("x = 1\n", Language::Python),
            score: ScoreBreakdown {
                score: 95.0,
                grade: "A".into(),
                issue_penalty: 0.0,
                bug_penalty: 5.0,
            },
            embedding: None,
        }
    }

    pub(crate) fn test_fix() -> FixSuggestion {
        FixSuggestion {
            fix_id: "fix_1".into(),
            fix_type: FixType::Refactor,
            title: "Replace bare except on line 3".into(),
            description: "Catch Exception instead of everything".into(),
            line_start: 3,
            line_end: 3,
            before_code: "except:".into(),
            after_code: "except Exception:".into(),
            diff: "- except:\n+ except Exception:".into(),
            confidence: 0.9,
            auto_applicable: true,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
