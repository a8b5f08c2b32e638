//! Python analyzer backed by pylint

use super::external_tool::{remove_staged, run_external_tool, stage_source};
use super::{count, line_counts, LanguageAnalyzer};
use crate::error::{ExternalToolError, Result};
use crate::language::Language;
use crate::models::{AnalysisResult, ComplexityMetrics, Issue, IssueSeverity};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

const TOOL_NAME: &str = "pylint";
const INSTALL_HINT: &str = "Pylint not installed. Install with: pip install pylint";

/// Pylint-based analyzer for Python snippets
pub struct PylintAnalyzer {
    command: Vec<String>,
    timeout: Duration,
}

impl PylintAnalyzer {
    /// `command` is the linter prefix; an empty command falls back to `pylint`
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        let command = if command.is_empty() {
            vec![TOOL_NAME.to_string()]
        } else {
            command
        };
        Self { command, timeout }
    }

    /// Map pylint message type to issue severity
    fn map_severity(msg_type: &str) -> IssueSeverity {
        match msg_type.to_lowercase().as_str() {
            "error" | "fatal" => IssueSeverity::Error,
            "warning" => IssueSeverity::Warning,
            _ => IssueSeverity::Info,
        }
    }

    fn create_issue(message: &JsonValue) -> Issue {
        let text = |key: &str| {
            message
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let number = |key: &str| message.get(key).and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        let msg_type = text("type");

        Issue {
            severity: Self::map_severity(&msg_type),
            category: msg_type,
            symbol: text("symbol"),
            message: text("message"),
            line: number("line"),
            column: number("column"),
        }
    }

    fn parse_issues(output: Option<JsonValue>) -> std::result::Result<Vec<Issue>, ExternalToolError> {
        let Some(json) = output else {
            return Ok(Vec::new());
        };
        let messages = json.as_array().ok_or_else(|| ExternalToolError::MalformedOutput {
            tool: TOOL_NAME.to_string(),
            detail: "expected a JSON array".to_string(),
        })?;
        Ok(messages.iter().map(Self::create_issue).collect())
    }
}

impl LanguageAnalyzer for PylintAnalyzer {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn analyze(&self, code: &str) -> Result<AnalysisResult> {
        let mut result = AnalysisResult::new(Language::Python);
        result.complexity_metrics = self.calculate_complexity(code);

        let staged = stage_source(code, ".py")?;
        let mut cmd = self.command.clone();
        cmd.push(staged.path().to_string_lossy().into_owned());
        cmd.push("--output-format=json".to_string());

        let outcome = run_external_tool(&cmd, TOOL_NAME, INSTALL_HINT, self.timeout, None)
            .and_then(|output| output.json_output(TOOL_NAME))
            .and_then(Self::parse_issues);
        remove_staged(staged)?;

        match outcome {
            Ok(issues) => {
                debug!("pylint reported {} issues", issues.len());
                result.issues = issues;
            }
            Err(e) => result.error = Some(e.to_string()),
        }
        Ok(result)
    }

    fn calculate_complexity(&self, code: &str) -> ComplexityMetrics {
        let (total_lines, code_lines) = line_counts(code, "#");
        let num_conditionals = count(code, "if ") + count(code, "elif ");
        let num_loops = count(code, "for ") + count(code, "while ");

        ComplexityMetrics::from([
            ("total_lines".to_string(), total_lines),
            ("code_lines".to_string(), code_lines),
            ("num_functions".to_string(), count(code, "def ")),
            ("num_classes".to_string(), count(code, "class ")),
            ("num_imports".to_string(), count(code, "import ")),
            ("cyclomatic_complexity".to_string(), 1 + num_conditionals + num_loops),
            ("num_conditionals".to_string(), num_conditionals),
            ("num_loops".to_string(), num_loops),
        ])
    }
}
