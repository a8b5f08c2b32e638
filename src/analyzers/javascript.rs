//! JavaScript/TypeScript analyzer backed by ESLint
//!
//! The snippet is classified as TypeScript or JavaScript before staging,
//! because ESLint picks its parser from the file suffix.

use super::external_tool::{js_exec_command, remove_staged, run_external_tool, stage_source};
use super::{count, line_counts, LanguageAnalyzer};
use crate::error::{ExternalToolError, Result};
use crate::language::Language;
use crate::models::{AnalysisResult, ComplexityMetrics, Issue, IssueSeverity};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

const TOOL_NAME: &str = "ESLint";
const INSTALL_HINT: &str = "ESLint not found. Install with: npm install -g eslint";

const TYPESCRIPT_INDICATORS: &[&str] = &[
    "interface ",
    "type ",
    ": string",
    ": number",
    ": boolean",
    "<T>",
    "as ",
    "enum ",
];

/// ESLint-based analyzer for JavaScript and TypeScript snippets
pub struct EslintAnalyzer {
    /// Empty means `bunx eslint` / `npx eslint`, resolved per run
    command: Vec<String>,
    timeout: Duration,
}

impl EslintAnalyzer {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    /// Substring check for TypeScript-only syntax
    pub fn is_typescript(code: &str) -> bool {
        TYPESCRIPT_INDICATORS.iter().any(|i| code.contains(i))
    }

    fn command(&self) -> Vec<String> {
        if self.command.is_empty() {
            js_exec_command("eslint")
        } else {
            self.command.clone()
        }
    }

    /// Map ESLint's numeric severity (0/1/2)
    fn map_severity(severity: i64) -> IssueSeverity {
        match severity {
            1 => IssueSeverity::Warning,
            2 => IssueSeverity::Error,
            _ => IssueSeverity::Info,
        }
    }

    fn create_issue(message: &JsonValue) -> Issue {
        let rule_id = message.get("ruleId").and_then(|r| r.as_str());
        let number = |key: &str| message.get(key).and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        Issue {
            category: rule_id.unwrap_or("unknown").to_string(),
            symbol: rule_id.unwrap_or("").to_string(),
            message: message
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("")
                .to_string(),
            line: number("line"),
            column: number("column"),
            severity: Self::map_severity(
                message.get("severity").and_then(|s| s.as_i64()).unwrap_or(1),
            ),
        }
    }

    /// ESLint emits one result object per file; only the staged file is linted
    fn parse_issues(output: Option<JsonValue>) -> std::result::Result<Vec<Issue>, ExternalToolError> {
        let Some(json) = output else {
            return Ok(Vec::new());
        };
        let results = json.as_array().ok_or_else(|| ExternalToolError::MalformedOutput {
            tool: TOOL_NAME.to_string(),
            detail: "expected a JSON array".to_string(),
        })?;
        let messages = results
            .first()
            .and_then(|r| r.get("messages"))
            .and_then(|m| m.as_array())
            .map(|a| a.as_slice())
            .unwrap_or(&[]);
        Ok(messages.iter().map(Self::create_issue).collect())
    }

    fn complexity_for(&self, code: &str, typescript: bool) -> ComplexityMetrics {
        let (total_lines, code_lines) = line_counts(code, "//");
        let num_functions = count(code, "function ") + count(code, "=>") + count(code, "async ");
        let num_imports = count(code, "import ") + count(code, "require(");
        let num_conditionals = count(code, "if ")
            + count(code, "else if")
            + count(code, "switch")
            + count(code, "case ");
        let num_loops = count(code, "for ")
            + count(code, "while ")
            + count(code, ".map(")
            + count(code, ".forEach(")
            + count(code, ".filter(");

        let mut metrics = ComplexityMetrics::from([
            ("total_lines".to_string(), total_lines),
            ("code_lines".to_string(), code_lines),
            ("num_functions".to_string(), num_functions),
            ("num_classes".to_string(), count(code, "class ")),
            ("num_imports".to_string(), num_imports),
            ("cyclomatic_complexity".to_string(), 1 + num_conditionals + num_loops),
            ("num_conditionals".to_string(), num_conditionals),
            ("num_loops".to_string(), num_loops),
        ]);
        if typescript {
            metrics.insert("num_interfaces".to_string(), count(code, "interface "));
            metrics.insert("num_types".to_string(), count(code, "type "));
        }
        metrics
    }
}

impl LanguageAnalyzer for EslintAnalyzer {
    fn name(&self) -> &'static str {
        "eslint"
    }

    fn analyze(&self, code: &str) -> Result<AnalysisResult> {
        let typescript = Self::is_typescript(code);
        let (language, suffix) = if typescript {
            (Language::TypeScript, ".ts")
        } else {
            (Language::JavaScript, ".js")
        };
        debug!("ESLint analyzing snippet as {}", language);

        let mut result = AnalysisResult::new(language);
        result.complexity_metrics = self.complexity_for(code, typescript);

        let staged = stage_source(code, suffix)?;
        let mut cmd = self.command();
        cmd.push(staged.path().to_string_lossy().into_owned());
        cmd.push("--format=json".to_string());

        let outcome = run_external_tool(&cmd, TOOL_NAME, INSTALL_HINT, self.timeout, None)
            .and_then(|output| output.json_output(TOOL_NAME))
            .and_then(Self::parse_issues);
        remove_staged(staged)?;

        match outcome {
            Ok(issues) => result.issues = issues,
            Err(e) => result.error = Some(e.to_string()),
        }
        Ok(result)
    }

    fn calculate_complexity(&self, code: &str) -> ComplexityMetrics {
        self.complexity_for(code, Self::is_typescript(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer(command: &[&str]) -> EslintAnalyzer {
        EslintAnalyzer::new(
            command.iter().map(|s| s.to_string()).collect(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_typescript_detection() {
        assert!(EslintAnalyzer::is_typescript("function f(x: number) {}"));
        assert!(EslintAnalyzer::is_typescript("enum Color { Red }"));
        assert!(EslintAnalyzer::is_typescript("const y = x as Foo;"));
        assert!(!EslintAnalyzer::is_typescript("const a = [1, 2].map(x => x * 2);"));
    }

    #[test]
    fn test_javascript_complexity() {
        let code = "const xs = [1].map(x => x);\nfunction f(a) {\n  if (a) { return 1; }\n  else if (b) {}\n  for (;;) {}\n}\n// done\n";
        let m = analyzer(&[]).calculate_complexity(code);
        assert_eq!(m["num_functions"], 2);
        // "else if" also contains "if "
        assert_eq!(m["num_conditionals"], 3);
        assert_eq!(m["num_loops"], 2);
        assert_eq!(m["cyclomatic_complexity"], 1 + 3 + 2);
        assert_eq!(m["code_lines"], 6);
        assert!(!m.contains_key("num_interfaces"));
    }

    #[test]
    fn test_typescript_adds_interface_and_type_counts() {
        let code = "interface A { x: string }\ntype B = A;\n";
        let m = analyzer(&[]).calculate_complexity(code);
        assert_eq!(m["num_interfaces"], 1);
        assert_eq!(m["num_types"], 1);
    }

    #[test]
    fn test_parses_first_result_messages() {
        let json = serde_json::json!([{
            "filePath": "/tmp/x.js",
            "messages": [
                {"ruleId": "no-unused-vars", "message": "'a' is unused", "line": 1, "column": 7, "severity": 2},
                {"ruleId": null, "message": "Parsing error", "line": 3, "column": 1, "severity": 1}
            ]
        }]);
        let issues = EslintAnalyzer::parse_issues(Some(json)).expect("parse");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].category, "no-unused-vars");
        assert_eq!(issues[0].severity, IssueSeverity::Error);
        assert_eq!(issues[1].category, "unknown");
        assert_eq!(issues[1].symbol, "");
        assert_eq!(issues[1].severity, IssueSeverity::Warning);
    }

    #[test]
    fn test_result_language_follows_self_detection() {
        let result = analyzer(&["true"])
            .analyze("let a: number = 1;")
            .expect("analysis result");
        assert_eq!(result.language, Language::TypeScript);
        assert!(result.is_ok());

        let result = analyzer(&["codevibe-no-such-eslint"])
            .analyze("var a = 1;")
            .expect("analysis result");
        assert_eq!(result.language, Language::JavaScript);
        assert_eq!(result.error.as_deref(), Some(INSTALL_HINT));
    }
}
