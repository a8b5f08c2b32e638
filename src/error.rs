//! Error types for the analysis core
//!
//! External-tool failures and syntax-tree failures are normally recovered
//! close to where they happen (into `AnalysisResult::error`, or by skipping a
//! detector). The variants that reach callers as `Err` are the ones that mean
//! the request itself cannot be served.

use crate::language::Language;
use thiserror::Error;

/// Errors from running an external linter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalToolError {
    #[error("Analysis timed out")]
    Timeout { tool: String, secs: u64 },

    #[error("{install_hint}")]
    BinaryNotFound { tool: String, install_hint: String },

    #[error("Failed to parse {tool} output")]
    MalformedOutput { tool: String, detail: String },

    #[error("Failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },
}

/// A syntax-tree dependent step could not parse its input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    /// 1-based
    pub line: usize,
    /// 1-based
    pub column: usize,
    pub message: String,
}

/// Errors from applying a fix to code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixError {
    #[error("Fix targets line {line} but the code has {total} lines")]
    LineOutOfRange { line: usize, total: usize },

    #[error("Invalid fix range {start}-{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Fix {fix_id} produced invalid code: {source}")]
    Validation {
        fix_id: String,
        #[source]
        source: ParseError,
    },
}

/// Errors from the embedding model slot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Embedding model is disabled")]
    Disabled,

    #[error("Failed to load embedding model: {0}")]
    LoadFailed(String),

    #[error("Embedding inference failed: {0}")]
    InferenceFailed(String),
}

/// Top-level error for the codevibe library
#[derive(Error, Debug)]
pub enum CodevibeError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(Language),

    #[error("No analyzers registered")]
    NoAnalyzers,

    #[error("Code is too long ({len} characters, maximum is {max})")]
    CodeTooLarge { len: usize, max: usize },

    #[error("{context}: {source}")]
    Resource {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fix(#[from] FixError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodevibeError {
    pub fn resource(context: impl Into<String>, source: std::io::Error) -> Self {
        CodevibeError::Resource {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodevibeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_messages() {
        let timeout = ExternalToolError::Timeout {
            tool: "pylint".into(),
            secs: 30,
        };
        assert_eq!(timeout.to_string(), "Analysis timed out");

        let missing = ExternalToolError::BinaryNotFound {
            tool: "pylint".into(),
            install_hint: "Pylint not installed. Install with: pip install pylint".into(),
        };
        assert!(missing.to_string().contains("pip install pylint"));

        let malformed = ExternalToolError::MalformedOutput {
            tool: "ESLint".into(),
            detail: "expected value".into(),
        };
        assert_eq!(malformed.to_string(), "Failed to parse ESLint output");
    }

    #[test]
    fn test_unsupported_language_message() {
        let err = CodevibeError::UnsupportedLanguage(Language::Java);
        assert_eq!(err.to_string(), "Unsupported language: java");
    }
}
