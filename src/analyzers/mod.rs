//! Per-language static analyzers
//!
//! Each analyzer wraps an external linter and computes surface-level
//! complexity counts. Analyzers are selected through an [`AnalyzerRegistry`]
//! keyed by [`Language`]; adding a language means registering one more
//! implementation of [`LanguageAnalyzer`].

pub mod external_tool;
pub mod javascript;
pub mod python;

pub use javascript::EslintAnalyzer;
pub use python::PylintAnalyzer;

use crate::config::Config;
use crate::error::{CodevibeError, Result};
use crate::language::Language;
use crate::models::{AnalysisResult, ComplexityMetrics};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Capability set every language analyzer provides
pub trait LanguageAnalyzer: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &'static str;

    /// Run the linter and complexity counts over a snippet.
    ///
    /// Linter failures (timeout, missing binary, malformed output) land in
    /// `AnalysisResult::error`; only staging failures are returned as `Err`.
    fn analyze(&self, code: &str) -> Result<AnalysisResult>;

    /// Count complexity markers without running any external tool
    fn calculate_complexity(&self, code: &str) -> ComplexityMetrics;
}

/// Analyzers keyed by the language they serve
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    analyzers: HashMap<Language, Arc<dyn LanguageAnalyzer>>,
}

impl AnalyzerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Python via pylint, JavaScript and TypeScript via ESLint
    pub fn with_defaults(config: &Config) -> Self {
        let timeout = config.analysis.timeout();
        let python: Arc<dyn LanguageAnalyzer> =
            Arc::new(PylintAnalyzer::new(config.linters.python.clone(), timeout));
        let js: Arc<dyn LanguageAnalyzer> =
            Arc::new(EslintAnalyzer::new(config.linters.javascript.clone(), timeout));

        let mut registry = Self::new();
        registry.register(Language::Python, python);
        registry.register(Language::JavaScript, Arc::clone(&js));
        registry.register(Language::TypeScript, js);
        registry
    }

    /// Register (or replace) the analyzer for a language
    pub fn register(&mut self, language: Language, analyzer: Arc<dyn LanguageAnalyzer>) {
        debug!("Registered {} for {}", analyzer.name(), language);
        self.analyzers.insert(language, analyzer);
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    pub fn supports(&self, language: Language) -> bool {
        self.analyzers.contains_key(&language)
    }

    /// Look up the analyzer for `language`
    pub fn get_analyzer(&self, language: Language) -> Result<Arc<dyn LanguageAnalyzer>> {
        if self.analyzers.is_empty() {
            return Err(CodevibeError::NoAnalyzers);
        }
        self.analyzers
            .get(&language)
            .cloned()
            .ok_or(CodevibeError::UnsupportedLanguage(language))
    }
}

/// Non-overlapping substring count
pub(crate) fn count(code: &str, needle: &str) -> usize {
    code.matches(needle).count()
}

/// Line totals shared by every analyzer. A line is code when it is non-blank
/// and does not start with `comment_prefix` after trimming.
pub(crate) fn line_counts(code: &str, comment_prefix: &str) -> (usize, usize) {
    let total = code.split('\n').count();
    let code_lines = code
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(comment_prefix))
        .count();
    (total, code_lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_dispatch() {
        let registry = AnalyzerRegistry::with_defaults(&Config::default());
        assert_eq!(
            registry.get_analyzer(Language::Python).expect("python").name(),
            "pylint"
        );
        assert_eq!(
            registry.get_analyzer(Language::TypeScript).expect("ts").name(),
            "eslint"
        );
        assert!(registry.supports(Language::JavaScript));
    }

    #[test]
    fn test_unsupported_language() {
        let registry = AnalyzerRegistry::with_defaults(&Config::default());
        for lang in [Language::Java, Language::Cpp] {
            match registry.get_analyzer(lang) {
                Err(CodevibeError::UnsupportedLanguage(l)) => assert_eq!(l, lang),
                _ => panic!("expected UnsupportedLanguage for {}", lang),
            }
        }
    }

    #[test]
    fn test_empty_registry_is_fatal() {
        let registry = AnalyzerRegistry::new();
        assert!(matches!(
            registry.get_analyzer(Language::Python),
            Err(CodevibeError::NoAnalyzers)
        ));
    }

    #[test]
    fn test_line_counts() {
        let (total, code) = line_counts("x = 1\n\n# note\n  y = 2\n", "#");
        assert_eq!(total, 5);
        assert_eq!(code, 2);
    }
}
