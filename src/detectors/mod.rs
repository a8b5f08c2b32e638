//! Heuristic bug, smell and security scanners
//!
//! Three independent line-scanning passes. Each is a pure function of
//! `(code, language)`; the only shared data are the pattern tables in
//! [`patterns`], compiled once and never mutated.
//!
//! An optional [`embedding::ModelSlot`] can be attached for semantic hints.
//! It is advisory only and never affects the pattern-based results.

pub mod embedding;
pub mod patterns;

use crate::language::Language;
use crate::models::{BugPrediction, CodeSmell, SecurityIssue, Severity};
use embedding::ModelSlot;
use std::sync::Arc;
use tracing::debug;

/// Confidence assigned to every pattern-based bug match
pub const PATTERN_CONFIDENCE: f64 = 0.8;

const LONG_FUNCTION_LINES: usize = 50;
const DEEP_NESTING_COLUMNS: usize = 16;
const LONG_FUNCTION_CONFIDENCE: f64 = 0.5;
const DEEP_NESTING_CONFIDENCE: f64 = 0.7;

/// Scan every line against the language's bug patterns.
/// Each pattern contributes at most one finding per line.
pub fn scan_bugs(code: &str, language: Language) -> Vec<BugPrediction> {
    let patterns = patterns::bug_patterns(language);
    let mut bugs = Vec::new();

    for (i, line) in code.split('\n').enumerate() {
        for pattern in patterns {
            if pattern.matcher.is_match(line) {
                bugs.push(BugPrediction {
                    line_number: i + 1,
                    severity: pattern.severity,
                    bug_type: pattern.bug_type.to_string(),
                    description: pattern.description.to_string(),
                    confidence: PATTERN_CONFIDENCE,
                    suggestion: pattern.suggestion.map(str::to_string),
                });
            }
        }
    }

    debug!("Bug scan ({}): {} findings", language, bugs.len());
    bugs
}

/// Whole-snippet smell heuristics, the same for every language
pub fn scan_smells(code: &str, _language: Language) -> Vec<CodeSmell> {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut smells = Vec::new();

    if lines.len() > LONG_FUNCTION_LINES {
        smells.push(CodeSmell {
            line_number: 1,
            smell_type: "long_function".to_string(),
            description: "Function is too long (>50 lines). Consider breaking it down.".to_string(),
            severity: Severity::Medium,
            confidence: LONG_FUNCTION_CONFIDENCE,
            refactoring_suggestion: Some(
                "Extract smaller functions for better readability".to_string(),
            ),
        });
    }

    for (i, line) in lines.iter().enumerate() {
        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        if indent > DEEP_NESTING_COLUMNS {
            smells.push(CodeSmell {
                line_number: i + 1,
                smell_type: "deep_nesting".to_string(),
                description: "Deep nesting detected. Reduces readability.".to_string(),
                severity: Severity::Medium,
                confidence: DEEP_NESTING_CONFIDENCE,
                refactoring_suggestion: Some(
                    "Consider early returns or extracting methods".to_string(),
                ),
            });
        }
    }

    smells
}

/// Scan for security anti-patterns; one finding per occurrence
pub fn scan_security(code: &str, language: Language) -> Vec<SecurityIssue> {
    let patterns = patterns::security_patterns(language);
    let mut issues = Vec::new();

    for (i, line) in code.split('\n').enumerate() {
        for pattern in patterns {
            for _ in pattern.matcher.find_offsets(line) {
                issues.push(SecurityIssue {
                    line_number: i + 1,
                    vulnerability_type: pattern.vulnerability_type.to_string(),
                    description: pattern.description.to_string(),
                    severity: pattern.severity,
                    confidence: PATTERN_CONFIDENCE,
                    cwe_id: Some(pattern.cwe_id.to_string()),
                    fix_suggestion: Some(pattern.fix.to_string()),
                });
            }
        }
    }

    debug!("Security scan ({}): {} findings", language, issues.len());
    issues
}

/// Owns the scanner configuration and the optional embedding slot
#[derive(Clone, Default)]
pub struct HeuristicScanner {
    model: Option<Arc<ModelSlot>>,
}

impl HeuristicScanner {
    /// Pattern-only scanner
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: Arc<ModelSlot>) -> Self {
        Self { model: Some(model) }
    }

    pub fn scan_bugs(&self, code: &str, language: Language) -> Vec<BugPrediction> {
        scan_bugs(code, language)
    }

    pub fn scan_smells(&self, code: &str, language: Language) -> Vec<CodeSmell> {
        scan_smells(code, language)
    }

    pub fn scan_security(&self, code: &str, language: Language) -> Vec<SecurityIssue> {
        scan_security(code, language)
    }

    /// Semantic embedding of the snippet, if a model is attached and works
    pub fn embed(&self, code: &str) -> Option<Vec<f32>> {
        self.model.as_ref().and_then(|m| m.embed(code))
    }

    /// Cosine similarity between two snippets
    pub fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        let a = self.embed(a)?;
        let b = self.embed(b)?;
        Some(embedding::similarity(&a, &b))
    }

    /// Evict the model when idle
    pub fn cleanup(&self) {
        if let Some(model) = &self.model {
            model.cleanup();
        }
    }
}
