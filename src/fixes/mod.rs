//! Rule-based fix suggestions
//!
//! Deterministic fixes generated from syntax-tree inspection (Python) and
//! line regexes (Python, JavaScript/TypeScript). The battery runs in a fixed
//! order and ids are handed out in that order, so the same input always
//! yields the same `fix_1..fix_n` sequence on a fresh [`AutoFixer`].

mod javascript;
mod python;

use crate::error::{FixError, ParseError};
use crate::language::Language;
use crate::models::{FixSuggestion, FixType};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Upper bound on fixes applied by [`AutoFixer::apply_auto_fixes`]
const MAX_AUTO_FIXES: usize = 10_000;

/// Monotonic `fix_<n>` ids, unique for the generator's lifetime even when
/// shared across threads
#[derive(Debug, Default)]
pub struct FixIdGenerator {
    counter: AtomicU64,
}

impl FixIdGenerator {
    pub fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("fix_{}", n)
    }

    fn build(&self, spec: FixSpec) -> FixSuggestion {
        let diff = render_diff(&spec.before, &spec.after);
        FixSuggestion {
            fix_id: self.next_id(),
            fix_type: spec.fix_type,
            title: spec.title,
            description: spec.description,
            line_start: spec.line_start,
            line_end: spec.line_end,
            before_code: spec.before,
            after_code: spec.after,
            diff,
            confidence: spec.confidence,
            auto_applicable: spec.auto_applicable,
        }
    }
}

/// Everything about a fix except its id and diff
pub(crate) struct FixSpec {
    pub fix_type: FixType,
    pub title: String,
    pub description: String,
    pub line_start: usize,
    pub line_end: usize,
    pub before: String,
    pub after: String,
    pub confidence: f64,
    pub auto_applicable: bool,
}

impl FixSpec {
    /// A fix confined to one line
    pub fn line(
        fix_type: FixType,
        line: usize,
        title: String,
        description: impl Into<String>,
        before: &str,
        after: String,
    ) -> Self {
        Self {
            fix_type,
            title,
            description: description.into(),
            line_start: line,
            line_end: line,
            before: before.to_string(),
            after,
            confidence: 1.0,
            auto_applicable: true,
        }
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn manual(mut self) -> Self {
        self.auto_applicable = false;
        self
    }
}

/// Code after [`AutoFixer::apply_auto_fixes`] together with what was applied
#[derive(Debug, Clone, PartialEq)]
pub struct AutoFixOutcome {
    pub code: String,
    pub applied: Vec<FixSuggestion>,
    /// Auto-applicable fixes skipped because they broke the code
    pub rejected: Vec<FixSuggestion>,
}

/// Generates, applies and validates fix suggestions
#[derive(Debug, Default)]
pub struct AutoFixer {
    ids: FixIdGenerator,
}

impl AutoFixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the fix battery for `language`. Java and C++ get no fixes.
    pub fn generate(&self, code: &str, language: Language) -> Vec<FixSuggestion> {
        let lines: Vec<&str> = code.split('\n').collect();
        let specs = match language {
            Language::Python => python::fixes(code, &lines),
            Language::JavaScript | Language::TypeScript => javascript::fixes(&lines),
            Language::Java | Language::Cpp => Vec::new(),
        };
        let fixes: Vec<FixSuggestion> = specs.into_iter().map(|s| self.ids.build(s)).collect();
        debug!("Generated {} fixes for {}", fixes.len(), language);
        fixes
    }

    /// Apply one fix; see [`apply_fix`]
    pub fn apply_fix(&self, code: &str, fix: &FixSuggestion) -> Result<String, FixError> {
        apply_fix(code, fix)
    }

    /// Apply one fix and require that the result still parses
    pub fn apply_validated(
        &self,
        code: &str,
        fix: &FixSuggestion,
        language: Language,
    ) -> Result<String, FixError> {
        let fixed = apply_fix(code, fix)?;
        validate(&fixed, language).map_err(|source| FixError::Validation {
            fix_id: fix.fix_id.clone(),
            source,
        })?;
        Ok(fixed)
    }

    /// Repeatedly regenerate fixes and apply the first auto-applicable one
    /// until none remain. When the input is valid, a fix that breaks the
    /// code is rejected instead of applied.
    pub fn apply_auto_fixes(&self, code: &str, language: Language) -> Result<AutoFixOutcome, FixError> {
        let check = validate(code, language).is_ok();
        let mut current = code.to_string();
        let mut applied = Vec::new();
        let mut rejected: Vec<FixSuggestion> = Vec::new();
        let mut rejected_keys: HashSet<(String, String)> = HashSet::new();

        while applied.len() < MAX_AUTO_FIXES {
            let next = self
                .generate(&current, language)
                .into_iter()
                .filter(|f| f.auto_applicable)
                .find(|f| !rejected_keys.contains(&(f.title.clone(), f.before_code.clone())));
            let Some(fix) = next else {
                break;
            };

            let result = if check {
                self.apply_validated(&current, &fix, language)
            } else {
                apply_fix(&current, &fix)
            };

            match result {
                Ok(fixed) if fixed == current => break,
                Ok(fixed) => {
                    info!("Applied {}: {}", fix.fix_id, fix.title);
                    current = fixed;
                    applied.push(fix);
                }
                Err(FixError::Validation { fix_id, source }) => {
                    warn!("Skipping {} ({}): {}", fix_id, fix.title, source);
                    rejected_keys.insert((fix.title.clone(), fix.before_code.clone()));
                    rejected.push(fix);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(AutoFixOutcome {
            code: current,
            applied,
            rejected,
        })
    }
}

/// Apply a fix to `code`. Lines are 1-based and inclusive.
///
/// A single-line fix with empty `after_code` deletes the line; otherwise it
/// replaces it. A multi-line fix removes the range and splices in the
/// replacement's lines at the same position.
pub fn apply_fix(code: &str, fix: &FixSuggestion) -> Result<String, FixError> {
    let mut lines: Vec<&str> = code.split('\n').collect();
    let total = lines.len();

    if fix.line_start == 0 || fix.line_end < fix.line_start {
        return Err(FixError::InvalidRange {
            start: fix.line_start,
            end: fix.line_end,
        });
    }
    if fix.line_end > total {
        return Err(FixError::LineOutOfRange {
            line: fix.line_end,
            total,
        });
    }

    let start = fix.line_start - 1;
    if fix.is_single_line() {
        if fix.is_deletion() {
            lines.remove(start);
        } else {
            lines[start] = &fix.after_code;
        }
    } else {
        lines.splice(start..fix.line_end, fix.after_code.split('\n'));
    }

    Ok(lines.join("\n"))
}

/// Check that `code` parses. Only Python has a parser; every other
/// language is reported valid.
pub fn validate(code: &str, language: Language) -> Result<(), ParseError> {
    match language {
        Language::Python => crate::parsers::python::check_syntax(code),
        _ => Ok(()),
    }
}

/// Render a minimal unified-style diff of a fix
pub fn render_diff(before: &str, after: &str) -> String {
    let prefixed = |text: &str, marker: &str| {
        text.split('\n')
            .map(|l| format!("{} {}", marker, l))
            .collect::<Vec<_>>()
            .join("\n")
    };

    if after.is_empty() {
        prefixed(before, "-")
    } else if before == after {
        prefixed(before, " ")
    } else {
        format!("{}\n{}", prefixed(before, "-"), prefixed(after, "+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(line_start: usize, line_end: usize, after: &str) -> FixSuggestion {
        FixSuggestion {
            fix_id: "fix_test".into(),
            fix_type: FixType::Simple,
            title: "t".into(),
            description: "d".into(),
            line_start,
            line_end,
            before_code: String::new(),
            after_code: after.into(),
            diff: String::new(),
            confidence: 1.0,
            auto_applicable: true,
        }
    }

    #[test]
    fn test_ids_are_monotonic_across_calls() {
        let fixer = AutoFixer::new();
        let first = fixer.generate("x = 1 \n", Language::Python);
        let second = fixer.generate("y = 2 \n", Language::Python);
        assert_eq!(first[0].fix_id, "fix_1");
        assert_eq!(second[0].fix_id, "fix_2");
    }

    #[test]
    fn test_ids_unique_under_concurrency() {
        let fixer = std::sync::Arc::new(AutoFixer::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let fixer = fixer.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .flat_map(|_| fixer.generate("a = 1 \nb = 2 \n", Language::Python))
                        .map(|f| f.fix_id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids = HashSet::new();
        for h in handles {
            for id in h.join().expect("thread") {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(ids.len(), 4 * 50 * 2);
    }

    #[test]
    fn test_apply_deletion_shifts_lines() {
        let out = apply_fix("a\nb\nc", &fix(2, 2, "")).expect("apply");
        assert_eq!(out, "a\nc");
    }

    #[test]
    fn test_apply_replacement() {
        let out = apply_fix("a\nb\nc", &fix(3, 3, "z")).expect("apply");
        assert_eq!(out, "a\nb\nz");
    }

    #[test]
    fn test_apply_multiline_splice() {
        let out = apply_fix("a\nb\nc\nd", &fix(2, 3, "x\ny\nz")).expect("apply");
        assert_eq!(out, "a\nx\ny\nz\nd");
        let out = apply_fix("a\nb\nc\nd", &fix(2, 3, "one")).expect("apply");
        assert_eq!(out, "a\none\nd");
    }

    #[test]
    fn test_apply_rejects_bad_ranges() {
        assert!(matches!(
            apply_fix("a", &fix(0, 0, "x")),
            Err(FixError::InvalidRange { .. })
        ));
        assert!(matches!(
            apply_fix("a", &fix(3, 2, "x")),
            Err(FixError::InvalidRange { .. })
        ));
        assert!(matches!(
            apply_fix("a\nb", &fix(3, 3, "x")),
            Err(FixError::LineOutOfRange { line: 3, total: 2 })
        ));
    }

    #[test]
    fn test_render_diff() {
        assert_eq!(render_diff("import os", ""), "- import os");
        assert_eq!(render_diff("x", "x"), "  x");
        assert_eq!(render_diff("a == None", "a is None"), "- a == None\n+ a is None");
        assert_eq!(render_diff("a\nb", "c"), "- a\n- b\n+ c");
    }

    #[test]
    fn test_validate() {
        assert!(validate("x = 1\n", Language::Python).is_ok());
        assert!(validate("def (:\n", Language::Python).is_err());
        assert!(validate("print 'hi'\n", Language::Python).is_err());
        assert!(validate("exec 'x = 1'\n", Language::Python).is_err());
        assert!(validate("this is { not js", Language::JavaScript).is_ok());
    }

    #[test]
    fn test_apply_auto_fixes_python() {
        let code = "import os\nx = 1   \nif x == None:\n    pass\n";
        let outcome = AutoFixer::new()
            .apply_auto_fixes(code, Language::Python)
            .expect("auto fixes");
        assert_eq!(outcome.code, "x = 1\nif x is None:\n    pass\n");
        assert_eq!(outcome.applied.len(), 3);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_apply_auto_fixes_javascript() {
        let code = "var a = 1;\nif (a == 1) { go(); }";
        let outcome = AutoFixer::new()
            .apply_auto_fixes(code, Language::JavaScript)
            .expect("auto fixes");
        // var -> const is a suggestion only
        assert_eq!(outcome.code, "var a = 1;\nif (a === 1) { go(); }");
        assert_eq!(outcome.applied.len(), 1);
    }

    #[test]
    fn test_apply_validated_reports_parse_error() {
        let fixer = AutoFixer::new();
        let broken = fix(1, 1, "def (:");
        let err = fixer
            .apply_validated("x = 1", &broken, Language::Python)
            .unwrap_err();
        assert!(matches!(err, FixError::Validation { .. }));
    }
}
