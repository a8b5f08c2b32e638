//! Static pattern tables for the heuristic scanner
//!
//! Tables are compiled once on first use and shared read-only by every scan.
//! TypeScript uses the JavaScript tables; Java and C++ have none.

use crate::language::Language;
use crate::models::Severity;
use regex::Regex;
use std::sync::OnceLock;

/// How a pattern finds matches within one line
#[derive(Debug)]
pub enum Matcher {
    Regex(Regex),
    /// `==` that is neither part of `===`/`!=`/`<=`/`>=` nor a longer run
    LooseEquality,
}

impl Matcher {
    /// Byte offsets of every match in `line`
    pub fn find_offsets(&self, line: &str) -> Vec<usize> {
        match self {
            Matcher::Regex(re) => re.find_iter(line).map(|m| m.start()).collect(),
            Matcher::LooseEquality => loose_equality_offsets(line),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(line),
            Matcher::LooseEquality => !loose_equality_offsets(line).is_empty(),
        }
    }
}

/// A line pattern that predicts a bug
#[derive(Debug)]
pub struct BugPattern {
    pub matcher: Matcher,
    pub bug_type: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub suggestion: Option<&'static str>,
}

/// A line pattern that flags a security weakness
#[derive(Debug)]
pub struct SecurityPattern {
    pub matcher: Matcher,
    pub vulnerability_type: &'static str,
    pub severity: Severity,
    pub cwe_id: &'static str,
    pub description: &'static str,
    pub fix: &'static str,
}

static PYTHON_BUGS: OnceLock<Vec<BugPattern>> = OnceLock::new();
static JS_BUGS: OnceLock<Vec<BugPattern>> = OnceLock::new();
static PYTHON_SECURITY: OnceLock<Vec<SecurityPattern>> = OnceLock::new();
static JS_SECURITY: OnceLock<Vec<SecurityPattern>> = OnceLock::new();

fn regex(pattern: &str) -> Matcher {
    Matcher::Regex(Regex::new(pattern).expect("valid regex"))
}

/// Bug patterns for a language
pub fn bug_patterns(language: Language) -> &'static [BugPattern] {
    match language {
        Language::Python => PYTHON_BUGS.get_or_init(|| {
            vec![
                BugPattern {
                    matcher: regex(r"==\s*None|None\s*=="),
                    bug_type: "comparison_error",
                    severity: Severity::Medium,
                    description: "Use \"is None\" instead of \"== None\"",
                    suggestion: Some("Replace \"== None\" with \"is None\""),
                },
                BugPattern {
                    matcher: regex(r"except\s*:"),
                    bug_type: "bare_except",
                    severity: Severity::High,
                    description: "Bare except clause catches all exceptions",
                    suggestion: Some("Specify exception types to catch"),
                },
            ]
        }),
        Language::JavaScript | Language::TypeScript => JS_BUGS.get_or_init(|| {
            vec![BugPattern {
                matcher: Matcher::LooseEquality,
                bug_type: "loose_equality",
                severity: Severity::Medium,
                description: "Use strict equality (===) instead of loose equality (==)",
                suggestion: Some("Replace \"==\" with \"===\""),
            }]
        }),
        Language::Java | Language::Cpp => &[],
    }
}

/// Security patterns for a language
pub fn security_patterns(language: Language) -> &'static [SecurityPattern] {
    match language {
        Language::Python => PYTHON_SECURITY.get_or_init(|| {
            vec![
                SecurityPattern {
                    matcher: regex(r"eval\s*\("),
                    vulnerability_type: "code_injection",
                    severity: Severity::Critical,
                    cwe_id: "CWE-95",
                    description: "Use of eval() can lead to code injection",
                    fix: "Avoid eval(). Use ast.literal_eval() for safe evaluation",
                },
                SecurityPattern {
                    matcher: regex(r"pickle\.loads?\s*\("),
                    vulnerability_type: "insecure_deserialization",
                    severity: Severity::High,
                    cwe_id: "CWE-502",
                    description: "Pickle deserialization can execute arbitrary code",
                    fix: "Use JSON or other safe serialization formats",
                },
            ]
        }),
        Language::JavaScript | Language::TypeScript => JS_SECURITY.get_or_init(|| {
            vec![SecurityPattern {
                // assignment only; `innerHTML == x` is a comparison
                matcher: regex(r"innerHTML\s*=(?:[^=]|$)"),
                vulnerability_type: "xss_vulnerability",
                severity: Severity::High,
                cwe_id: "CWE-79",
                description: "Direct innerHTML assignment can lead to XSS",
                fix: "Use textContent or sanitize input before assignment",
            }]
        }),
        Language::Java | Language::Cpp => &[],
    }
}

/// Byte offsets of loose `==` operators in a JS/TS line
pub(crate) fn loose_equality_offsets(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    let mut offsets = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'=' {
            i += 1;
        }
        let run = i - start;
        let prev = start.checked_sub(1).map(|p| bytes[p]);
        let compound = matches!(prev, Some(b'!' | b'<' | b'>'));
        if run == 2 && !compound {
            offsets.push(start);
        }
    }

    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_equality_offsets() {
        assert_eq!(loose_equality_offsets("if (a == b) {}"), vec![6]);
        assert!(loose_equality_offsets("if (a === b) {}").is_empty());
        assert!(loose_equality_offsets("if (a !== b) {}").is_empty());
        assert!(loose_equality_offsets("if (a != b) {}").is_empty());
        assert!(loose_equality_offsets("x = 1; y <= 2").is_empty());
        assert_eq!(loose_equality_offsets("a == b && c == d").len(), 2);
    }

    #[test]
    fn test_tables_per_language() {
        assert_eq!(bug_patterns(Language::Python).len(), 2);
        assert_eq!(bug_patterns(Language::TypeScript).len(), 1);
        assert!(bug_patterns(Language::Java).is_empty());
        assert_eq!(security_patterns(Language::Python).len(), 2);
        assert!(security_patterns(Language::Cpp).is_empty());
    }

    #[test]
    fn test_security_regexes() {
        let py = security_patterns(Language::Python);
        assert!(py[0].matcher.is_match("eval (x)"));
        assert!(py[1].matcher.is_match("pickle.loads(data)"));
        assert!(py[1].matcher.is_match("pickle.load(f)"));

        let js = security_patterns(Language::JavaScript);
        assert!(js[0].matcher.is_match("el.innerHTML = html;"));
        assert!(js[0].matcher.is_match("el.innerHTML="));
        assert!(!js[0].matcher.is_match("if (el.innerHTML == '') {}"));
    }
}
