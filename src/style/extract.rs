//! Frequency-counting style heuristics

use super::patterns::{
    CommentStyle, ImportStyle, IndentKind, Indentation, NamingConvention, QuoteStyle,
    StylePatterns,
};
use crate::language::Language;
use crate::parsers;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static SNAKE_CASE: OnceLock<Regex> = OnceLock::new();
static CAMEL_CASE: OnceLock<Regex> = OnceLock::new();
static PASCAL_CASE: OnceLock<Regex> = OnceLock::new();
static SINGLE_QUOTED: OnceLock<Regex> = OnceLock::new();
static DOUBLE_QUOTED: OnceLock<Regex> = OnceLock::new();

fn snake_case() -> &'static Regex {
    SNAKE_CASE.get_or_init(|| Regex::new(r"\b[a-z]+_[a-z_]+\b").expect("valid regex"))
}

fn camel_case() -> &'static Regex {
    CAMEL_CASE.get_or_init(|| Regex::new(r"\b[a-z]+[A-Z][a-zA-Z]*\b").expect("valid regex"))
}

fn pascal_case() -> &'static Regex {
    PASCAL_CASE.get_or_init(|| Regex::new(r"\b[A-Z][a-z]+[A-Z][a-zA-Z]*\b").expect("valid regex"))
}

fn single_quoted() -> &'static Regex {
    SINGLE_QUOTED.get_or_init(|| Regex::new(r"'[^']*'").expect("valid regex"))
}

fn double_quoted() -> &'static Regex {
    DOUBLE_QUOTED.get_or_init(|| Regex::new(r#""[^"]*""#).expect("valid regex"))
}

/// Extract a style snapshot from `code`
pub fn extract(code: &str, language: Language) -> StylePatterns {
    let lines: Vec<&str> = code.split('\n').collect();

    let (naming_convention, comment_style, import_style) = match language {
        Language::Python => (
            detect_naming(code),
            detect_comments(&lines, CommentSyntax::Hash),
            detect_python_imports(code),
        ),
        Language::JavaScript | Language::TypeScript => (
            detect_naming(code),
            detect_comments(&lines, CommentSyntax::Slash),
            ImportStyle::Es6,
        ),
        Language::Java | Language::Cpp => (
            NamingConvention::Unknown,
            CommentStyle::Unknown,
            ImportStyle::Unknown,
        ),
    };

    StylePatterns {
        naming_convention,
        indentation: detect_indentation(&lines),
        quote_style: detect_quotes(code),
        average_line_length: average_line_length(&lines),
        comment_style,
        import_style,
    }
}

/// Majority of snake/camel/Pascal matches; ties go to the earlier shape
pub fn detect_naming(code: &str) -> NamingConvention {
    let counts = [
        (NamingConvention::SnakeCase, snake_case().find_iter(code).count()),
        (NamingConvention::CamelCase, camel_case().find_iter(code).count()),
        (NamingConvention::PascalCase, pascal_case().find_iter(code).count()),
    ];
    majority(&counts).unwrap_or(NamingConvention::Mixed)
}

/// First entry with the highest non-zero count
fn majority<T: Copy>(counts: &[(T, usize)]) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for &(value, count) in counts {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Tabs win only with a strict majority. Space indent size is the GCD of
/// all positive leading-space widths, which recovers the base unit from
/// nested lines.
pub fn detect_indentation(lines: &[&str]) -> Indentation {
    let mut tabs = 0usize;
    let mut space_widths = Vec::new();

    for line in lines {
        match line.chars().next() {
            Some('\t') => tabs += 1,
            Some(' ') => {
                space_widths.push(line.chars().take_while(|c| c.is_whitespace()).count())
            }
            _ => {}
        }
    }

    if tabs == 0 && space_widths.is_empty() {
        return Indentation::default();
    }
    if tabs > space_widths.len() {
        return Indentation {
            kind: IndentKind::Tabs,
            size: 1,
        };
    }

    let size = space_widths
        .into_iter()
        .filter(|&w| w > 0)
        .reduce(gcd)
        .unwrap_or(4);
    Indentation {
        kind: IndentKind::Spaces,
        size,
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

pub fn detect_quotes(code: &str) -> QuoteStyle {
    let single = single_quoted().find_iter(code).count();
    let double = double_quoted().find_iter(code).count();
    match single.cmp(&double) {
        std::cmp::Ordering::Greater => QuoteStyle::Single,
        std::cmp::Ordering::Less => QuoteStyle::Double,
        std::cmp::Ordering::Equal => QuoteStyle::Mixed,
    }
}

/// Floored mean character length of non-blank lines; 0 when there are none
pub fn average_line_length(lines: &[&str]) -> usize {
    let lengths: Vec<usize> = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().count())
        .collect();
    if lengths.is_empty() {
        return 0;
    }
    lengths.iter().sum::<usize>() / lengths.len()
}

#[derive(Debug, Clone, Copy)]
enum CommentSyntax {
    /// `#` comments, `"""`/`'''` docstrings
    Hash,
    /// `//` comments, `/*` blocks
    Slash,
}

fn detect_comments(lines: &[&str], syntax: CommentSyntax) -> CommentStyle {
    let (mut above, mut inline, mut docstring) = (0usize, 0usize, 0usize);
    let mut placement = |line: &str, marker: &str| {
        let before = line.split(marker).next().unwrap_or("");
        if before.trim().is_empty() {
            above += 1;
        } else {
            inline += 1;
        }
    };

    for line in lines {
        match syntax {
            CommentSyntax::Hash => {
                if line.contains("\"\"\"") || line.contains("'''") {
                    docstring += 1;
                } else if line.contains('#') {
                    placement(line, "#");
                }
            }
            CommentSyntax::Slash => {
                if line.contains("//") {
                    placement(line, "//");
                } else if line.contains("/*") {
                    docstring += 1;
                }
            }
        }
    }

    let counts = [
        (CommentStyle::Above, above),
        (CommentStyle::Inline, inline),
        (CommentStyle::Docstring, docstring),
    ];
    majority(&counts).unwrap_or(CommentStyle::Mixed)
}

/// Classify import layout from import-statement line numbers
fn detect_python_imports(code: &str) -> ImportStyle {
    let module = match parsers::python::parse(code) {
        Ok(module) => module,
        Err(e) => {
            debug!("Import style unknown: {}", e);
            return ImportStyle::Unknown;
        }
    };
    classify_import_lines(&module.import_lines)
}

pub fn classify_import_lines(lines: &[usize]) -> ImportStyle {
    match lines.len() {
        0 => ImportStyle::None,
        1 => ImportStyle::Single,
        n => {
            let total_gap: usize = lines.windows(2).map(|w| w[1] - w[0]).sum();
            let mean_gap = total_gap as f64 / (n - 1) as f64;
            if mean_gap <= 2.0 {
                ImportStyle::Grouped
            } else {
                ImportStyle::Scattered
            }
        }
    }
}
