//! JavaScript/TypeScript fix battery

use super::FixSpec;
use crate::detectors::patterns::loose_equality_offsets;
use crate::models::FixType;
use regex::Regex;
use std::sync::OnceLock;

static VAR_KEYWORD: OnceLock<Regex> = OnceLock::new();
static INNER_HTML: OnceLock<Regex> = OnceLock::new();

fn var_keyword() -> &'static Regex {
    VAR_KEYWORD.get_or_init(|| Regex::new(r"\bvar\b").expect("valid regex"))
}

fn inner_html() -> &'static Regex {
    INNER_HTML.get_or_init(|| Regex::new(r"innerHTML(\s*)=([^=]|$)").expect("valid regex"))
}

/// All JS/TS fixes, in battery order
pub(super) fn fixes(lines: &[&str]) -> Vec<FixSpec> {
    let mut out = Vec::new();
    strict_equality(lines, &mut out);
    var_to_const(lines, &mut out);
    inner_html_assignments(lines, &mut out);
    out
}

fn strict_equality(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        let offsets = loose_equality_offsets(line);
        if offsets.is_empty() {
            continue;
        }

        let mut after = String::with_capacity(line.len() + offsets.len());
        let mut last = 0;
        for offset in offsets {
            after.push_str(&line[last..offset]);
            after.push_str("===");
            last = offset + 2;
        }
        after.push_str(&line[last..]);

        out.push(FixSpec::line(
            FixType::Style,
            i + 1,
            format!("Use strict equality (===) on line {}", i + 1),
            "Use === instead of == for strict equality",
            line,
            after,
        ));
    }
}

/// Always proposes `const`; whether `let` is needed is left to the user
fn var_to_const(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        if !var_keyword().is_match(line) {
            continue;
        }
        out.push(
            FixSpec::line(
                FixType::Style,
                i + 1,
                format!("Replace 'var' with 'const' on line {}", i + 1),
                "Use const or let instead of var for block scoping",
                line,
                var_keyword().replace_all(line, "const").into_owned(),
            )
            .confidence(0.8)
            .manual(),
        );
    }
}

fn inner_html_assignments(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        if !inner_html().is_match(line) {
            continue;
        }
        out.push(
            FixSpec::line(
                FixType::Security,
                i + 1,
                format!("Use textContent instead of innerHTML on line {}", i + 1),
                "Assigning to innerHTML parses the value as markup and can lead to XSS",
                line,
                inner_html().replace_all(line, "textContent${1}=${2}").into_owned(),
            )
            .confidence(0.7)
            .manual(),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::fixes::AutoFixer;
    use crate::language::Language;
    use crate::models::FixType;

    #[test]
    fn test_strict_equality_rewrite() {
        let fixes = AutoFixer::new().generate(
            "if (a == b && c === d && e != f) {}",
            Language::JavaScript,
        );
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].after_code, "if (a === b && c === d && e != f) {}");
        assert_eq!(fixes[0].confidence, 1.0);
        assert!(fixes[0].auto_applicable);
    }

    #[test]
    fn test_var_to_const_is_manual() {
        let fixes = AutoFixer::new().generate("var count = 0;\nvariable = 1;", Language::TypeScript);
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].after_code, "const count = 0;");
        assert_eq!(fixes[0].confidence, 0.8);
        assert!(!fixes[0].auto_applicable);
    }

    #[test]
    fn test_inner_html_fix() {
        let fixes = AutoFixer::new().generate("el.innerHTML = msg;", Language::JavaScript);
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].fix_type, FixType::Security);
        assert_eq!(fixes[0].after_code, "el.textContent = msg;");
        assert!(!fixes[0].auto_applicable);
    }

    #[test]
    fn test_no_fixes_for_java() {
        assert!(AutoFixer::new()
            .generate("if (a == b) { var x; }", Language::Java)
            .is_empty());
    }
}
