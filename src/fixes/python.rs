//! Python fix battery

use super::FixSpec;
use crate::models::FixType;
use crate::parsers::{self, DefinitionKind};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static NONE_COMPARISON: OnceLock<Regex> = OnceLock::new();
static NONE_LEFT: OnceLock<Regex> = OnceLock::new();
static NONE_RIGHT: OnceLock<Regex> = OnceLock::new();
static BARE_EXCEPT: OnceLock<Regex> = OnceLock::new();
static FOR_LOOP: OnceLock<Regex> = OnceLock::new();
static APPEND_CALL: OnceLock<Regex> = OnceLock::new();
static APPEND_TARGET: OnceLock<Regex> = OnceLock::new();
static EVAL_CALL: OnceLock<Regex> = OnceLock::new();

fn none_comparison() -> &'static Regex {
    NONE_COMPARISON.get_or_init(|| Regex::new(r"==\s*None|None\s*==").expect("valid regex"))
}

fn none_right() -> &'static Regex {
    NONE_RIGHT.get_or_init(|| Regex::new(r"==\s*None").expect("valid regex"))
}

fn none_left() -> &'static Regex {
    NONE_LEFT.get_or_init(|| Regex::new(r"None\s*==").expect("valid regex"))
}

fn bare_except() -> &'static Regex {
    BARE_EXCEPT.get_or_init(|| Regex::new(r"except\s*:").expect("valid regex"))
}

fn for_loop() -> &'static Regex {
    FOR_LOOP.get_or_init(|| Regex::new(r"for\s+(\w+)\s+in\s+(.+):").expect("valid regex"))
}

fn append_call() -> &'static Regex {
    APPEND_CALL.get_or_init(|| Regex::new(r"\.append\((.+)\)").expect("valid regex"))
}

fn append_target() -> &'static Regex {
    APPEND_TARGET.get_or_init(|| Regex::new(r"(\w+)\.append\(").expect("valid regex"))
}

fn eval_call() -> &'static Regex {
    EVAL_CALL.get_or_init(|| Regex::new(r"(^|[^\w.])eval(\s*)\(").expect("valid regex"))
}

/// All Python fixes, in battery order
pub(super) fn fixes(code: &str, lines: &[&str]) -> Vec<FixSpec> {
    let module = match parsers::python::parse(code) {
        Ok(module) => Some(module),
        Err(e) => {
            debug!("Skipping syntax-tree fixes: {}", e);
            None
        }
    };

    let mut out = Vec::new();
    if let Some(module) = &module {
        unused_imports(module, lines, &mut out);
    }
    trailing_whitespace(lines, &mut out);
    if let Some(module) = &module {
        missing_docstrings(module, lines, &mut out);
    }
    none_comparisons(lines, &mut out);
    bare_excepts(lines, &mut out);
    list_comprehensions(lines, &mut out);
    eval_calls(lines, &mut out);
    out
}

/// An import whose name appears on exactly one line (its own) is unused
fn unused_imports(module: &parsers::ParsedModule, lines: &[&str], out: &mut Vec<FixSpec>) {
    for import in &module.imports {
        let usage = lines.iter().filter(|l| l.contains(import.name.as_str())).count();
        if usage != 1 {
            continue;
        }
        let Some(before) = lines.get(import.line - 1) else {
            continue;
        };
        out.push(
            FixSpec::line(
                FixType::Simple,
                import.line,
                format!("Remove unused import '{}'", import.name),
                format!("Import '{}' is not used in the code", import.name),
                before,
                String::new(),
            )
            .confidence(0.9),
        );
    }
}

fn trailing_whitespace(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_end();
        if trimmed.len() != line.len() {
            out.push(FixSpec::line(
                FixType::Style,
                i + 1,
                format!("Remove trailing whitespace on line {}", i + 1),
                "Trailing whitespace should be removed",
                line,
                trimmed.to_string(),
            ));
        }
    }
}

/// Suggest a placeholder docstring below the `def`/`class` line
fn missing_docstrings(module: &parsers::ParsedModule, lines: &[&str], out: &mut Vec<FixSpec>) {
    for def in module.definitions.iter().filter(|d| !d.has_docstring) {
        let Some(before) = lines.get(def.line - 1) else {
            continue;
        };
        let indent = before.len() - before.trim_start().len();
        let (noun, placeholder) = match def.kind {
            DefinitionKind::Function => ("Function", "TODO: Add function description"),
            DefinitionKind::Class => ("Class", "TODO: Add class description"),
        };
        let after = format!(
            "{}\n{}\"\"\"{}\"\"\"",
            before,
            " ".repeat(indent + 4),
            placeholder
        );

        out.push(
            FixSpec::line(
                FixType::Style,
                def.line,
                format!("Add docstring to {}", def.name),
                format!("{} '{}' is missing a docstring", noun, def.name),
                before,
                after,
            )
            .confidence(0.8)
            .manual(),
        );
    }
}

/// `x == None` -> `x is None`, `None == x` -> `None is x`
fn none_comparisons(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        if !none_comparison().is_match(line) {
            continue;
        }
        let after = none_right().replace_all(line, "is None");
        let after = none_left().replace_all(&after, "None is").into_owned();
        out.push(FixSpec::line(
            FixType::Style,
            i + 1,
            format!("Use 'is None' instead of '== None' on line {}", i + 1),
            "Use 'is' for None comparison instead of '=='",
            line,
            after,
        ));
    }
}

fn bare_excepts(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        if !bare_except().is_match(line) {
            continue;
        }
        let after = bare_except().replace_all(line, "except Exception:").into_owned();
        out.push(
            FixSpec::line(
                FixType::Refactor,
                i + 1,
                format!("Replace bare except on line {}", i + 1),
                "Bare except catches all exceptions including system exits",
                line,
                after,
            )
            .confidence(0.9),
        );
    }
}

/// `for x in xs:` directly followed by `acc.append(expr)`.
///
/// Only adjacent lines are compared, and the final pair of lines is never
/// examined.
fn list_comprehensions(lines: &[&str], out: &mut Vec<FixSpec>) {
    for i in 0..lines.len().saturating_sub(2) {
        let (head, body) = (lines[i], lines[i + 1]);
        if !(head.contains("for ") && head.contains(" in ") && body.contains(".append(")) {
            continue;
        }
        let Some(loop_caps) = for_loop().captures(head) else {
            continue;
        };
        let Some(append_caps) = append_call().captures(body) else {
            continue;
        };

        let target = append_target()
            .captures(body)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "result".to_string());
        let indent = &head[..head.len() - head.trim_start().len()];
        let after = format!(
            "{}{} = [{} for {} in {}]",
            indent, target, &append_caps[1], &loop_caps[1], &loop_caps[2]
        );

        out.push(FixSpec {
            fix_type: FixType::Performance,
            title: format!("Use list comprehension on line {}", i + 1),
            description: "List comprehension is more Pythonic and faster".to_string(),
            line_start: i + 1,
            line_end: i + 2,
            before: format!("{}\n{}", head, body),
            after,
            confidence: 0.7,
            auto_applicable: false,
        });
    }
}

fn eval_calls(lines: &[&str], out: &mut Vec<FixSpec>) {
    for (i, line) in lines.iter().enumerate() {
        if !eval_call().is_match(line) {
            continue;
        }
        let after = eval_call()
            .replace_all(line, "${1}ast.literal_eval${2}(")
            .into_owned();
        out.push(
            FixSpec::line(
                FixType::Security,
                i + 1,
                format!("Replace eval() with ast.literal_eval() on line {}", i + 1),
                "eval() executes arbitrary code; ast.literal_eval() only accepts literals",
                line,
                after,
            )
            .confidence(0.6)
            .manual(),
        );
    }
}
