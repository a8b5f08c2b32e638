//! Library-level scenario tests
//!
//! End-to-end checks of the public operations: detection, complexity,
//! heuristic scans, fixes, style extraction and profile merging. None of
//! these need pylint or ESLint installed.

use codevibe::analyzers::{EslintAnalyzer, LanguageAnalyzer, PylintAnalyzer};
use codevibe::models::{FixSuggestion, FixType, Severity};
use codevibe::style::{IndentKind, PatternType, StyleProfile};
use codevibe::{
    apply_fix, detect_language, extract_style, generate_fixes, merge_profile, scan_security,
    scan_smells, validate, AnalysisService, Config, Language,
};
use std::time::Duration;

fn fix_of(fixes: &[FixSuggestion], fix_type: FixType) -> &FixSuggestion {
    fixes
        .iter()
        .find(|f| f.fix_type == fix_type)
        .unwrap_or_else(|| panic!("no {} fix in {:?}", fix_type, fixes))
}

#[test]
fn test_hint_always_wins() {
    let java = "public class Main { void main() {} }";
    for &language in Language::all() {
        assert_eq!(detect_language(java, Some(language.as_str())), language);
        let upper = language.as_str().to_uppercase();
        assert_eq!(detect_language("def f():\n    pass", Some(&upper)), language);
    }
}

#[test]
fn test_detection_rule_order() {
    assert_eq!(detect_language("def f():\n    return 1", None), Language::Python);
    assert_eq!(detect_language("const x = 1;", None), Language::JavaScript);
    assert_eq!(
        detect_language("interface A { x: number }\nconst f = () => 1;", None),
        Language::TypeScript
    );
    assert_eq!(detect_language("public class Main {}", None), Language::Java);
    assert_eq!(detect_language("#include <iostream>", None), Language::Cpp);
    assert_eq!(detect_language("???", Some("cobol")), Language::Python);
}

#[test]
fn test_none_comparison_fix_still_parses() {
    let code = "x = 1\nif x == None:\n    pass\n";
    let fixes = generate_fixes(code, Language::Python);
    let fix = fixes
        .iter()
        .find(|f| f.after_code.contains("is None"))
        .expect("none fix");
    assert_eq!(fix.after_code, "if x is None:");
    assert!(fix.auto_applicable);

    let fixed = apply_fix(code, fix).expect("apply");
    assert!(validate(&fixed, Language::Python).is_ok());
}

#[test]
fn test_bare_except_fix() {
    let code = "try:\n    run()\nexcept:\n    pass\n";
    let fixes = generate_fixes(code, Language::Python);
    let fix = fix_of(&fixes, FixType::Refactor);
    assert_eq!(fix.after_code, "except Exception:");
    assert_eq!(fix.confidence, 0.9);
    assert!(fix.auto_applicable);
    assert_eq!(fix.line_start, 3);
}

#[test]
fn test_trailing_whitespace_fix_is_idempotent() {
    let code = "x = 1   \ny = 2\t\n";
    let once = codevibe::AutoFixer::new()
        .apply_auto_fixes(code, Language::Python)
        .expect("first pass");
    let twice = codevibe::AutoFixer::new()
        .apply_auto_fixes(&once.code, Language::Python)
        .expect("second pass");
    assert_eq!(once.code, "x = 1\ny = 2\n");
    assert_eq!(twice.code, once.code);
    assert!(twice.applied.is_empty());
}

#[test]
fn test_cyclomatic_matches_counts() {
    let python = PylintAnalyzer::new(vec!["pylint".into()], Duration::from_secs(1));
    let py = python.calculate_complexity(
        "def f(x):\n    if x:\n        for i in x:\n            pass\n    elif y:\n        while z:\n            pass\n",
    );
    assert_eq!(
        py["cyclomatic_complexity"],
        1 + py["num_conditionals"] + py["num_loops"]
    );

    let eslint = EslintAnalyzer::new(Vec::new(), Duration::from_secs(1));
    let js = eslint.calculate_complexity(
        "function f(a) {\n  if (a) { a.map(x => x); }\n  switch (a) { case 1: break; }\n  for (;;) {}\n}\n",
    );
    assert_eq!(
        js["cyclomatic_complexity"],
        1 + js["num_conditionals"] + js["num_loops"]
    );
    assert!(js["num_loops"] >= 2);
}

#[test]
fn test_indentation_gcd_recovery() {
    let code = "def f():\n    if a:\n        if b:\n            return 1\n";
    let style = extract_style(code, Language::Python);
    assert_eq!(style.indentation.kind, IndentKind::Spaces);
    assert_eq!(style.indentation.size, 4);
}

#[test]
fn test_unused_import_scenario() {
    let fixes = generate_fixes("import os\nprint('hi')\n", Language::Python);
    let fix = fix_of(&fixes, FixType::Simple);
    assert!(fix.title.contains("os"));
    assert_eq!(fix.line_start, 1);
    assert_eq!(fix.after_code, "");
    assert_eq!(fix.confidence, 0.9);
    assert!(fix.auto_applicable);
    assert_eq!(fix.diff, "- import os");
}

#[test]
fn test_eval_security_scenario() {
    let issues = scan_security("eval(user_input)", Language::Python);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].vulnerability_type, "code_injection");
    assert_eq!(issues[0].severity, Severity::Critical);
    assert_eq!(issues[0].cwe_id.as_deref(), Some("CWE-95"));
}

#[test]
fn test_long_snippet_single_smell() {
    let code: String = (0..55).map(|i| format!("x{} = {}\n\n", i, i)).collect::<String>();
    let code = code.lines().take(55).collect::<Vec<_>>().join("\n");
    let smells = scan_smells(&code, Language::Python);
    let long: Vec<_> = smells.iter().filter(|s| s.smell_type == "long_function").collect();
    assert_eq!(long.len(), 1);
    assert_eq!(long[0].line_number, 1);
    assert_eq!(long[0].severity, Severity::Medium);
}

#[test]
fn test_deletion_shifts_following_lines() {
    let code = "import os\nx = 1\ny = 2";
    let fixes = generate_fixes(code, Language::Python);
    let fix = fix_of(&fixes, FixType::Simple);
    let out = apply_fix(code, fix).expect("apply");
    assert_eq!(out, "x = 1\ny = 2");
    assert_eq!(out.lines().next(), Some("x = 1"));
}

#[test]
fn test_profile_merge_saturates() {
    let patterns = extract_style("def my_func():\n    return 'x'\n", Language::Python);
    let mut profile = StyleProfile::new("dev");

    profile = merge_profile(&profile, &patterns);
    let entry = profile.get(PatternType::Naming).expect("entry");
    assert_eq!(entry.frequency, 1);
    assert!((entry.confidence - 0.1).abs() < 1e-9);

    for _ in 1..10 {
        profile = merge_profile(&profile, &patterns);
    }
    let entry = profile.get(PatternType::Naming).expect("entry");
    assert_eq!(entry.frequency, 10);
    assert!((entry.confidence - 1.0).abs() < 1e-9);
}

#[test]
fn test_service_without_linter() {
    let service = AnalysisService::new(Config::default()).without_lint();
    let report = service
        .submit("import os\nif x == None:\n    eval(data)\n", Some("python"))
        .expect("submit");
    assert_eq!(report.language, Language::Python);
    assert_eq!(report.bugs.len(), 1);
    assert_eq!(report.security.len(), 1);
    assert!(report.fixes.iter().any(|f| f.fix_type == FixType::Security));
    assert_eq!(report.score.score, 95.0);
    let metrics = &report.analysis.as_ref().expect("complexity").complexity_metrics;
    assert_eq!(metrics["num_imports"], 1);
}

#[test]
fn test_unsupported_language_via_registry() {
    let err = codevibe::get_analyzer(Language::Cpp).err().expect("unsupported");
    assert_eq!(err.to_string(), "Unsupported language: cpp");
    assert!(codevibe::get_analyzer(Language::TypeScript).is_ok());
}
