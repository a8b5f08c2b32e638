//! Text (terminal) reporter with colors and formatting

use super::{FileReport, FixReport};
use crate::models::Severity;
use crate::pipeline::SubmissionReport;
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m",
        Severity::High => "\x1b[91m",
        Severity::Medium => "\x1b[33m",
        Severity::Low => "\x1b[34m",
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::High => "[H]",
        Severity::Medium => "[M]",
        Severity::Low => "[L]",
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

/// Render every file report
pub fn render(reports: &[FileReport]) -> Result<String> {
    let mut out = String::new();
    for file in reports {
        out.push_str(&format!("\n{BOLD}{}{RESET}\n", file.path));
        out.push_str(&format!(
            "{DIM}──────────────────────────────────────{RESET}\n"
        ));
        match (&file.report, &file.error) {
            (Some(report), _) => render_submission(report, &mut out),
            (None, Some(err)) => out.push_str(&format!("{RED}error:{RESET} {}\n", err)),
            (None, None) => {}
        }
    }
    Ok(out)
}

fn render_submission(report: &SubmissionReport, out: &mut String) {
    let grade_c = grade_color(&report.score.grade);
    out.push_str(&format!(
        "Language: {}  Score: {BOLD}{:.1}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n\n",
        report.language, report.score.score, report.score.grade
    ));

    if let Some(analysis) = &report.analysis {
        if let Some(err) = &analysis.error {
            out.push_str(&format!("{DIM}Linter: {}{RESET}\n", err));
        }
        if !analysis.issues.is_empty() {
            out.push_str(&format!("{BOLD}ISSUES{RESET} ({})\n", analysis.issues.len()));
            for issue in &analysis.issues {
                out.push_str(&format!(
                    "  {DIM}{:>4}:{:<3}{RESET} {:<8} {} {DIM}({}){RESET}\n",
                    issue.line, issue.column, issue.severity, issue.message, issue.symbol
                ));
            }
            out.push('\n');
        }
        if !analysis.complexity_metrics.is_empty() {
            let metrics: Vec<String> = analysis
                .complexity_metrics
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            out.push_str(&format!("{BOLD}METRICS{RESET}\n  {}\n\n", metrics.join("  ")));
        }
    }

    if report.finding_count() > 0 {
        out.push_str(&format!("{BOLD}FINDINGS{RESET} ({} total)\n", report.finding_count()));
        for bug in &report.bugs {
            finding_line(out, bug.severity, bug.line_number, &bug.bug_type, &bug.description);
        }
        for smell in &report.smells {
            finding_line(out, smell.severity, smell.line_number, &smell.smell_type, &smell.description);
        }
        for sec in &report.security {
            let kind = match &sec.cwe_id {
                Some(cwe) => format!("{} {}", sec.vulnerability_type, cwe),
                None => sec.vulnerability_type.clone(),
            };
            finding_line(out, sec.severity, sec.line_number, &kind, &sec.description);
        }
        out.push('\n');
    }

    if !report.fixes.is_empty() {
        let auto = report.fixes.iter().filter(|f| f.auto_applicable).count();
        out.push_str(&format!(
            "{BOLD}FIXES{RESET} ({} suggested, {} auto-applicable)\n",
            report.fixes.len(),
            auto
        ));
        for fix in report.fixes.iter().take(10) {
            out.push_str(&format!("  {DIM}{:<7}{RESET} {}\n", fix.fix_id, fix.title));
        }
        let remaining = report.fixes.len().saturating_sub(10);
        if remaining > 0 {
            out.push_str(&format!("  {DIM}...and {} more (use `codevibe fix`){RESET}\n", remaining));
        }
        out.push('\n');
    }

    let style = &report.style;
    out.push_str(&format!(
        "{BOLD}STYLE{RESET}\n  naming={} indent={} quotes={} line_length={} comments={} imports={}\n",
        style.naming_convention.as_str(),
        style.indentation,
        style.quote_style.as_str(),
        style.average_line_length,
        style.comment_style.as_str(),
        style.import_style.as_str()
    ));
}

fn finding_line(out: &mut String, severity: Severity, line: usize, kind: &str, description: &str) {
    out.push_str(&format!(
        "  {}{}{RESET} {DIM}line {:<4}{RESET} {:<24} {}\n",
        severity_color(severity),
        severity_tag(severity),
        line,
        kind,
        description
    ));
}

/// Render fix suggestions with their diffs
pub fn render_fixes(report: &FixReport<'_>) -> String {
    let mut out = format!("\n{BOLD}{}{RESET}: {} fixes\n", report.path, report.fixes.len());
    for fix in report.fixes {
        let mode = if fix.auto_applicable { "auto" } else { "manual" };
        out.push_str(&format!(
            "\n{BOLD}{}{RESET} [{}] {} {DIM}(confidence {:.1}, {}){RESET}\n",
            fix.fix_id, fix.fix_type, fix.title, fix.confidence, mode
        ));
        for line in fix.diff.lines() {
            let color = match line.chars().next() {
                Some('-') => RED,
                Some('+') => GREEN,
                _ => DIM,
            };
            out.push_str(&format!("  {color}{}{RESET}\n", line));
        }
    }
    out
}
