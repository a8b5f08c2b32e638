//! Fix command implementation
//!
//! Lists rule-based fix suggestions, or applies every auto-applicable fix
//! and rewrites the file.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::Path;

use super::{language_hint, read_source};
use crate::config::AnalysisConfig;
use crate::fixes::AutoFixer;
use crate::language::Language;
use crate::reporters::{self, FixReport, OutputFormat};

pub fn run(
    limits: &AnalysisConfig,
    path: &Path,
    language: Option<&str>,
    apply: bool,
    format: OutputFormat,
) -> Result<()> {
    let code = read_source(path)?;
    limits
        .check_size(&code)
        .with_context(|| format!("Cannot fix {}", path.display()))?;
    let hint = language_hint(path, language);
    let language = Language::detect(&code, hint.as_deref());
    let fixer = AutoFixer::new();
    let display = path.display().to_string();

    if !apply {
        let fixes = fixer.generate(&code, language);
        let report = FixReport {
            path: &display,
            fixes: &fixes,
        };
        println!("{}", reporters::fixes_report(&report, format)?);
        return Ok(());
    }

    let outcome = fixer
        .apply_auto_fixes(&code, language)
        .with_context(|| format!("Failed to apply fixes to {}", display))?;

    if !outcome.applied.is_empty() {
        fs::write(path, &outcome.code)
            .with_context(|| format!("Failed to write {}", display))?;
    }

    if format == OutputFormat::Json {
        let report = FixReport {
            path: &display,
            fixes: &outcome.applied,
        };
        println!("{}", reporters::fixes_report(&report, format)?);
        return Ok(());
    }

    if outcome.applied.is_empty() {
        println!("{} No auto-applicable fixes for {}", style("✓").green(), display);
    } else {
        println!(
            "\n{} Applied {} fixes to {}",
            style("✓").green().bold(),
            outcome.applied.len(),
            style(&display).cyan()
        );
        for fix in &outcome.applied {
            println!("  {} {}", style(&fix.fix_id).dim(), fix.title);
        }
    }
    for fix in &outcome.rejected {
        println!(
            "  {} skipped {} (result did not parse)",
            style("!").yellow(),
            fix.title
        );
    }

    Ok(())
}
