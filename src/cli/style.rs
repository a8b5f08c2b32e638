//! Style command: extract, compare, optionally learn

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{language_hint, read_source};
use crate::config::AnalysisConfig;
use crate::language::Language;
use crate::reporters::OutputFormat;
use crate::style::{recommend_against, StyleLearner, StylePatterns, StyleProfile, StyleRecommendation};

#[derive(Serialize)]
struct StyleOutput<'a> {
    language: Language,
    patterns: &'a StylePatterns,
    recommendations: &'a [StyleRecommendation],
    profile_confidence: f64,
}

/// Default profile location for `user`
fn default_profile_path(user: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".codevibe"))
        .join("codevibe")
        .join("profiles")
        .join(format!("{}.json", user))
}

pub fn run(
    limits: &AnalysisConfig,
    path: &Path,
    language: Option<&str>,
    profile_path: Option<PathBuf>,
    user: &str,
    update: bool,
    format: OutputFormat,
) -> Result<()> {
    let code = read_source(path)?;
    limits
        .check_size(&code)
        .with_context(|| format!("Cannot learn style from {}", path.display()))?;
    let hint = language_hint(path, language);
    let language = Language::detect(&code, hint.as_deref());

    let learner = StyleLearner::new();
    let patterns = learner.extract(&code, language);

    let profile_path = profile_path.unwrap_or_else(|| default_profile_path(user));
    let mut profile = StyleProfile::load(&profile_path).unwrap_or_else(|| StyleProfile::new(user));
    let recommendations = recommend_against(&patterns, &profile);

    if update {
        learner.merge(&mut profile, &patterns);
        profile
            .save(&profile_path)
            .with_context(|| format!("Failed to save profile to {}", profile_path.display()))?;
    }

    match format {
        OutputFormat::Json => {
            let out = StyleOutput {
                language,
                patterns: &patterns,
                recommendations: &recommendations,
                profile_confidence: profile.overall_confidence(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("\n{} ({})", style("Style patterns").bold(), language);
            println!("  naming       {}", patterns.naming_convention.as_str());
            println!("  indentation  {}", patterns.indentation);
            println!("  quotes       {}", patterns.quote_style.as_str());
            println!("  line length  {}", patterns.average_line_length);
            println!("  comments     {}", patterns.comment_style.as_str());
            println!("  imports      {}", patterns.import_style.as_str());

            if recommendations.is_empty() {
                println!("\n{} Matches the stored profile", style("✓").green());
            } else {
                println!("\n{}", style("Recommendations").bold());
                for rec in &recommendations {
                    println!(
                        "  {} {} {}",
                        style("•").yellow(),
                        rec.description,
                        style(format!("(currently {}, confidence {:.1})", rec.current_style, rec.confidence)).dim()
                    );
                }
            }

            if update {
                println!(
                    "\n{} Profile '{}' updated ({:.0}% confident): {}",
                    style("✓").green(),
                    user,
                    profile.overall_confidence() * 100.0,
                    style(profile_path.display()).cyan()
                );
            }
        }
    }

    Ok(())
}
