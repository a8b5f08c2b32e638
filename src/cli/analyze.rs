//! Analyze command
//!
//! Files are processed in parallel; each submission runs its stages in
//! sequence inside [`AnalysisService::submit`].

use anyhow::{Context, Result};
use console::style;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{language_hint, read_source};
use crate::config::Config;
use crate::pipeline::AnalysisService;
use crate::reporters::{self, FileReport, OutputFormat};

pub fn run(
    config: Config,
    files: &[PathBuf],
    language: Option<&str>,
    format: OutputFormat,
    no_lint: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut service = AnalysisService::new(config);
    if no_lint {
        service = service.without_lint();
    }

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| analyze_file(&service, path, language))
        .collect();

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    info!("Analyzed {} files ({} failed)", reports.len(), failed);

    let rendered = reporters::report(&reports, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }

    if failed == reports.len() {
        anyhow::bail!("No files could be analyzed");
    }
    Ok(())
}

fn analyze_file(service: &AnalysisService, path: &Path, language: Option<&str>) -> FileReport {
    let display = path.display().to_string();
    let code = match read_source(path) {
        Ok(code) => code,
        Err(e) => return FileReport::failed(display, format!("{:#}", e)),
    };
    let hint = language_hint(path, language);
    match service.submit(&code, hint.as_deref()) {
        Ok(report) => FileReport::ok(display, report),
        Err(e) => FileReport::failed(display, e),
    }
}
