//! Init command - write a default codevibe.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::{default_config_template, CONFIG_FILENAME};

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        println!(
            "{} Already initialized at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, default_config_template())
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(CONFIG_FILENAME).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Analyze a file", style("codevibe analyze <file>").cyan());
    println!("  {} Review fixes", style("codevibe fix <file>").cyan());

    Ok(())
}
