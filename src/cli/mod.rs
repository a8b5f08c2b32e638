//! CLI command definitions and handlers

mod analyze;
mod fix;
mod init;
mod style;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::language::Language;
use crate::reporters::OutputFormat;

/// codevibe - snippet analysis, auto-fixes and style learning
#[derive(Parser, Debug)]
#[command(name = "codevibe")]
#[command(
    version,
    about = "Analyze code snippets: linting, heuristic bug/smell/security scans, auto-fixes and style profiles",
    after_help = "\
Examples:
  codevibe detect snippet.txt                  Print the detected language
  codevibe analyze app.py util.js              Full analysis of several files
  codevibe analyze app.py --no-lint -f json    Heuristics only, JSON output
  codevibe fix app.py --apply                  Apply every auto-applicable fix
  codevibe style app.py --user alice --update  Compare against and update a style profile"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Path to a codevibe.toml (default: ./codevibe.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the language a file is detected as
    Detect {
        file: PathBuf,

        /// Language hint; always wins when it names a known language
        #[arg(long, short = 'l')]
        language: Option<String>,
    },

    /// Run the full analysis pipeline on one or more files
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language hint applied to every file (default: from the extension)
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Skip the external linter (heuristics and complexity still run)
        #[arg(long)]
        no_lint: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List fix suggestions, or apply the auto-applicable ones
    Fix {
        file: PathBuf,

        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Apply every auto-applicable fix and rewrite the file
        #[arg(long)]
        apply: bool,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Extract style patterns and compare them with a stored profile
    Style {
        file: PathBuf,

        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Profile JSON file (default: <data dir>/codevibe/profiles/<user>.json)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Profile owner
        #[arg(long, default_value = "default")]
        user: String,

        /// Merge this file's style into the profile and save it
        #[arg(long)]
        update: bool,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write a codevibe.toml with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the parsed command
pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { force } = cli.command {
        return init::run(Path::new("."), force);
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Detect { file, language } => {
            let code = read_source(&file)?;
            let hint = language_hint(&file, language.as_deref());
            println!("{}", Language::detect(&code, hint.as_deref()));
            Ok(())
        }

        Commands::Analyze {
            files,
            language,
            format,
            no_lint,
            output,
        } => analyze::run(
            config,
            &files,
            language.as_deref(),
            format.parse::<OutputFormat>()?,
            no_lint,
            output.as_deref(),
        ),

        Commands::Fix {
            file,
            language,
            apply,
            format,
        } => fix::run(
            &config.analysis,
            &file,
            language.as_deref(),
            apply,
            format.parse::<OutputFormat>()?,
        ),

        Commands::Style {
            file,
            language,
            profile,
            user,
            update,
            format,
        } => style::run(
            &config.analysis,
            &file,
            language.as_deref(),
            profile,
            &user,
            update,
            format.parse::<OutputFormat>()?,
        ),

        Commands::Init { .. } => Ok(()),
    }
}

/// Read a source file as UTF-8
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// An explicit `--language` wins; otherwise the file extension is used as
/// the hint
fn language_hint(path: &Path, explicit: Option<&str>) -> Option<String> {
    if let Some(hint) = explicit {
        return Some(hint.to_string());
    }
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| Language::from_extension(&e.to_lowercase()))
        .map(|l| l.as_str().to_string())
}
