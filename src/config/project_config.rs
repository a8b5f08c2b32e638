//! Configuration file support
//!
//! Loads `codevibe.toml` from an explicit path, the working directory, or
//! the user config directory, then applies environment overrides.
//!
//! # Configuration Format
//!
//! ```toml
//! # codevibe.toml
//!
//! [analysis]
//! timeout_secs = 30
//! max_code_length = 100000
//!
//! [linters]
//! python = ["pylint"]
//! javascript = []          # empty: bunx/npx eslint
//!
//! [model]
//! enabled = true
//! idle_timeout_secs = 300
//! max_code_length = 512
//!
//! [scoring]
//! issue_penalty = 2.0
//! bug_penalty = 5.0
//! ```

use crate::error::{CodevibeError, Result};
use crate::models::IssueSeverity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const CONFIG_FILENAME: &str = "codevibe.toml";

/// Complete codevibe configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub linters: LinterConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Limits applied to every submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Timeout for each external linter run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest snippet accepted, in characters
    #[serde(default = "default_max_code_length")]
    pub max_code_length: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_code_length: default_max_code_length(),
        }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject snippets longer than `max_code_length` characters
    pub fn check_size(&self, code: &str) -> Result<()> {
        let len = code.chars().count();
        if len > self.max_code_length {
            return Err(CodevibeError::CodeTooLarge {
                len,
                max: self.max_code_length,
            });
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_code_length() -> usize {
    100_000
}

/// Command lines for the external linters. The staged file path and the
/// JSON output flag are appended by the analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinterConfig {
    #[serde(default = "default_python_linter")]
    pub python: Vec<String>,

    /// Empty means auto-detect `bunx eslint` / `npx eslint`
    #[serde(default)]
    pub javascript: Vec<String>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            python: default_python_linter(),
            javascript: Vec::new(),
        }
    }
}

fn default_python_linter() -> Vec<String> {
    vec!["pylint".to_string()]
}

/// Settings for the lazily loaded embedding model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Unload after this many seconds without use
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Maximum tokens fed to the embedder
    #[serde(default = "default_model_max_code_length")]
    pub max_code_length: usize,

    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_timeout_secs: default_idle_timeout_secs(),
            max_code_length: default_model_max_code_length(),
            dimensions: default_dimensions(),
        }
    }
}

impl ModelConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_model_max_code_length() -> usize {
    512
}

fn default_dimensions() -> usize {
    768
}

/// Penalties used to turn findings into a 0-100 score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_base_score")]
    pub base: f64,

    /// Penalty per linter issue unless a per-severity override is set
    #[serde(default = "default_issue_penalty")]
    pub issue_penalty: f64,

    #[serde(default = "default_bug_penalty")]
    pub bug_penalty: f64,

    #[serde(default)]
    pub error_penalty: Option<f64>,
    #[serde(default)]
    pub warning_penalty: Option<f64>,
    #[serde(default)]
    pub info_penalty: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: default_base_score(),
            issue_penalty: default_issue_penalty(),
            bug_penalty: default_bug_penalty(),
            error_penalty: None,
            warning_penalty: None,
            info_penalty: None,
        }
    }
}

impl ScoringConfig {
    /// Penalty for one issue of the given severity
    pub fn penalty_for(&self, severity: IssueSeverity) -> f64 {
        let specific = match severity {
            IssueSeverity::Error => self.error_penalty,
            IssueSeverity::Warning => self.warning_penalty,
            IssueSeverity::Info => self.info_penalty,
        };
        specific.unwrap_or(self.issue_penalty)
    }
}

fn default_base_score() -> f64 {
    100.0
}

fn default_issue_penalty() -> f64 {
    2.0
}

fn default_bug_penalty() -> f64 {
    5.0
}

impl Config {
    /// Load config with priority:
    /// 1. `explicit` path (must exist and parse)
    /// 2. `./codevibe.toml`
    /// 3. `~/.config/codevibe/config.toml`
    /// 4. defaults
    ///
    /// Environment variables are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::discover(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CodevibeError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn discover() -> Self {
        let candidates = [Some(PathBuf::from(CONFIG_FILENAME)), Self::user_config_path()];

        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load {}: {}", path.display(), e),
            }
        }

        Config::default()
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codevibe").join("config.toml"))
    }

    /// Apply `CODEVIBE_*` overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&lookup, "CODEVIBE_ANALYSIS_TIMEOUT") {
            self.analysis.timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "CODEVIBE_MAX_CODE_LENGTH") {
            self.analysis.max_code_length = v;
        }
        if let Some(raw) = lookup("CODEVIBE_ML_ENABLED") {
            match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.model.enabled = true,
                "false" | "0" | "no" | "off" => self.model.enabled = false,
                other => warn!("Ignoring CODEVIBE_ML_ENABLED={:?}: not a boolean", other),
            }
        }
        if let Some(v) = parse_env(&lookup, "CODEVIBE_ML_IDLE_TIMEOUT") {
            self.model.idle_timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "CODEVIBE_ML_MAX_CODE_LENGTH") {
            self.model.max_code_length = v;
        }
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CodevibeError::Config(e.to_string()))
    }
}

fn parse_env<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

/// Commented config written by `codevibe init`
pub fn default_config_template() -> &'static str {
    r#"# codevibe configuration

[analysis]
# Timeout for each external linter run, in seconds
timeout_secs = 30
# Largest snippet accepted, in characters
max_code_length = 100000

[linters]
# Python linter command (file path and --output-format=json are appended)
python = ["pylint"]
# JavaScript/TypeScript linter command; empty uses bunx or npx eslint
javascript = []

[model]
# Lazily loaded embedding model used for semantic hints
enabled = true
# Unload the model after this many idle seconds
idle_timeout_secs = 300
max_code_length = 512
dimensions = 768

[scoring]
base = 100.0
issue_penalty = 2.0
bug_penalty = 5.0
# error_penalty = 3.0
# warning_penalty = 2.0
# info_penalty = 1.0
"#
}
