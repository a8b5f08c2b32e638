//! Configuration module for codevibe
//!
//! This module handles:
//! - `codevibe.toml` discovery and parsing
//! - Environment variable overrides
//! - Linter commands, timeouts, model and scoring settings

mod project_config;

pub use project_config::{
    default_config_template, AnalysisConfig, Config, LinterConfig, ModelConfig, ScoringConfig,
    CONFIG_FILENAME,
};
