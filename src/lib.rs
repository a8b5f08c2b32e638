//! codevibe - multi-language snippet analysis
//!
//! Language detection, linter-backed static analysis, heuristic bug/smell/
//! security scans, rule-based auto-fixes, and per-user style learning.
//!
//! ```no_run
//! use codevibe::{AnalysisService, Config};
//!
//! let service = AnalysisService::new(Config::default()).without_lint();
//! let report = service.submit("if x == None:\n    pass\n", Some("python"))?;
//! println!("{} ({})", report.score.score, report.score.grade);
//! # Ok::<(), codevibe::CodevibeError>(())
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod error;
pub mod fixes;
pub mod language;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod style;

pub use analyzers::{AnalyzerRegistry, LanguageAnalyzer};
pub use config::Config;
pub use detectors::{scan_bugs, scan_security, scan_smells, HeuristicScanner};
pub use error::{CodevibeError, ExternalToolError, FixError, ParseError, Result};
pub use fixes::{apply_fix, validate, AutoFixer};
pub use language::{detect_language, Language};
pub use pipeline::{AnalysisService, SubmissionReport};
pub use style::{extract_style, merge_profile, StyleLearner, StylePatterns, StyleProfile};

/// Run the fix battery with a fresh generator
pub fn generate_fixes(code: &str, language: Language) -> Vec<models::FixSuggestion> {
    AutoFixer::new().generate(code, language)
}

/// Default analyzer for `language`
pub fn get_analyzer(language: Language) -> Result<std::sync::Arc<dyn LanguageAnalyzer>> {
    AnalyzerRegistry::with_defaults(&Config::default()).get_analyzer(language)
}
