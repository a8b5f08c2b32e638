//! Submission pipeline
//!
//! Runs every analysis stage over one snippet, strictly in sequence:
//! 1. Size guard
//! 2. Language detection
//! 3. Static analysis (external linter + complexity counts)
//! 4. Bug, smell and security scans
//! 5. Fix generation
//! 6. Style extraction
//! 7. Scoring

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzers::AnalyzerRegistry;
use crate::config::Config;
use crate::detectors::embedding::ModelSlot;
use crate::detectors::HeuristicScanner;
use crate::error::Result;
use crate::fixes::AutoFixer;
use crate::language::Language;
use crate::models::{AnalysisResult, BugPrediction, CodeSmell, FixSuggestion, SecurityIssue};
use crate::scoring::{ScoreBreakdown, Scorer};
use crate::style::{StyleLearner, StylePatterns};

/// Everything produced for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub language: Language,
    /// `None` when the language has no analyzer and linting was skipped
    pub analysis: Option<AnalysisResult>,
    pub bugs: Vec<BugPrediction>,
    pub smells: Vec<CodeSmell>,
    pub security: Vec<SecurityIssue>,
    pub fixes: Vec<FixSuggestion>,
    pub style: StylePatterns,
    pub score: ScoreBreakdown,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

impl SubmissionReport {
    pub fn issue_count(&self) -> usize {
        self.analysis.as_ref().map_or(0, |a| a.issues.len())
    }

    pub fn finding_count(&self) -> usize {
        self.bugs.len() + self.smells.len() + self.security.len()
    }
}

/// Owned analysis service: one per process, shared by reference
pub struct AnalysisService {
    registry: AnalyzerRegistry,
    scanner: HeuristicScanner,
    fixer: AutoFixer,
    style: StyleLearner,
    config: Config,
    /// Whether to run the external linter
    lint: bool,
}

impl AnalysisService {
    /// Default analyzers, plus the embedding slot when enabled
    pub fn new(config: Config) -> Self {
        let registry = AnalyzerRegistry::with_defaults(&config);
        let scanner = if config.model.enabled {
            HeuristicScanner::with_model(Arc::new(ModelSlot::with_default_backend(&config.model)))
        } else {
            HeuristicScanner::new()
        };
        Self {
            registry,
            scanner,
            fixer: AutoFixer::new(),
            style: StyleLearner::new(),
            config,
            lint: true,
        }
    }

    /// Replace the analyzer registry
    pub fn with_registry(mut self, registry: AnalyzerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Skip the external linter; complexity counts still run when an
    /// analyzer exists for the language.
    pub fn without_lint(mut self) -> Self {
        self.lint = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fixer(&self) -> &AutoFixer {
        &self.fixer
    }

    pub fn scanner(&self) -> &HeuristicScanner {
        &self.scanner
    }

    pub fn style(&self) -> &StyleLearner {
        &self.style
    }

    /// Run the full pipeline on one snippet
    pub fn submit(&self, code: &str, hint: Option<&str>) -> Result<SubmissionReport> {
        self.config.analysis.check_size(code)?;

        let language = Language::detect(code, hint);
        debug!("Submission detected as {}", language);

        let analysis = self.static_analysis(code, language)?;

        let bugs = self.scanner.scan_bugs(code, language);
        let smells = self.scanner.scan_smells(code, language);
        let security = self.scanner.scan_security(code, language);
        let embedding = self.scanner.embed(code);

        let fixes = self.fixer.generate(code, language);
        let style = self.style.extract(code, language);

        let issues = analysis.as_ref().map_or(&[][..], |a| a.issues.as_slice());
        let score = Scorer::new(&self.config.scoring).score(issues, &bugs);

        self.scanner.cleanup();

        info!(
            "Analyzed {} snippet: {} issues, {} findings, {} fixes, score {:.1}",
            language,
            issues.len(),
            bugs.len() + smells.len() + security.len(),
            fixes.len(),
            score.score
        );

        Ok(SubmissionReport {
            language,
            analysis,
            bugs,
            smells,
            security,
            fixes,
            style,
            score,
            embedding,
        })
    }

    fn static_analysis(&self, code: &str, language: Language) -> Result<Option<AnalysisResult>> {
        if self.lint {
            let analyzer = self.registry.get_analyzer(language)?;
            debug!("Dispatching to {}", analyzer.name());
            let result = analyzer.analyze(code)?;
            if let Some(err) = &result.error {
                warn!("{} reported: {}", analyzer.name(), err);
            }
            return Ok(Some(result));
        }

        Ok(self.registry.get_analyzer(language).ok().map(|analyzer| {
            let mut result = AnalysisResult::new(language);
            result.complexity_metrics = analyzer.calculate_complexity(code);
            result
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::LanguageAnalyzer;
    use crate::error::CodevibeError;
    use crate::models::{ComplexityMetrics, Issue, IssueSeverity};

    /// Analyzer that reports one fixed issue
    struct StubAnalyzer;

    impl LanguageAnalyzer for StubAnalyzer {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn analyze(&self, code: &str) -> Result<AnalysisResult> {
            let mut result = AnalysisResult::new(Language::Python);
            result.complexity_metrics = self.calculate_complexity(code);
            result.issues.push(Issue {
                category: "error".into(),
                symbol: "stub".into(),
                message: "stub issue".into(),
                line: 1,
                column: 0,
                severity: IssueSeverity::Error,
            });
            Ok(result)
        }

        fn calculate_complexity(&self, code: &str) -> ComplexityMetrics {
            let mut metrics = ComplexityMetrics::new();
            metrics.insert("total_lines".into(), code.split('\n').count());
            metrics
        }
    }

    fn service() -> AnalysisService {
        let mut registry = AnalyzerRegistry::new();
        registry.register(Language::Python, Arc::new(StubAnalyzer));
        AnalysisService::new(Config::default()).with_registry(registry)
    }

    #[test]
    fn test_submit_runs_every_stage() {
        let report = service()
            .submit("import os\nif x == None:\n    pass\n", Some("python"))
            .expect("submit");
        assert_eq!(report.language, Language::Python);
        assert_eq!(report.issue_count(), 1);
        assert_eq!(report.bugs.len(), 1);
        assert!(!report.fixes.is_empty());
        // 100 - 2 (issue) - 5 (bug)
        assert_eq!(report.score.score, 93.0);
        assert_eq!(report.score.grade, "A");
        assert!(report.embedding.is_some());
    }

    #[test]
    fn test_unsupported_language_errors_when_linting() {
        let err = service()
            .submit("public class Main {}", Some("java"))
            .unwrap_err();
        assert!(matches!(err, CodevibeError::UnsupportedLanguage(Language::Java)));
    }

    #[test]
    fn test_without_lint_still_scans() {
        let svc = service().without_lint();
        let java = svc.submit("public class Main {}", Some("java")).expect("submit");
        assert!(java.analysis.is_none());
        assert_eq!(java.score.score, 100.0);

        let py = svc.submit("x = 1\n", None).expect("submit");
        let analysis = py.analysis.expect("complexity only");
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.metric("total_lines"), Some(2));
    }

    #[test]
    fn test_size_guard() {
        let mut config = Config::default();
        config.analysis.max_code_length = 10;
        let svc = AnalysisService::new(config).without_lint();
        let err = svc.submit("x = 1234567890", None).unwrap_err();
        assert!(matches!(err, CodevibeError::CodeTooLarge { len: 14, max: 10 }));
    }

    #[test]
    fn test_embedding_skipped_from_json() {
        let report = service().without_lint().submit("x = 1", None).expect("submit");
        let json = serde_json::to_value(&report).expect("json");
        assert!(json.get("embedding").is_none());
        assert_eq!(json["style"]["indentation"]["type"], "spaces");
    }
}
