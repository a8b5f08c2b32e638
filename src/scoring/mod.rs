//! Submission quality score
//!
//! # Scoring Formula
//!
//! ```text
//! Score = max(0, base - Σ issue_penalty(severity) - bug_penalty × bugs)
//! ```
//!
//! Defaults: base 100, 2 points per linter issue, 5 points per heuristic bug
//! prediction. Per-severity issue penalties override the flat one when set.
//!
//! # Grades
//!
//! - A: ≥ 90
//! - B: ≥ 80
//! - C: ≥ 70
//! - D: ≥ 60
//! - F: below 60

use crate::config::ScoringConfig;
use crate::models::{BugPrediction, Issue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub grade: String,
    pub issue_penalty: f64,
    pub bug_penalty: f64,
}

pub struct Scorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, issues: &[Issue], bugs: &[BugPrediction]) -> ScoreBreakdown {
        let issue_penalty: f64 = issues
            .iter()
            .map(|i| self.config.penalty_for(i.severity))
            .sum();
        let bug_penalty = self.config.bug_penalty * bugs.len() as f64;
        let score = (self.config.base - issue_penalty - bug_penalty).max(0.0);

        ScoreBreakdown {
            score,
            grade: grade(score).to_string(),
            issue_penalty,
            bug_penalty,
        }
    }
}

/// Letter grade for a 0-100 score
pub fn grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 70.0 {
        "C"
    } else if score >= 60.0 {
        "D"
    } else {
        "F"
    }
}
