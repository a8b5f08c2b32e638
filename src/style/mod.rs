//! Style learning
//!
//! Extracts a [`StylePatterns`] snapshot from each submission, folds it into a
//! per-user [`StyleProfile`], and compares new code against that profile.

pub mod extract;
pub mod patterns;
pub mod profile;

pub use patterns::{
    CommentStyle, ImportStyle, IndentKind, Indentation, NamingConvention, QuoteStyle,
    StylePatterns, StyleRecommendation,
};
pub use profile::{PatternType, PatternValue, ProfileEntry, StyleProfile};

use crate::language::Language;

/// Pattern types checked by [`StyleLearner::recommend`], with their
/// confidence
const RECOMMENDED: &[(PatternType, f64)] = &[
    (PatternType::Naming, 0.7),
    (PatternType::Indentation, 0.9),
    (PatternType::Quotes, 0.6),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct StyleLearner;

impl StyleLearner {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, code: &str, language: Language) -> StylePatterns {
        extract::extract(code, language)
    }

    /// Recommendations for every tracked pattern where `code` differs from
    /// what the profile has stored
    pub fn recommend(
        &self,
        code: &str,
        language: Language,
        profile: &StyleProfile,
    ) -> Vec<StyleRecommendation> {
        let current = self.extract(code, language);
        recommend_against(&current, profile)
    }

    pub fn merge(&self, profile: &mut StyleProfile, patterns: &StylePatterns) {
        profile.merge(patterns);
    }
}

/// Compare an extracted snapshot with a stored profile
pub fn recommend_against(current: &StylePatterns, profile: &StyleProfile) -> Vec<StyleRecommendation> {
    let mut out = Vec::new();
    for &(kind, confidence) in RECOMMENDED {
        let Some(entry) = profile.get(kind) else {
            continue;
        };
        let observed = PatternValue::observe(current, kind);
        if observed == entry.pattern_value {
            continue;
        }

        let preferred = &entry.pattern_value;
        let (recommendation_type, description) = match (kind, preferred) {
            (PatternType::Indentation, PatternValue::Indentation(indent)) => (
                "indentation",
                format!(
                    "Your usual indentation is {} {}",
                    indent.size,
                    indent.kind.as_str()
                ),
            ),
            (PatternType::Indentation, other) => {
                ("indentation", format!("Your usual indentation is {}", other))
            }
            (PatternType::Quotes, _) => {
                ("quote_style", format!("You typically use {} quotes", preferred))
            }
            _ => (
                "naming_convention",
                format!("Consider using {} to match your usual style", preferred),
            ),
        };

        out.push(StyleRecommendation {
            line_number: 1,
            recommendation_type: recommendation_type.to_string(),
            current_style: observed.to_string(),
            preferred_style: preferred.to_string(),
            description,
            confidence,
        });
    }
    out
}

/// Extract a style snapshot from `code`
pub fn extract_style(code: &str, language: Language) -> StylePatterns {
    extract::extract(code, language)
}

/// Fold `patterns` into a copy of `profile`
pub fn merge_profile(profile: &StyleProfile, patterns: &StylePatterns) -> StyleProfile {
    let mut merged = profile.clone();
    merged.merge(patterns);
    merged
}
