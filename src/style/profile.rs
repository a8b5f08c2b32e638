//! Per-user style profile schema, merge and I/O

use super::patterns::{Indentation, StylePatterns};
use crate::error::{CodevibeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Observations after which an entry is fully confident
const SATURATION: f64 = 10.0;

/// Which style signal a profile entry tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Naming,
    Indentation,
    Quotes,
    LineLength,
    Comments,
    Imports,
}

impl PatternType {
    pub fn all() -> &'static [PatternType] {
        &[
            PatternType::Naming,
            PatternType::Indentation,
            PatternType::Quotes,
            PatternType::LineLength,
            PatternType::Comments,
            PatternType::Imports,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PatternType::Naming => "naming",
            PatternType::Indentation => "indentation",
            PatternType::Quotes => "quotes",
            PatternType::LineLength => "line_length",
            PatternType::Comments => "comments",
            PatternType::Imports => "imports",
        }
    }
}

/// Stored value of one pattern type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternValue {
    Indentation(Indentation),
    Text(String),
    Number(usize),
}

impl PatternValue {
    /// Pull the value for `kind` out of a snapshot
    pub fn observe(patterns: &StylePatterns, kind: PatternType) -> Self {
        match kind {
            PatternType::Naming => Self::Text(patterns.naming_convention.as_str().to_string()),
            PatternType::Indentation => Self::Indentation(patterns.indentation),
            PatternType::Quotes => Self::Text(patterns.quote_style.as_str().to_string()),
            PatternType::LineLength => Self::Number(patterns.average_line_length),
            PatternType::Comments => Self::Text(patterns.comment_style.as_str().to_string()),
            PatternType::Imports => Self::Text(patterns.import_style.as_str().to_string()),
        }
    }
}

impl std::fmt::Display for PatternValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternValue::Indentation(indent) => write!(f, "{}", indent),
            PatternValue::Text(text) => write!(f, "{}", text),
            PatternValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub pattern_value: PatternValue,
    /// Submissions observed since the entry was created
    pub frequency: u32,
    /// `min(1.0, frequency / 10)`
    pub confidence: f64,
}

/// Running style preferences for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Schema version
    pub version: u32,
    pub user_id: String,
    pub entries: BTreeMap<PatternType, ProfileEntry>,
    pub updated_at: DateTime<Utc>,
}

impl StyleProfile {
    pub const VERSION: u32 = 1;

    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            version: Self::VERSION,
            user_id: user_id.into(),
            entries: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn get(&self, kind: PatternType) -> Option<&ProfileEntry> {
        self.entries.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold one snapshot into the profile.
    ///
    /// Existing entries count one more observation but keep their stored
    /// value; the first observation of a pattern type fixes its value.
    pub fn merge(&mut self, patterns: &StylePatterns) {
        for &kind in PatternType::all() {
            match self.entries.get_mut(&kind) {
                Some(entry) => {
                    entry.frequency = entry.frequency.saturating_add(1);
                    entry.confidence = (entry.frequency as f64 / SATURATION).min(1.0);
                }
                None => {
                    self.entries.insert(
                        kind,
                        ProfileEntry {
                            pattern_value: PatternValue::observe(patterns, kind),
                            frequency: 1,
                            confidence: 1.0 / SATURATION,
                        },
                    );
                }
            }
        }
        self.updated_at = Utc::now();
    }

    /// Mean confidence across entries, 0.0 for an empty profile
    pub fn overall_confidence(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.values().map(|e| e.confidence).sum::<f64>() / self.entries.len() as f64
    }

    /// Load a profile from a JSON file. Missing files and version mismatches
    /// yield `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        let profile: Self = match serde_json::from_str(&data) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Ignoring unreadable style profile {}: {}", path.display(), e);
                return None;
            }
        };
        if profile.version != Self::VERSION {
            tracing::warn!(
                "Style profile version mismatch ({} vs {}), ignoring",
                profile.version,
                Self::VERSION
            );
            return None;
        }
        Some(profile)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| CodevibeError::resource("create profile directory", e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Saved style profile for '{}' to {}", self.user_id, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::patterns::{
        CommentStyle, ImportStyle, IndentKind, NamingConvention, QuoteStyle,
    };

    fn snapshot(naming: NamingConvention) -> StylePatterns {
        StylePatterns {
            naming_convention: naming,
            indentation: Indentation::default(),
            quote_style: QuoteStyle::Single,
            average_line_length: 42,
            comment_style: CommentStyle::Above,
            import_style: ImportStyle::Grouped,
        }
    }

    #[test]
    fn test_first_merge_creates_all_entries() {
        let mut profile = StyleProfile::new("alice");
        profile.merge(&snapshot(NamingConvention::SnakeCase));

        assert_eq!(profile.entries.len(), PatternType::all().len());
        for entry in profile.entries.values() {
            assert_eq!(entry.frequency, 1);
            assert!((entry.confidence - 0.1).abs() < 1e-9);
        }
        assert_eq!(
            profile.get(PatternType::LineLength).map(|e| &e.pattern_value),
            Some(&PatternValue::Number(42))
        );
    }

    #[test]
    fn test_confidence_saturates() {
        let mut profile = StyleProfile::new("alice");
        for _ in 0..10 {
            profile.merge(&snapshot(NamingConvention::SnakeCase));
        }
        let naming = profile.get(PatternType::Naming).expect("entry");
        assert_eq!(naming.frequency, 10);
        assert!((naming.confidence - 1.0).abs() < 1e-9);

        profile.merge(&snapshot(NamingConvention::SnakeCase));
        let naming = profile.get(PatternType::Naming).expect("entry");
        assert_eq!(naming.frequency, 11);
        assert_eq!(naming.confidence, 1.0);
        assert!((profile.overall_confidence() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_keeps_first_value() {
        let mut profile = StyleProfile::new("alice");
        profile.merge(&snapshot(NamingConvention::SnakeCase));
        profile.merge(&snapshot(NamingConvention::CamelCase));
        assert_eq!(
            profile.get(PatternType::Naming).map(|e| &e.pattern_value),
            Some(&PatternValue::Text("snake_case".into()))
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profiles").join("alice.json");

        let mut profile = StyleProfile::new("alice");
        profile.merge(&snapshot(NamingConvention::SnakeCase));
        profile.save(&path).expect("save");

        let loaded = StyleProfile::load(&path).expect("load");
        assert_eq!(loaded.user_id, "alice");
        assert_eq!(loaded.entries, profile.entries);
        assert_eq!(
            loaded.get(PatternType::Indentation).map(|e| &e.pattern_value),
            Some(&PatternValue::Indentation(Indentation {
                kind: IndentKind::Spaces,
                size: 4
            }))
        );
    }

    #[test]
    fn test_load_rejects_other_versions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("p.json");
        let mut profile = StyleProfile::new("bob");
        profile.version = 99;
        profile.save(&path).expect("save");
        assert!(StyleProfile::load(&path).is_none());
        assert!(StyleProfile::load(&dir.path().join("missing.json")).is_none());
    }

    #[test]
    fn test_entries_serialize_with_snake_case_keys() {
        let mut profile = StyleProfile::new("carol");
        profile.merge(&snapshot(NamingConvention::PascalCase));
        let json = serde_json::to_value(&profile).expect("json");
        assert_eq!(json["entries"]["line_length"]["pattern_value"], 42);
        assert_eq!(json["entries"]["naming"]["pattern_value"], "PascalCase");
        assert_eq!(json["entries"]["indentation"]["pattern_value"]["type"], "spaces");
    }
}
