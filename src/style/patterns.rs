//! Style snapshot types

use serde::{Deserialize, Serialize};

/// Dominant identifier shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingConvention {
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "unknown")]
    Unknown,
}

impl NamingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::SnakeCase => "snake_case",
            NamingConvention::CamelCase => "camelCase",
            NamingConvention::PascalCase => "PascalCase",
            NamingConvention::Mixed => "mixed",
            NamingConvention::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentKind {
    Spaces,
    Tabs,
}

impl IndentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentKind::Spaces => "spaces",
            IndentKind::Tabs => "tabs",
        }
    }
}

/// `{ "type": "spaces", "size": 4 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indentation {
    #[serde(rename = "type")]
    pub kind: IndentKind,
    pub size: usize,
}

impl Default for Indentation {
    fn default() -> Self {
        Self {
            kind: IndentKind::Spaces,
            size: 4,
        }
    }
}

impl std::fmt::Display for Indentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind.as_str(), self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    Double,
    Mixed,
}

impl QuoteStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStyle::Single => "single",
            QuoteStyle::Double => "double",
            QuoteStyle::Mixed => "mixed",
        }
    }
}

/// Where comments are usually placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    Above,
    Inline,
    Docstring,
    Mixed,
    Unknown,
}

impl CommentStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStyle::Above => "above",
            CommentStyle::Inline => "inline",
            CommentStyle::Docstring => "docstring",
            CommentStyle::Mixed => "mixed",
            CommentStyle::Unknown => "unknown",
        }
    }
}

/// How import statements are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    None,
    Single,
    Grouped,
    Scattered,
    Es6,
    Unknown,
}

impl ImportStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStyle::None => "none",
            ImportStyle::Single => "single",
            ImportStyle::Grouped => "grouped",
            ImportStyle::Scattered => "scattered",
            ImportStyle::Es6 => "es6",
            ImportStyle::Unknown => "unknown",
        }
    }
}

/// Style fingerprint of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePatterns {
    pub naming_convention: NamingConvention,
    pub indentation: Indentation,
    pub quote_style: QuoteStyle,
    /// Mean length of non-blank lines, in characters (floored)
    pub average_line_length: usize,
    pub comment_style: CommentStyle,
    pub import_style: ImportStyle,
}

/// A mismatch between a snippet and the user's usual style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRecommendation {
    pub line_number: usize,
    pub recommendation_type: String,
    pub current_style: String,
    pub preferred_style: String,
    pub description: String,
    pub confidence: f64,
}
