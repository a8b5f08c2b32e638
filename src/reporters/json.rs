//! JSON reporter
//!
//! Pretty-printed JSON for piping to jq or storing alongside the snippet.

use super::{FileReport, FixReport};
use anyhow::Result;

/// Render file reports as a JSON array
pub fn render(reports: &[FileReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

pub fn render_fixes(fixes: &FixReport<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(fixes)?)
}
