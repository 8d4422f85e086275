//! Report module
//!
//! This module holds:
//! - The serializable audit report and its parts
//! - JSON and markdown rendering of a finished report

mod markdown;
mod types;

pub use markdown::{format_markdown_report, write_markdown_report};
use std::path::Path;

pub use types::{
    AccessVerdict, AiDirectives, AuditReport, Effort, ExtraSuggestion, Extras,
    MetaDescriptionStats, RawFacts, ScoreBreakdown, SecurityHeaders, Suggestion,
};

/// Renders a report as pretty-printed JSON
pub fn to_json(report: &AuditReport) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes a report as pretty-printed JSON to `output_path`
pub fn write_json_report(report: &AuditReport, output_path: &Path) -> crate::Result<()> {
    let json = to_json(report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
