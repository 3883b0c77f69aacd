//! Rendering of catalog data for the terminal.
//!
//! Every renderer produces either aligned plain text or pretty-printed JSON.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStats, QueryEntry};
use crate::error::{QuerybookError, Result};
use crate::lint::{EntryReport, Severity};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable aligned text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| QuerybookError::internal(format!("Failed to serialize output: {e}")))
}

/// Renders a list of entries, one line per entry in text mode.
pub fn render_entries(entries: &[&QueryEntry], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(entries);
    }

    if entries.is_empty() {
        return Ok("No queries found.".to_string());
    }

    let id_width = entries
        .iter()
        .map(|e| e.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = format!("{:<id_width$}  {:<12}  TITLE\n", "ID", "TIER");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<12}  {}",
            entry.id,
            entry.tier.to_string(),
            entry.title
        );
    }
    let _ = write!(
        out,
        "\n{} {}",
        entries.len(),
        if entries.len() == 1 { "query" } else { "queries" }
    );
    Ok(out)
}

/// Renders one entry with its full text.
pub fn render_entry(entry: &QueryEntry, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(entry),
        OutputFormat::Text => Ok(format!(
            "{}  {}\nDialect: {}  Tier: {}  Line: {}\n\n{}",
            entry.id, entry.title, entry.dialect, entry.tier, entry.line, entry.text
        )),
    }
}

/// Renders entry counts per dialect and tier.
pub fn render_stats(stats: &CatalogStats, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(stats);
    }

    let mut out = String::new();
    for group in &stats.groups {
        let _ = writeln!(
            out,
            "{:<4} {:<12} {:>4}",
            group.dialect.to_string(),
            group.tier.to_string(),
            group.count
        );
    }
    let _ = write!(out, "Total: {}", stats.total);
    Ok(out)
}

/// Renders lint results.
///
/// Text mode lists warnings and errors only, followed by a summary line.
pub fn render_lint(reports: &[EntryReport<'_>], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(reports);
    }

    let mut out = String::new();
    let mut errors = 0;
    let mut warnings = 0;

    for entry in reports {
        for finding in entry.report.at_least(Severity::Warning) {
            match finding.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => {}
            }
            let _ = writeln!(
                out,
                "{}: {}: {} ({})",
                entry.id, finding.severity, finding.message, entry.title
            );
        }
    }

    let _ = write!(
        out,
        "{} queries checked, {errors} errors, {warnings} warnings",
        reports.len()
    );
    Ok(out)
}
