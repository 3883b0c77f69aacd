//! Catalog text parsing.
//!
//! Splits plain text into entries on two kinds of marker lines:
//! - tier headings such as `=== BEGINNER ===`, `-- ADVANCED QUERIES` or
//!   `## Intermediate`
//! - numbered comments such as `-- 7. Defect rate per part number` or
//!   `// 3) Bugs created this week`
//!
//! Everything between a numbered comment and the next marker is the entry
//! body. Other text is ignored.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::{entry_id, Dialect, QueryEntry, Tier};
use crate::error::{QuerybookError, Result};

static TIER_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"(?i)^\s*(?:(?:--|//)\s*)?(?:#{1,6}|={2,}|-{2,}|/{2,})?\s*(beginner|intermediate|advanced)(?:\s+(?:queries|query|level|examples|tier))?\s*:?\s*(?:={2,}|-{2,}|#+)?\s*$",
    ) {
        Ok(regex) => regex,
        Err(err) => panic!("Tier heading regex is invalid: {err}"),
    }
});

static NUMBERED_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^\s*(?:--|//|#{1,6})\s*(\d+)[.)]\s+(\S.*?)\s*$") {
        Ok(regex) => regex,
        Err(err) => panic!("Numbered comment regex is invalid: {err}"),
    }
});

/// Separator lines like `-- =========` or `#####`.
static RULE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^\s*(?:--|//|#)?\s*[=\-#/*_~]{3,}\s*$") {
        Ok(regex) => regex,
        Err(err) => panic!("Rule line regex is invalid: {err}"),
    }
});

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Heading(Tier),
    Title { number: u32, title: &'a str },
    /// A numbered comment whose number does not fit in a `u32`.
    BadNumber(&'a str),
    Text,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(caps) = NUMBERED_COMMENT.captures(line) {
        if let (Some(number), Some(title)) = (caps.get(1), caps.get(2)) {
            return match number.as_str().parse::<u32>() {
                Ok(number) => Line::Title {
                    number,
                    title: title.as_str(),
                },
                Err(_) => Line::BadNumber(number.as_str()),
            };
        }
    }

    if let Some(tier) = TIER_HEADING
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<Tier>().ok())
    {
        return Line::Heading(tier);
    }

    Line::Text
}

fn is_padding(line: &str) -> bool {
    line.trim().is_empty() || RULE_LINE.is_match(line)
}

/// An entry whose body is still being collected.
struct Pending<'a> {
    number: u32,
    title: &'a str,
    tier: Tier,
    line: usize,
    body: Vec<&'a str>,
}

impl Pending<'_> {
    fn finish(self, dialect: Dialect) -> Option<QueryEntry> {
        let start = self.body.iter().position(|l| !is_padding(l))?;
        let end = self.body.iter().rposition(|l| !is_padding(l))?;

        Some(QueryEntry {
            id: entry_id(dialect, self.number),
            number: self.number,
            title: self.title.trim_end_matches(':').trim_end().to_string(),
            tier: self.tier,
            dialect,
            text: self.body[start..=end].join("\n"),
            line: self.line,
        })
    }
}

/// Parses catalog text into entries, in source order.
///
/// Fails with a parse error when no entry is recognized or when a number is
/// used twice.
pub fn parse_entries(source: &str, dialect: Dialect) -> Result<Vec<QueryEntry>> {
    let mut entries: Vec<QueryEntry> = Vec::new();
    let mut seen: HashMap<u32, usize> = HashMap::new();
    let mut tier: Option<Tier> = None;
    let mut pending: Option<Pending<'_>> = None;

    let mut flush = |pending: Option<Pending<'_>>| -> Result<()> {
        let Some(pending) = pending else {
            return Ok(());
        };
        let (number, line) = (pending.number, pending.line);
        let Some(entry) = pending.finish(dialect) else {
            warn!("{dialect} query {number} at line {line} has no body; skipping");
            return Ok(());
        };
        if let Some(first) = seen.insert(number, line) {
            return Err(QuerybookError::parse(format!(
                "duplicate query id '{}' at lines {first} and {line}",
                entry.id
            )));
        }
        entries.push(entry);
        Ok(())
    };

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        match classify(line) {
            Line::Heading(next) => {
                flush(pending.take())?;
                debug!("{dialect} tier heading '{next}' at line {line_no}");
                tier = Some(next);
            }
            Line::Title { number, title } => {
                flush(pending.take())?;
                match tier {
                    Some(tier) => {
                        pending = Some(Pending {
                            number,
                            title,
                            tier,
                            line: line_no,
                            body: Vec::new(),
                        });
                    }
                    None => {
                        debug!("{dialect} query {number} at line {line_no} precedes any tier heading; ignoring");
                    }
                }
            }
            Line::BadNumber(number) if tier.is_some() => {
                return Err(QuerybookError::parse(format!(
                    "query number {number} at line {line_no} is out of range"
                )));
            }
            Line::BadNumber(_) | Line::Text => {
                if let Some(pending) = pending.as_mut() {
                    pending.body.push(line);
                }
            }
        }
    }
    flush(pending.take())?;

    if entries.is_empty() {
        return Err(QuerybookError::parse(format!(
            "no {dialect} catalog entries recognized"
        )));
    }

    debug!("parsed {} {dialect} entries", entries.len());
    Ok(entries)
}
