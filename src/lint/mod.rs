//! Static checks over catalog entries.
//!
//! SQL entries are parsed and classified as read-only, mutating, or
//! destructive. JQL entries are tokenized and checked for structural
//! mistakes. Example queries are meant to be copy-pasted, so anything that
//! would not run or would change data is reported.

mod jql;
mod sql;

pub use jql::{lint_jql, tokenize_jql, JqlToken};
pub use sql::{classify_sql, SqlClassifier};

use std::fmt;

use serde::Serialize;

use crate::catalog::{Catalog, Dialect, QueryEntry};

/// How serious a lint finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single lint message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Safety level classification for SQL queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    /// SELECT, EXPLAIN, SHOW.
    ReadOnly,
    /// INSERT, UPDATE, MERGE.
    Mutating,
    /// DELETE, DROP, TRUNCATE, ALTER, CREATE, GRANT, REVOKE.
    Destructive,
}

impl SafetyLevel {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::Mutating => write!(f, "mutating"),
            Self::Destructive => write!(f, "destructive"),
        }
    }
}

/// The type of SQL statement detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Drop,
    Truncate,
    Alter,
    Create,
    Grant,
    Revoke,
    Explain,
    Show,
    Unknown,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Merge => "MERGE",
            Self::Drop => "DROP",
            Self::Truncate => "TRUNCATE",
            Self::Alter => "ALTER",
            Self::Create => "CREATE",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Explain => "EXPLAIN",
            Self::Show => "SHOW",
            Self::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// SQL classification attached to a lint report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub level: SafetyLevel,
    pub statement_type: StatementType,
    /// Number of statements in the entry.
    pub statements: usize,
}

/// Lint result for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LintReport {
    pub findings: Vec<Finding>,
    /// Present for SQL entries that parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

impl LintReport {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Returns true if any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Highest severity among findings, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    /// Findings at or above `severity`.
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity >= severity)
    }
}

/// Lint report for a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub dialect: Dialect,
    #[serde(flatten)]
    pub report: LintReport,
}

/// Lints a single entry according to its dialect.
pub fn lint_entry(entry: &QueryEntry) -> LintReport {
    match entry.dialect {
        Dialect::Sql => sql::lint_sql(&entry.text),
        Dialect::Jql => lint_jql(&entry.text),
    }
}

/// Lints every entry (optionally restricted to one dialect), in catalog order.
pub fn lint_catalog(catalog: &Catalog, dialect: Option<Dialect>) -> Vec<EntryReport<'_>> {
    catalog
        .iter()
        .filter(|e| dialect.map_or(true, |d| e.dialect == d))
        .map(|e| EntryReport {
            id: &e.id,
            title: &e.title,
            dialect: e.dialect,
            report: lint_entry(e),
        })
        .collect()
}
