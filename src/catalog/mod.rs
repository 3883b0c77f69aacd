//! Query catalog store.
//!
//! Holds example queries grouped by dialect and difficulty tier, and answers
//! listing, lookup and free-text search requests over them. A catalog is
//! built once from plain text and never mutated afterwards.

mod builtin;
mod loader;
mod parser;

pub use builtin::{builtin_sources, BuiltinSource};
pub use loader::{load_path, load_sources};
pub use parser::parse_entries;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuerybookError, Result};

/// Query language an entry is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Jira Query Language.
    Jql,
    /// SQL (PostgreSQL flavoured).
    Sql,
}

impl Dialect {
    /// All dialects in display order.
    pub const ALL: [Dialect; 2] = [Dialect::Jql, Dialect::Sql];

    /// Lowercase prefix used when building entry ids.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Jql => "jql",
            Self::Sql => "sql",
        }
    }

    /// Infers the dialect from a file extension (`.jql` or `.sql`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jql => write!(f, "JQL"),
            Self::Sql => write!(f, "SQL"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jql" => Ok(Self::Jql),
            "sql" => Ok(Self::Sql),
            _ => Err(format!("Invalid dialect: {s}. Expected: jql or sql")),
        }
    }
}

/// Difficulty grouping of an example query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    /// All tiers in canonical order.
    pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Intermediate, Tier::Advanced];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!(
                "Invalid tier: {s}. Expected: beginner, intermediate, or advanced"
            )),
        }
    }
}

/// A single example query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryEntry {
    /// Unique id, `<dialect>-<number>` (e.g. `sql-15`).
    pub id: String,
    /// Number from the entry's numbered comment.
    pub number: u32,
    /// Comment text following the number.
    pub title: String,
    pub tier: Tier,
    pub dialect: Dialect,
    /// Query body exactly as it appears in the source.
    pub text: String,
    /// 1-based line of the numbered comment in its source.
    pub line: usize,
}

impl QueryEntry {
    /// Case-insensitive substring match over title and body.
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.text.to_lowercase().contains(needle)
    }
}

/// Builds the id for an entry.
pub fn entry_id(dialect: Dialect, number: u32) -> String {
    format!("{}-{}", dialect.prefix(), number)
}

/// Filter options for listing catalog entries.
///
/// All set criteria must hold (AND semantics).
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    pub dialect: Option<Dialect>,
    pub tier: Option<Tier>,
    /// Case-insensitive substring over title and body.
    pub text: Option<String>,
    pub limit: Option<usize>,
}

/// Number of entries in one dialect/tier group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub dialect: Dialect,
    pub tier: Tier,
    pub count: usize,
}

/// Entry counts per dialect and tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    /// Non-empty groups only, dialect-major in canonical order.
    pub groups: Vec<GroupCount>,
}

impl CatalogStats {
    /// Count for a dialect/tier pair (zero when the group is absent).
    pub fn count(&self, dialect: Dialect, tier: Tier) -> usize {
        self.groups
            .iter()
            .find(|g| g.dialect == dialect && g.tier == tier)
            .map_or(0, |g| g.count)
    }
}

/// Ordered, read-only collection of query entries with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<QueryEntry>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Parses catalog text written in `dialect`.
    ///
    /// Fails with a parse error when nothing recognizable is found. Unknown
    /// extra text is ignored.
    pub fn load(source: &str, dialect: Dialect) -> Result<Self> {
        let entries = parse_entries(source, dialect)?;
        Self::from_entries(entries)
    }

    /// Loads every built-in example source, JQL first.
    pub fn builtin() -> Result<Self> {
        builtin_sources()
            .iter()
            .try_fold(Self::default(), |catalog, source| {
                catalog.merge(Self::load(source.text, source.dialect)?)
            })
    }

    fn from_entries(entries: Vec<QueryEntry>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(QuerybookError::parse(format!(
                    "duplicate query id '{}'",
                    entry.id
                )));
            }
        }
        Ok(Self { entries, by_id })
    }

    /// Appends the entries of `other` after this catalog's entries.
    ///
    /// Fails with a parse error if both catalogs contain the same id.
    pub fn merge(mut self, other: Catalog) -> Result<Self> {
        for entry in other.entries {
            if self.by_id.contains_key(&entry.id) {
                return Err(QuerybookError::parse(format!(
                    "duplicate query id '{}' is already loaded",
                    entry.id
                )));
            }
            self.by_id.insert(entry.id.clone(), self.entries.len());
            self.entries.push(entry);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[QueryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryEntry> {
        self.entries.iter()
    }

    /// Looks up an entry by id, ignoring case and surrounding whitespace.
    pub fn get(&self, id: &str) -> Option<&QueryEntry> {
        let key = id.trim().to_lowercase();
        self.by_id.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Entries of one tier in source order; empty if the tier is absent.
    pub fn list_by_tier(&self, tier: Tier) -> Vec<&QueryEntry> {
        self.iter().filter(|e| e.tier == tier).collect()
    }

    /// Entries of one dialect in source order.
    pub fn list_by_dialect(&self, dialect: Dialect) -> Vec<&QueryEntry> {
        self.iter().filter(|e| e.dialect == dialect).collect()
    }

    /// Case-insensitive search over titles and bodies.
    pub fn search(&self, needle: &str) -> Vec<&QueryEntry> {
        let needle = needle.to_lowercase();
        self.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Entries matching every criterion set on `filter`, in source order.
    pub fn filter(&self, filter: &QueryFilter) -> Vec<&QueryEntry> {
        let needle = filter.text.as_deref().map(str::to_lowercase);
        let matching = self.iter().filter(|e| {
            filter.dialect.map_or(true, |d| e.dialect == d)
                && filter.tier.map_or(true, |t| e.tier == t)
                && needle.as_deref().map_or(true, |n| e.matches(n))
        });

        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Tiers that have at least one entry, in canonical order.
    pub fn tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|t| self.entries.iter().any(|e| e.tier == *t))
            .collect()
    }

    /// Counts entries per dialect and tier.
    pub fn stats(&self) -> CatalogStats {
        let mut groups = Vec::new();
        for dialect in Dialect::ALL {
            for tier in Tier::ALL {
                let count = self
                    .iter()
                    .filter(|e| e.dialect == dialect && e.tier == tier)
                    .count();
                if count > 0 {
                    groups.push(GroupCount {
                        dialect,
                        tier,
                        count,
                    });
                }
            }
        }

        CatalogStats {
            total: self.len(),
            groups,
        }
    }
}
