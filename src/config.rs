//! Configuration management for querybook.
//!
//! Handles loading configuration from TOML files: extra catalog sources to
//! load alongside the built-in examples, and output preferences.

use crate::catalog::Dialect;
use crate::error::{QuerybookError, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for querybook.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog sources.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Output preferences.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which sources make up the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Whether the embedded JQL and SQL examples are loaded.
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    /// Additional catalog files, loaded in order after the built-ins.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            sources: Vec::new(),
        }
    }
}

/// A catalog file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the file. Relative paths resolve against the config file's directory.
    pub path: PathBuf,

    /// Dialect of the file; inferred from the extension when omitted.
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

impl SourceConfig {
    /// Creates a source with an inferred dialect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dialect: None,
        }
    }
}

/// Output preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format: "text" or "json".
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("querybook")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| QuerybookError::config(format!("Failed to read config file: {e}")))?;

        let mut config = Self::parse_toml(&content, path)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_sources(base);
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            QuerybookError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Rewrites relative source paths so they are anchored at `base`.
    fn resolve_relative_sources(&mut self, base: &Path) {
        for source in &mut self.catalog.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }
}
