//! Command-line argument parsing for querybook.

use clap::{ArgAction, Parser, Subcommand};
use querybook::catalog::{Dialect, Tier};
use querybook::config::{Config, SourceConfig};
use querybook::output::OutputFormat;
use std::path::PathBuf;

/// Browse a catalog of example JQL and SQL queries.
#[derive(Parser, Debug)]
#[command(name = "querybook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "QUERYBOOK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Additional catalog file; dialect is inferred from the .jql/.sql extension (repeatable)
    #[arg(short = 's', long = "source", value_name = "PATH", global = true)]
    pub sources: Vec<PathBuf>,

    /// Do not load the built-in examples
    #[arg(long, global = true)]
    pub no_builtin: bool,

    /// Output format: text or json (overrides config)
    #[arg(short = 'f', long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Catalog commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List queries, optionally filtered by dialect and tier
    List {
        /// Only queries in this dialect (jql or sql)
        #[arg(short = 'd', long, value_name = "DIALECT")]
        dialect: Option<Dialect>,

        /// Only queries in this tier (beginner, intermediate, advanced)
        #[arg(short = 't', long, value_name = "TIER")]
        tier: Option<Tier>,

        /// Show at most this many queries
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Case-insensitive search over titles and query text
    Search {
        /// Text to look for
        #[arg(value_name = "TEXT")]
        text: String,

        /// Only queries in this dialect (jql or sql)
        #[arg(short = 'd', long, value_name = "DIALECT")]
        dialect: Option<Dialect>,
    },

    /// Print one query by id (e.g. sql-7)
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Count queries per dialect and tier
    Stats,

    /// Check queries for syntax problems and non-read-only SQL
    Lint {
        /// Only queries in this dialect (jql or sql)
        #[arg(short = 'd', long, value_name = "DIALECT")]
        dialect: Option<Dialect>,
    },

    /// Dump the whole catalog as JSON
    Export,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses --config (or QUERYBOOK_CONFIG) if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.no_builtin {
            config.catalog.include_builtin = false;
        }
        config
            .catalog
            .sources
            .extend(self.sources.iter().map(SourceConfig::new));
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}
