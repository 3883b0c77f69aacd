//! querybook - browse a catalog of example JQL and SQL queries.

mod cli;

use cli::{Cli, Command};
use querybook::catalog::{load_sources, QueryEntry, QueryFilter};
use querybook::config::Config;
use querybook::error::{QuerybookError, Result};
use querybook::lint::lint_catalog;
use querybook::logging;
use querybook::output::{
    render_entries, render_entry, render_lint, render_stats, OutputFormat,
};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

/// Runs the selected command. Returns false when the command completed but
/// should report failure (lint errors).
fn run(cli: &Cli) -> Result<bool> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);

    let format = config.output.format;
    let catalog = load_sources(&config.catalog)?;
    info!("Catalog ready with {} queries", catalog.len());

    match &cli.command {
        Command::List {
            dialect,
            tier,
            limit,
        } => {
            let filter = QueryFilter {
                dialect: *dialect,
                tier: *tier,
                text: None,
                limit: *limit,
            };
            println!("{}", render_entries(&catalog.filter(&filter), format)?);
        }
        Command::Search { text, dialect } => {
            let filter = QueryFilter {
                dialect: *dialect,
                text: Some(text.clone()),
                ..Default::default()
            };
            println!("{}", render_entries(&catalog.filter(&filter), format)?);
        }
        Command::Show { id } => {
            let entry = catalog
                .get(id)
                .ok_or_else(|| QuerybookError::not_found(format!("no query with id '{id}'")))?;
            println!("{}", render_entry(entry, format)?);
        }
        Command::Stats => {
            println!("{}", render_stats(&catalog.stats(), format)?);
        }
        Command::Lint { dialect } => {
            let reports = lint_catalog(&catalog, *dialect);
            println!("{}", render_lint(&reports, format)?);
            return Ok(!reports.iter().any(|r| r.report.has_errors()));
        }
        Command::Export => {
            let entries: Vec<&QueryEntry> = catalog.iter().collect();
            println!("{}", render_entries(&entries, OutputFormat::Json)?);
        }
    }

    Ok(true)
}
