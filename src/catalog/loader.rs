//! Loading catalog sources from disk.

use std::path::Path;

use tracing::info;

use super::{Catalog, Dialect};
use crate::config::CatalogConfig;
use crate::error::{QuerybookError, Result};

/// Reads and parses a catalog file.
///
/// When `dialect` is `None` it is inferred from the file extension.
pub fn load_path(path: &Path, dialect: Option<Dialect>) -> Result<Catalog> {
    let dialect = match dialect.or_else(|| Dialect::from_path(path)) {
        Some(dialect) => dialect,
        None => {
            return Err(QuerybookError::config(format!(
                "Cannot infer dialect of {}; use a .jql or .sql extension or set `dialect`",
                path.display()
            )))
        }
    };

    let text = std::fs::read_to_string(path)
        .map_err(|e| QuerybookError::io(format!("{}: {e}", path.display())))?;

    let catalog = Catalog::load(&text, dialect).map_err(|e| with_path(e, path))?;

    info!(
        "Loaded {} {dialect} entries from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Prefixes a parse error with the file it came from.
fn with_path(err: QuerybookError, path: &Path) -> QuerybookError {
    match err {
        QuerybookError::Parse(msg) => QuerybookError::parse(format!("{}: {msg}", path.display())),
        other => other,
    }
}

/// Builds the catalog described by `config`: built-ins first (unless
/// disabled), then each configured source in order.
///
/// An empty result is a parse error, since there is nothing to browse.
pub fn load_sources(config: &CatalogConfig) -> Result<Catalog> {
    let mut catalog = if config.include_builtin {
        Catalog::builtin()?
    } else {
        Catalog::default()
    };

    for source in &config.sources {
        catalog = catalog
            .merge(load_path(&source.path, source.dialect)?)
            .map_err(|e| with_path(e, &source.path))?;
    }

    if catalog.is_empty() {
        return Err(QuerybookError::parse(
            "no catalog sources configured (built-in examples disabled and no files given)",
        ));
    }

    Ok(catalog)
}
