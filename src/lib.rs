//! querybook - a browsable catalog of example JQL and SQL queries.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod catalog;
pub mod config;
pub mod error;
pub mod lint;
pub mod logging;
pub mod output;

pub use catalog::{Catalog, Dialect, QueryEntry, QueryFilter, Tier};
pub use error::{QuerybookError, Result};
