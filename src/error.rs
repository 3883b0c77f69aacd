//! Error types for querybook.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for querybook operations.
#[derive(Error, Debug)]
pub enum QuerybookError {
    /// Catalog text could not be turned into entries (nothing recognized,
    /// duplicate ids, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A requested entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors (invalid config file, unknown dialect, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a catalog or config file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal errors (unexpected states, serialization failures, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuerybookError {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a not-found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse(_) => "Parse Error",
            Self::NotFound(_) => "Not Found",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Result type alias using QuerybookError.
pub type Result<T> = std::result::Result<T, QuerybookError>;
