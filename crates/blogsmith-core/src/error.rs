//! Error types for the blogsmith core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for blogsmith.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The metadata header is absent or cannot be parsed.
    #[error("Malformed document {path}: {message}")]
    MalformedDocument { path: PathBuf, message: String },

    /// A required front matter field is missing or empty.
    #[error("Missing field `{field}` in {path}")]
    MissingField { path: PathBuf, field: &'static str },

    /// The `date` field is not a calendar date.
    #[error("Invalid date {value:?} in {path}")]
    InvalidDate { path: PathBuf, value: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new malformed document error.
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new missing field error.
    pub fn missing_field(path: impl Into<PathBuf>, field: &'static str) -> Self {
        Self::MissingField {
            path: path.into(),
            field,
        }
    }

    /// Create a new invalid date error.
    pub fn invalid_date(path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            path: path.into(),
            value: value.into(),
        }
    }
}
