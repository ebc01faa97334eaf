//! Error types for the getfit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for getfit_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field was missing or failed validation
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// An entry with this id already exists
    #[error("Entry already exists: {0}")]
    DuplicateId(String),

    /// No entry with this id exists
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A persisted document could not be parsed or holds invalid entries
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a validation error for the named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
