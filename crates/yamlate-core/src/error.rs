//! Error types for the yamlate core library
//!
//! This module defines the error handling system for yamlate, using
//! thiserror for ergonomic error definitions and anyhow for flexible
//! error sources.

use thiserror::Error;

/// Main error type for yamlate operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input document could not be loaded or is not usable
    #[error("Failed to load document: {message}")]
    DocumentLoad {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// YAML parsing and serialization errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Validation errors for inputs and configuration values
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// IO errors (reading input, writing checkpoints)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
