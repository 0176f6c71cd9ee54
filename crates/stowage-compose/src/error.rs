//! Error types for stowage-compose operations.

use std::io;
use thiserror::Error;

/// The error type for stowage-compose operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading a document.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A service entry is structurally valid YAML but not a usable service.
    #[error("Invalid service '{service}': {reason}")]
    InvalidService {
        /// Name of the offending service.
        service: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A specialized Result type for stowage-compose operations.
pub type Result<T> = std::result::Result<T, Error>;
