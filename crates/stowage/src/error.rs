//! Error types for stowage operations.

use std::io;
use thiserror::Error;

/// The error type for stowage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A `depends_on` entry names a service that is not declared.
    #[error("service '{service}' depends on non-existent service '{dependency}'")]
    UnknownDependency {
        /// The service declaring the dependency.
        service: String,
        /// The missing dependency name.
        dependency: String,
    },

    /// A filter or focused query referenced an undeclared service.
    #[error("service '{0}' not found")]
    ServiceNotFound(String),

    /// A dependency ordering was requested for a graph that contains a cycle.
    #[error("circular dependencies detected: ordered {ordered} of {total} services")]
    CyclicOrder {
        /// How many services were ordered before the sort stalled.
        ordered: usize,
        /// Total number of services in the graph.
        total: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The compose document could not be loaded.
    #[error("Compose error: {0}")]
    Compose(#[from] stowage_compose::Error),
}

/// A specialized Result type for stowage operations.
pub type Result<T> = std::result::Result<T, Error>;
