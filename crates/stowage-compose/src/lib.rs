//! Typed model and loader for multi-service compose documents.
//!
//! This library turns a `docker-compose.yml` style document into a
//! [`ComposeFile`] whose service map is what the stowage graph engine
//! consumes. Only the fields the engine and its presentation layers read are
//! modelled; everything else in the document is ignored.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod model;
mod raw;

pub use error::{Error, Result};
pub use model::{BuildConfig, ComposeFile, HealthCheck, Network, Service, Volume};
