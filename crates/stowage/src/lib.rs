//! Stowage - dependency graph analysis for multi-service compose projects.
//!
//! This crate provides both a CLI application and a library that turns a
//! compose service map into a [`ServiceGraph`]: bidirectional dependency
//! edges, shared network and volume peers, detected cycles and a dependency
//! order. The graph can be filtered around one service and rendered as an
//! indented tree, Graphviz DOT, or JSON.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use stowage::app::App;
//! use stowage::output::{OutputConfig, TreeOptions, render_tree};
//!
//! let app = App::from_directory(std::path::Path::new("."), &[]).await?;
//! let graph = app.graph()?.filter_by_service("api", Some(1))?;
//! println!("{}", render_tree(&graph, &TreeOptions::default(), &OutputConfig::plain()));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod app;
pub mod config;
pub mod error;
pub mod graph;
pub mod output;

// Public CLI module (needed by binary)
pub mod cli;

pub use error::{Error, Result};
pub use graph::{
    Cycle, Highlight, Relationship, RelationshipKind, ServiceGraph, ServiceNode,
    volume_identifier,
};
