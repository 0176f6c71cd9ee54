//! Application context for CLI command execution.
//!
//! The `App` struct resolves which compose files make up the project, loads
//! and merges them, and hands out graphs built from the result.
//!
//! # Example
//!
//! ```no_run
//! use stowage::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new("."), &[]).await?;
//!     let graph = app.graph()?;
//!     println!("{} services", graph.len());
//!     Ok(())
//! }
//! ```

use crate::config::{self, ProjectConfig};
use crate::error::Result;
use crate::graph::ServiceGraph;
use std::path::{Path, PathBuf};
use stowage_compose::ComposeFile;

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    /// Directory compose paths are resolved against
    base_dir: PathBuf,

    /// Project configuration (defaults when no config file exists)
    config: ProjectConfig,

    /// The compose files that were loaded, in layering order
    compose_files: Vec<PathBuf>,

    /// The merged compose document
    compose: ComposeFile,
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Explicit `files` win over the project configuration and are resolved
    /// against `working_dir`. Otherwise `.stowage.yaml` is searched for
    /// upwards from `working_dir` and its compose list is used, falling back
    /// to `docker-compose.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or any compose
    /// file cannot be read or parsed.
    pub async fn from_directory(working_dir: &Path, files: &[PathBuf]) -> Result<Self> {
        let (base_dir, config) = config::discover(working_dir).await?;

        let compose_files = if files.is_empty() {
            config.compose_paths(&base_dir)
        } else {
            files.iter().map(|file| working_dir.join(file)).collect()
        };

        let compose = stowage_compose::loader::load_all(&compose_files).await?;
        tracing::debug!(
            files = compose_files.len(),
            services = compose.services.len(),
            "Loaded compose project"
        );

        Ok(Self {
            base_dir,
            config,
            compose_files,
            compose,
        })
    }

    /// Build the dependency graph for every service in the project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownDependency`] if a service depends on
    /// one that is not declared.
    pub fn graph(&self) -> Result<ServiceGraph> {
        ServiceGraph::from_compose(&self.compose)
    }

    /// The merged compose document.
    pub fn compose(&self) -> &ComposeFile {
        &self.compose
    }

    /// The compose files that were loaded.
    pub fn compose_files(&self) -> &[PathBuf] {
        &self.compose_files
    }

    /// The project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Project name from the configuration, else the base directory name.
    pub fn project_name(&self) -> String {
        self.config.project_name.clone().unwrap_or_else(|| {
            self.base_dir
                .file_name()
                .map_or_else(|| "project".to_string(), |name| name.to_string_lossy().into_owned())
        })
    }
}
