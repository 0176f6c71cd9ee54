//! Project configuration (`.stowage.yaml`).
//!
//! The file is optional. When present it names the compose files that make up
//! the project, optionally per environment:
//!
//! ```yaml
//! project_name: shop
//! compose_files: [docker-compose.yml]
//! environment: dev
//! environments:
//!   dev:
//!     compose_files: [docker-compose.yml, docker-compose.dev.yml]
//!     env_files: [.env.dev]
//!     variables:
//!       LOG_LEVEL: debug
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = ".stowage.yaml";

/// Compose file used when nothing else is configured
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Maximum directory depth to traverse when searching for the config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Project-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Human-readable project name
    pub project_name: Option<String>,

    /// Compose files, layered in order
    pub compose_files: Vec<String>,

    /// Name of the active entry in `environments`
    pub environment: Option<String>,

    /// Per-environment overrides
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// Settings for one named environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Compose files replacing the top-level list when non-empty
    pub compose_files: Vec<String>,

    /// Env files to pass to the container runtime
    pub env_files: Vec<String>,

    /// Extra variables for the environment
    pub variables: BTreeMap<String, String>,
}

impl ProjectConfig {
    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not a valid configuration,
    /// or names an `environment` that `environments` does not define.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::Config`]
    /// if it does not parse.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded project configuration");
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails or [`Error::Io`] if
    /// the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(environment) = &self.environment {
            if !self.environments.is_empty() && !self.environments.contains_key(environment) {
                return Err(Error::Config(format!(
                    "environment '{environment}' is not defined under 'environments'"
                )));
            }
        }
        Ok(())
    }

    /// The active environment's settings, if one is selected and defined.
    pub fn active_environment(&self) -> Option<&EnvironmentConfig> {
        self.environment
            .as_ref()
            .and_then(|name| self.environments.get(name))
    }

    /// Compose files for the active environment.
    ///
    /// The active environment's list wins when non-empty, then the top-level
    /// list, then [`DEFAULT_COMPOSE_FILE`].
    pub fn compose_files(&self) -> Vec<String> {
        if let Some(environment) = self.active_environment() {
            if !environment.compose_files.is_empty() {
                return environment.compose_files.clone();
            }
        }
        if !self.compose_files.is_empty() {
            return self.compose_files.clone();
        }
        vec![DEFAULT_COMPOSE_FILE.to_string()]
    }

    /// [`ProjectConfig::compose_files`] resolved against `base_dir`.
    ///
    /// Absolute entries are kept as they are.
    pub fn compose_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.compose_files()
            .into_iter()
            .map(|file| base_dir.join(file))
            .collect()
    }
}

/// Find the project config file by searching up the directory tree.
///
/// Starts from `start_dir` and walks parent directories until
/// [`CONFIG_FILE_NAME`] is found, the root is reached, or
/// [`MAX_TRAVERSAL_DEPTH`] is exceeded.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

/// Locate and load the project configuration above `start_dir`.
///
/// Returns the directory holding the config file together with the parsed
/// configuration. Without a config file, `start_dir` and the default
/// configuration are returned.
///
/// # Errors
///
/// Propagates errors from [`ProjectConfig::load`].
pub async fn discover(start_dir: &Path) -> Result<(PathBuf, ProjectConfig)> {
    match find_config_file(start_dir) {
        Some(path) => {
            let config = ProjectConfig::load(&path).await?;
            let base = path
                .parent()
                .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
            Ok((base, config))
        }
        None => {
            tracing::debug!(start = %start_dir.display(), "No project configuration found, using defaults");
            Ok((start_dir.to_path_buf(), ProjectConfig::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r"
project_name: shop
compose_files: [docker-compose.yml]
environment: dev
environments:
  dev:
    compose_files: [docker-compose.yml, docker-compose.dev.yml]
    env_files: [.env.dev]
    variables:
      LOG_LEVEL: debug
  prod:
    env_files: [.env.prod]
";

    #[test]
    fn test_parse_full_config() {
        let config = ProjectConfig::from_yaml_str(SAMPLE).expect("should parse");
        assert_eq!(config.project_name.as_deref(), Some("shop"));
        assert_eq!(config.environments.len(), 2);
        let dev = config.active_environment().expect("dev is active");
        assert_eq!(dev.variables["LOG_LEVEL"], "debug");
        assert_eq!(
            config.compose_files(),
            vec!["docker-compose.yml", "docker-compose.dev.yml"]
        );
    }

    #[test]
    fn test_environment_without_files_falls_back_to_top_level() {
        let mut config = ProjectConfig::from_yaml_str(SAMPLE).expect("should parse");
        config.environment = Some("prod".into());
        assert_eq!(config.compose_files(), vec!["docker-compose.yml"]);
    }

    #[test]
    fn test_empty_config_uses_default_compose_file() {
        let config = ProjectConfig::from_yaml_str("").expect("empty is fine");
        assert_eq!(config.compose_files(), vec![DEFAULT_COMPOSE_FILE]);
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let result = ProjectConfig::from_yaml_str(
            "environment: staging\nenvironments:\n  dev:\n    env_files: []\n",
        );
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("staging")));
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let result = ProjectConfig::from_yaml_str("compose_files: {not: [a list");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_compose_paths_resolve_against_base() {
        let config = ProjectConfig {
            compose_files: vec!["a.yml".into(), "/abs/b.yml".into()],
            ..ProjectConfig::default()
        };
        let paths = config.compose_paths(Path::new("/project"));
        assert_eq!(paths, vec![PathBuf::from("/project/a.yml"), PathBuf::from("/abs/b.yml")]);
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = TempDir::new().expect("temp dir");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("create nested");
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "project_name: x\n")
            .expect("write config");

        let found = find_config_file(&nested).expect("config should be found");
        assert_eq!(found, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_find_config_file_ignores_directories() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::create_dir(temp.path().join(CONFIG_FILE_NAME)).expect("create dir");
        let found = find_config_file(temp.path());
        assert_ne!(found, Some(temp.path().join(CONFIG_FILE_NAME)));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        let config = ProjectConfig::from_yaml_str(SAMPLE).expect("should parse");

        config.save(&path).await.expect("save");
        let loaded = ProjectConfig::load(&path).await.expect("load");
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_discover_without_config() {
        let temp = TempDir::new().expect("temp dir");
        let (base, config) = discover(temp.path()).await.expect("discover");
        // A config file in some ancestor of the temp dir would change `base`.
        if find_config_file(temp.path()).is_none() {
            assert_eq!(base, temp.path());
            assert_eq!(config, ProjectConfig::default());
        }
    }

    #[tokio::test]
    async fn test_discover_reports_config_directory() {
        let temp = TempDir::new().expect("temp dir");
        let nested = temp.path().join("svc");
        std::fs::create_dir(&nested).expect("create nested");
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "compose_files: [stack.yml]\n")
            .expect("write config");

        let (base, config) = discover(&nested).await.expect("discover");
        assert_eq!(base, temp.path());
        assert_eq!(config.compose_paths(&base), vec![temp.path().join("stack.yml")]);
    }
}
