//! Typed compose document model.
//!
//! These types are the normalised form of a compose document. Every shape the
//! YAML allows for a field (list or map `depends_on`, short or long volume
//! syntax, and so on) collapses into one representation here.

use serde::Serialize;
use std::collections::BTreeMap;

/// A parsed compose document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComposeFile {
    /// Document format version, if declared.
    pub version: Option<String>,

    /// Services keyed by name.
    pub services: BTreeMap<String, Service>,

    /// Top-level network declarations.
    pub networks: BTreeMap<String, Network>,

    /// Top-level named volume declarations.
    pub volumes: BTreeMap<String, Volume>,
}

/// A single service definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Service name (the key it was declared under).
    pub name: String,

    /// Image reference.
    pub image: Option<String>,

    /// Build configuration, when the service is built locally.
    pub build: Option<BuildConfig>,

    /// Published ports in short syntax.
    pub ports: Vec<String>,

    /// Environment variables.
    pub environment: BTreeMap<String, String>,

    /// Raw mount specifications (`source:target[:mode]` or a bare target).
    pub volumes: Vec<String>,

    /// Names of services this one depends on, in document order.
    pub depends_on: Vec<String>,

    /// Networks this service attaches to, in document order.
    pub networks: Vec<String>,

    /// Health check, absent when undeclared or disabled.
    pub health_check: Option<HealthCheck>,
}

impl Service {
    /// Create an empty service with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper setting `depends_on`.
    #[must_use]
    pub fn with_depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper setting `networks`.
    #[must_use]
    pub fn with_networks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.networks = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper setting `volumes`.
    #[must_use]
    pub fn with_volumes<I, S>(mut self, mounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.volumes = mounts.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper setting the health check.
    #[must_use]
    pub fn with_health_check(mut self, health_check: HealthCheck) -> Self {
        self.health_check = Some(health_check);
        self
    }
}

/// Build configuration for a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Build context directory.
    pub context: String,
    /// Dockerfile path relative to the context.
    pub dockerfile: Option<String>,
    /// Build arguments.
    pub args: BTreeMap<String, String>,
}

/// Health check configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    /// Test command in exec form.
    pub test: Vec<String>,
    /// Interval between checks, as written in the document.
    pub interval: Option<String>,
    /// Timeout for a single check.
    pub timeout: Option<String>,
    /// Consecutive failures before the service counts as unhealthy.
    pub retries: Option<u32>,
}

/// A top-level network declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Network {
    /// Network driver.
    pub driver: Option<String>,
    /// Driver options.
    pub driver_opts: BTreeMap<String, String>,
}

/// A top-level named volume declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// Volume driver.
    pub driver: Option<String>,
    /// Driver options.
    pub driver_opts: BTreeMap<String, String>,
}

impl ComposeFile {
    /// Check whether a service with this name is declared.
    pub fn service_exists(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Service names in sorted order.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Layer `other` on top of this document.
    ///
    /// Services in `other` replace same-named services here wholesale;
    /// network and volume declarations are unioned with `other` winning on
    /// conflicts. A version in `other` replaces this one.
    pub fn merge(&mut self, other: ComposeFile) {
        if other.version.is_some() {
            self.version = other.version;
        }
        for (name, service) in other.services {
            if self.services.insert(name.clone(), service).is_some() {
                tracing::debug!(service = %name, "Service overridden by later document");
            }
        }
        self.networks.extend(other.networks);
        self.volumes.extend(other.volumes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_services_and_unions_declarations() {
        let mut base = ComposeFile::default();
        base.services
            .insert("api".into(), Service::new("api").with_depends_on(["db"]));
        base.services.insert("db".into(), Service::new("db"));
        base.networks.insert("front".into(), Network::default());

        let mut overlay = ComposeFile {
            version: Some("3.9".into()),
            ..ComposeFile::default()
        };
        overlay
            .services
            .insert("api".into(), Service::new("api").with_depends_on(["cache"]));
        overlay.networks.insert("back".into(), Network::default());

        base.merge(overlay);

        assert_eq!(base.version.as_deref(), Some("3.9"));
        assert_eq!(base.services["api"].depends_on, vec!["cache"]);
        assert!(base.service_exists("db"));
        assert_eq!(base.networks.len(), 2);
    }

    #[test]
    fn test_service_names_are_sorted() {
        let mut file = ComposeFile::default();
        for name in ["web", "api", "db"] {
            file.services.insert(name.into(), Service::new(name));
        }
        assert_eq!(file.service_names(), vec!["api", "db", "web"]);
    }
}
