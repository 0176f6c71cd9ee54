//! Loading compose documents from YAML.
//!
//! [`ComposeFile::from_yaml_str`] parses a document held in memory and
//! [`ComposeFile::load`] reads one from disk. [`load_all`] layers several
//! documents in order, the way `docker compose -f a.yml -f b.yml` does.

use crate::error::{Error, Result};
use crate::model::{BuildConfig, ComposeFile, HealthCheck, Network, Service, Volume};
use crate::raw::{
    RawBuild, RawCompose, RawDriverDecl, RawHealthCheck, RawKeyValues, RawMount, RawNames,
    RawService, RawTest,
};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

impl ComposeFile {
    /// Parse a compose document from a YAML string.
    ///
    /// An empty document yields an empty [`ComposeFile`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] when the text is not a valid compose document and
    /// [`Error::InvalidService`] when a service entry cannot be normalised.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawCompose = serde_yaml::from_str(content)?;
        let version = raw.version.as_ref().and_then(scalar_to_string);

        let mut services = BTreeMap::new();
        for (name, raw_service) in raw.services.unwrap_or_default() {
            let service = convert_service(&name, raw_service.unwrap_or_default())?;
            services.insert(name, service);
        }

        let networks = raw
            .networks
            .unwrap_or_default()
            .into_iter()
            .map(|(name, decl)| {
                let (driver, driver_opts) = convert_driver_decl(decl);
                (
                    name,
                    Network {
                        driver,
                        driver_opts,
                    },
                )
            })
            .collect();

        let volumes = raw
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|(name, decl)| {
                let (driver, driver_opts) = convert_driver_decl(decl);
                (
                    name,
                    Volume {
                        driver,
                        driver_opts,
                    },
                )
            })
            .collect();

        tracing::debug!(services = services.len(), "Parsed compose document");

        Ok(Self {
            version,
            services,
            networks,
            volumes,
        })
    }

    /// Read and parse a compose document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the same
    /// errors as [`ComposeFile::from_yaml_str`].
    pub async fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading compose document");
        let content = fs::read_to_string(path).await?;
        Self::from_yaml_str(&content)
    }
}

/// Load several documents and merge them in order.
///
/// Later documents override earlier ones (see [`ComposeFile::merge`]).
///
/// # Errors
///
/// Fails on the first document that cannot be loaded.
pub async fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<ComposeFile> {
    let mut merged = ComposeFile::default();
    for path in paths {
        merged.merge(ComposeFile::load(path.as_ref()).await?);
    }
    Ok(merged)
}

fn convert_service(name: &str, raw: RawService) -> Result<Service> {
    if name.is_empty() {
        return Err(Error::InvalidService {
            service: name.to_string(),
            reason: "service name must not be empty".to_string(),
        });
    }

    let depends_on = match raw.depends_on {
        Some(names) => names_in_order(name, "depends_on", names)?,
        None => Vec::new(),
    };
    let networks = match raw.networks {
        Some(names) => names_in_order(name, "networks", names)?,
        None => Vec::new(),
    };

    Ok(Service {
        name: name.to_string(),
        image: raw.image,
        build: raw.build.map(convert_build),
        ports: raw.ports.iter().filter_map(port_to_string).collect(),
        environment: raw.environment.map(key_values).unwrap_or_default(),
        volumes: raw.volumes.into_iter().filter_map(mount_to_string).collect(),
        depends_on,
        networks,
        health_check: raw.healthcheck.and_then(convert_health_check),
    })
}

fn names_in_order(service: &str, field: &str, names: RawNames) -> Result<Vec<String>> {
    match names {
        RawNames::List(list) => Ok(list),
        RawNames::Map(mapping) => mapping
            .into_iter()
            .map(|(key, _)| match key {
                Value::String(s) => Ok(s),
                other => Err(Error::InvalidService {
                    service: service.to_string(),
                    reason: format!("{field} key {other:?} is not a string"),
                }),
            })
            .collect(),
    }
}

fn convert_build(raw: RawBuild) -> BuildConfig {
    match raw {
        RawBuild::Context(context) => BuildConfig {
            context,
            ..BuildConfig::default()
        },
        RawBuild::Detailed {
            context,
            dockerfile,
            args,
        } => BuildConfig {
            context: context.unwrap_or_else(|| ".".to_string()),
            dockerfile,
            args: args.map(key_values).unwrap_or_default(),
        },
    }
}

fn convert_health_check(raw: RawHealthCheck) -> Option<HealthCheck> {
    if raw.disable.unwrap_or(false) {
        return None;
    }
    let test = match raw.test {
        Some(RawTest::Shell(command)) => vec!["CMD-SHELL".to_string(), command],
        Some(RawTest::Exec(args)) => args,
        None => Vec::new(),
    };
    if test.first().is_some_and(|first| first == "NONE") {
        return None;
    }
    Some(HealthCheck {
        test,
        interval: raw.interval,
        timeout: raw.timeout,
        retries: raw.retries,
    })
}

fn convert_driver_decl(decl: Option<RawDriverDecl>) -> (Option<String>, BTreeMap<String, String>) {
    let decl = decl.unwrap_or_default();
    let opts = decl
        .driver_opts
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| scalar_to_string(&value).map(|v| (key, v)))
        .collect();
    (decl.driver, opts)
}

fn key_values(raw: RawKeyValues) -> BTreeMap<String, String> {
    match raw {
        RawKeyValues::Map(map) => map
            .into_iter()
            .map(|(key, value)| {
                let value = value.as_ref().and_then(scalar_to_string).unwrap_or_default();
                (key, value)
            })
            .collect(),
        RawKeyValues::List(entries) => entries
            .into_iter()
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (entry, String::new()),
            })
            .collect(),
    }
}

/// Normalise a mount to short syntax so the graph engine sees one shape.
fn mount_to_string(raw: RawMount) -> Option<String> {
    match raw {
        RawMount::Short(spec) => Some(spec),
        RawMount::Long {
            kind,
            source,
            target,
            read_only,
        } => {
            let target = target?;
            let mut spec = match source {
                Some(source) if kind.as_deref() != Some("tmpfs") => format!("{source}:{target}"),
                _ => target,
            };
            if read_only.unwrap_or(false) {
                spec.push_str(":ro");
            }
            Some(spec)
        }
    }
}

fn port_to_string(value: &Value) -> Option<String> {
    if let Value::Mapping(mapping) = value {
        let field = |key: &str| mapping.get(key).and_then(scalar_to_string);
        let target = field("target")?;
        let mut spec = match field("published") {
            Some(published) => format!("{published}:{target}"),
            None => target,
        };
        if let Some(protocol) = field("protocol") {
            spec.push('/');
            spec.push_str(&protocol);
        }
        return Some(spec);
    }
    scalar_to_string(value)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
