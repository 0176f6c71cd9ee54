//! Serde shapes mirroring the document as written.
//!
//! Compose accepts several spellings for most fields. These types accept all
//! of them; [`crate::loader`] folds them into the typed model.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCompose {
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub services: Option<BTreeMap<String, Option<RawService>>>,
    #[serde(default)]
    pub networks: Option<BTreeMap<String, Option<RawDriverDecl>>>,
    #[serde(default)]
    pub volumes: Option<BTreeMap<String, Option<RawDriverDecl>>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawService {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub build: Option<RawBuild>,
    #[serde(default)]
    pub ports: Vec<Value>,
    #[serde(default)]
    pub environment: Option<RawKeyValues>,
    #[serde(default)]
    pub volumes: Vec<RawMount>,
    #[serde(default)]
    pub depends_on: Option<RawNames>,
    #[serde(default)]
    pub networks: Option<RawNames>,
    #[serde(default)]
    pub healthcheck: Option<RawHealthCheck>,
}

/// `depends_on` / `networks`: a plain list or a map keyed by name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawNames {
    List(Vec<String>),
    Map(Mapping),
}

/// `environment` / `build.args`: a map or a list of `KEY=VALUE`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawKeyValues {
    Map(BTreeMap<String, Option<Value>>),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawBuild {
    Context(String),
    Detailed {
        #[serde(default)]
        context: Option<String>,
        #[serde(default)]
        dockerfile: Option<String>,
        #[serde(default)]
        args: Option<RawKeyValues>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawMount {
    Short(String),
    Long {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        read_only: Option<bool>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTest {
    Shell(String),
    Exec(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawHealthCheck {
    #[serde(default)]
    pub test: Option<RawTest>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub disable: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDriverDecl {
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub driver_opts: Option<BTreeMap<String, Value>>,
}
