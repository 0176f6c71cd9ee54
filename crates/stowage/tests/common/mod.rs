//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use stowage::ServiceGraph;
use stowage_compose::Service;

/// Get the workspace root directory
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // Go up from crates/stowage to workspace root
    manifest_dir
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Helper that builds the binary once and runs it directly
pub fn get_stowage_binary() -> PathBuf {
    let workspace = workspace_root();

    // Build the binary first (this should be quick if already built)
    let status = Command::new("cargo")
        .args(["build", "--package", "stowage", "--quiet"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build stowage");

    assert!(status.success(), "Failed to build stowage binary");

    workspace.join("target/debug/stowage")
}

/// Run the stowage binary directly in the specified directory
///
/// Colors are switched off so assertions can match plain text.
pub fn run_stowage_in_dir(dir: &Path, args: &[&str]) -> Output {
    let binary = get_stowage_binary();

    Command::new(&binary)
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("STOWAGE_ASCII")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute stowage binary")
}

/// Write `contents` to `name` inside `dir`, returning the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Build a graph from a list of services keyed by their own names.
pub fn graph_of(services: Vec<Service>) -> ServiceGraph {
    let services: BTreeMap<String, Service> = services
        .into_iter()
        .map(|service| (service.name.clone(), service))
        .collect();
    ServiceGraph::build(&services).expect("graph should build")
}
