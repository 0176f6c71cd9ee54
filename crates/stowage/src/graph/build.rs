//! Graph construction from a compose service map.

use std::collections::BTreeMap;

use stowage_compose::{ComposeFile, Service};

use super::{ServiceGraph, ServiceNode, cycles, peers, topo};
use crate::error::{Error, Result};

/// What to do with a `depends_on` entry that names no node in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Resolution {
    /// Fail the whole build.
    Strict,
    /// Silently drop the edge (used when re-linking a subgraph).
    DropMissing,
}

impl ServiceGraph {
    /// Build a graph from a service map.
    ///
    /// Nodes are created for every entry, `depends_on` edges are resolved,
    /// network and volume peers are indexed, cycles are detected, and when
    /// there are none a topological order is attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDependency`] if any `depends_on` entry names a
    /// service absent from the map. No partial graph is returned.
    pub fn build(services: &BTreeMap<String, Service>) -> Result<Self> {
        let mut nodes: BTreeMap<String, ServiceNode> = services
            .iter()
            .map(|(name, service)| (name.clone(), ServiceNode::new(name, service.clone())))
            .collect();

        link_dependencies(&mut nodes, Resolution::Strict)?;
        peers::index_relationships(&mut nodes);

        let graph = Self::assemble(nodes);
        tracing::debug!(
            services = graph.len(),
            cycles = graph.cycles.len(),
            "Built dependency graph"
        );
        Ok(graph)
    }

    /// Build a graph from every service in a compose document.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceGraph::build`].
    pub fn from_compose(file: &ComposeFile) -> Result<Self> {
        Self::build(&file.services)
    }

    /// Finish a linked and indexed node set: detect cycles, then order it.
    pub(super) fn assemble(nodes: BTreeMap<String, ServiceNode>) -> Self {
        let cycles = cycles::detect_cycles(&nodes);

        let topological_order = if cycles.is_empty() {
            match topo::topological_sort(&nodes) {
                Ok(order) => Some(order),
                Err(e) => {
                    tracing::warn!(error = %e, "Topological sort failed on an acyclic graph");
                    None
                }
            }
        } else {
            None
        };

        Self {
            services: nodes,
            cycles,
            topological_order,
        }
    }
}

/// Rebuild `depends_on` / `depended_by` from each node's declared dependencies.
///
/// Existing edges are discarded first. Nodes are visited in name order so the
/// first unknown dependency reported is deterministic, and `depended_by` lists
/// come out sorted.
pub(super) fn link_dependencies(
    nodes: &mut BTreeMap<String, ServiceNode>,
    resolution: Resolution,
) -> Result<()> {
    let mut edges = Vec::new();
    for (name, node) in nodes.iter() {
        for dependency in &node.definition.depends_on {
            if nodes.contains_key(dependency) {
                edges.push((name.clone(), dependency.clone()));
            } else if resolution == Resolution::Strict {
                return Err(Error::UnknownDependency {
                    service: name.clone(),
                    dependency: dependency.clone(),
                });
            } else {
                tracing::trace!(service = %name, dependency = %dependency, "Dropping edge outside node set");
            }
        }
    }

    for node in nodes.values_mut() {
        node.depends_on.clear();
        node.depended_by.clear();
    }

    for (from, to) in edges {
        if let Some(node) = nodes.get_mut(&from) {
            node.depends_on.push(to.clone());
        }
        if let Some(node) = nodes.get_mut(&to) {
            node.depended_by.push(from);
        }
    }

    Ok(())
}
