//! Subgraph extraction around a focal service.

use std::collections::{BTreeMap, HashSet};

use super::build::{Resolution, link_dependencies};
use super::{ServiceGraph, ServiceNode, peers};
use crate::error::{Error, Result};

impl ServiceGraph {
    /// Extract the neighborhood of `name` into a new, independent graph.
    ///
    /// The walk follows both `depends_on` and `depended_by` edges from the
    /// focal service with a single depth counter for both directions.
    /// `max_depth` of `None` means unlimited; `Some(0)` keeps only the focal
    /// service.
    ///
    /// The collected services are re-linked against the reduced set (edges
    /// leaving it are dropped), peers are re-indexed, and cycles are detected
    /// afresh. The source graph is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotFound`] if `name` is not in this graph.
    pub fn filter_by_service(&self, name: &str, max_depth: Option<usize>) -> Result<ServiceGraph> {
        if !self.services.contains_key(name) {
            return Err(Error::ServiceNotFound(name.to_string()));
        }

        let mut visited = HashSet::new();
        let mut collected = BTreeMap::new();
        self.collect_neighborhood(name, max_depth, 0, &mut visited, &mut collected);

        link_dependencies(&mut collected, Resolution::DropMissing)?;
        peers::index_relationships(&mut collected);

        let filtered = Self::assemble(collected);
        tracing::debug!(
            service = name,
            max_depth = ?max_depth,
            kept = filtered.len(),
            total = self.len(),
            "Filtered dependency graph"
        );
        Ok(filtered)
    }

    fn collect_neighborhood<'a>(
        &'a self,
        name: &'a str,
        max_depth: Option<usize>,
        depth: usize,
        visited: &mut HashSet<&'a str>,
        collected: &mut BTreeMap<String, ServiceNode>,
    ) {
        if visited.contains(name) {
            return;
        }
        if max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(node) = self.services.get(name) else {
            return;
        };

        visited.insert(name);
        collected.insert(name.to_string(), node.detached());

        for dependency in &node.depends_on {
            self.collect_neighborhood(dependency, max_depth, depth + 1, visited, collected);
        }
        for dependent in &node.depended_by {
            self.collect_neighborhood(dependent, max_depth, depth + 1, visited, collected);
        }
    }
}
