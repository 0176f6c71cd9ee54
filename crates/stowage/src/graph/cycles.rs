//! Cycle detection over `depends_on` edges.
//!
//! Depth-first search started from every unvisited service in sorted name
//! order. Following an edge into a service that is still on the active path
//! records the path suffix from that service, closed by repeating it.
//!
//! Overlapping cycles reached through different back-edges are all recorded;
//! nothing is deduplicated.

use std::collections::{BTreeMap, HashSet};

use super::{Cycle, ServiceNode};

/// Find every back-edge cycle in the node set.
pub(super) fn detect_cycles(nodes: &BTreeMap<String, ServiceNode>) -> Vec<Cycle> {
    let mut search = CycleSearch {
        nodes,
        visited: HashSet::new(),
        on_stack: HashSet::new(),
        path: Vec::new(),
        cycles: Vec::new(),
    };

    for name in nodes.keys() {
        if !search.visited.contains(name.as_str()) {
            search.visit(name);
        }
    }

    if !search.cycles.is_empty() {
        tracing::debug!(cycles = search.cycles.len(), "Detected circular dependencies");
    }
    search.cycles
}

struct CycleSearch<'a> {
    nodes: &'a BTreeMap<String, ServiceNode>,
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    path: Vec<&'a str>,
    cycles: Vec<Cycle>,
}

impl<'a> CycleSearch<'a> {
    fn visit(&mut self, current: &'a str) {
        self.visited.insert(current);
        self.on_stack.insert(current);
        self.path.push(current);

        let nodes = self.nodes;
        if let Some(node) = nodes.get(current) {
            for dependency in &node.depends_on {
                let dependency = dependency.as_str();
                if !self.visited.contains(dependency) {
                    self.visit(dependency);
                } else if self.on_stack.contains(dependency) {
                    if let Some(start) = self.path.iter().position(|name| *name == dependency) {
                        tracing::trace!(service = current, back_edge = dependency, "Back-edge found");
                        self.cycles.push(Cycle::closing(&self.path[start..]));
                    }
                }
            }
        }

        self.path.pop();
        self.on_stack.remove(current);
    }
}
