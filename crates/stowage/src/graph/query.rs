//! Focused queries over a built graph.
//!
//! Reachability questions go through a `petgraph` projection of the registry
//! with edges directed from dependent to dependency.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{Highlight, Relationship, RelationshipKind, ServiceGraph};
use crate::error::{Error, Result};

/// `depends_on` edges as a petgraph, plus the name lookup into it.
struct Projection<'a> {
    graph: DiGraph<&'a str, ()>,
    index: HashMap<&'a str, NodeIndex>,
}

impl Projection<'_> {
    fn node(&self, name: &str) -> Result<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::ServiceNotFound(name.to_string()))
    }
}

impl ServiceGraph {
    fn dependency_projection(&self) -> Projection<'_> {
        let mut graph = DiGraph::with_capacity(self.services.len(), 0);
        let mut index = HashMap::with_capacity(self.services.len());
        for name in self.services.keys() {
            index.insert(name.as_str(), graph.add_node(name.as_str()));
        }
        for (name, node) in &self.services {
            for dependency in &node.depends_on {
                if let (Some(&from), Some(&to)) =
                    (index.get(name.as_str()), index.get(dependency.as_str()))
                {
                    graph.add_edge(from, to, ());
                }
            }
        }
        Projection { graph, index }
    }

    /// Every relationship fact in the graph.
    ///
    /// All `DependsOn` facts come first, then `Network`, then `Volume`; within
    /// each kind sources are in name order. Peer facts are emitted from both
    /// sides and never pair a service with itself.
    pub fn relationships(&self) -> Vec<Relationship> {
        let mut relationships = Vec::new();

        for node in self.services.values() {
            for dependency in &node.depends_on {
                relationships.push(Relationship {
                    from: node.name.clone(),
                    to: dependency.clone(),
                    kind: RelationshipKind::DependsOn,
                });
            }
        }

        for node in self.services.values() {
            for (network, peers) in &node.network_peers {
                for peer in peers.iter().filter(|peer| **peer != node.name) {
                    relationships.push(Relationship {
                        from: node.name.clone(),
                        to: peer.clone(),
                        kind: RelationshipKind::Network(network.clone()),
                    });
                }
            }
        }

        for node in self.services.values() {
            for (volume, peers) in &node.volume_peers {
                for peer in peers.iter().filter(|peer| **peer != node.name) {
                    relationships.push(Relationship {
                        from: node.name.clone(),
                        to: peer.clone(),
                        kind: RelationshipKind::Volume(volume.clone()),
                    });
                }
            }
        }

        relationships
    }

    /// Classify every service related to `name`.
    ///
    /// Dependencies are marked first, then dependents (which win when a
    /// service is both). Network and volume peers are only marked if nothing
    /// else claimed them. The selected service always stays `Selected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotFound`] if `name` is not in the graph.
    pub fn highlights(&self, name: &str) -> Result<BTreeMap<String, Highlight>> {
        let node = self.require(name)?;
        let mut highlights = BTreeMap::new();

        for dependency in &node.depends_on {
            highlights.insert(dependency.clone(), Highlight::Dependency);
        }
        for dependent in &node.depended_by {
            highlights.insert(dependent.clone(), Highlight::Dependent);
        }
        for peer in node.network_peers.values().flatten() {
            highlights
                .entry(peer.clone())
                .or_insert(Highlight::NetworkPeer);
        }
        for peer in node.volume_peers.values().flatten() {
            highlights
                .entry(peer.clone())
                .or_insert(Highlight::VolumePeer);
        }

        highlights.insert(node.name.clone(), Highlight::Selected);
        Ok(highlights)
    }

    /// Every service `name` depends on, directly or transitively, with the
    /// number of hops to reach it.
    ///
    /// Results are ordered by depth, then name. A service on a cycle through
    /// `name` lists `name` itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotFound`] if `name` is not in the graph.
    pub fn transitive_dependencies(&self, name: &str) -> Result<Vec<(String, usize)>> {
        let projection = self.dependency_projection();
        let start = projection.node(name)?;

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(start, 0_usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            for target in projection.graph.neighbors(current) {
                if visited.insert(target) {
                    result.push((projection.graph[target].to_string(), depth + 1));
                    queue.push_back((target, depth + 1));
                }
            }
        }

        result.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(result)
    }

    /// Whether adding `from → to` would close a cycle.
    ///
    /// True when `from == to` or when `to` already reaches `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotFound`] if either service is missing.
    pub fn would_create_cycle(&self, from: &str, to: &str) -> Result<bool> {
        let projection = self.dependency_projection();
        let from_node = projection.node(from)?;
        let to_node = projection.node(to)?;

        if from_node == to_node {
            return Ok(true);
        }
        Ok(algo::has_path_connecting(
            &projection.graph,
            to_node,
            from_node,
            None,
        ))
    }

    /// All relationships as an owned petgraph.
    ///
    /// Node weights are service names, inserted in sorted order; edge weights
    /// are the relationship kinds in [`ServiceGraph::relationships`] order.
    pub fn relationship_graph(&self) -> DiGraph<String, RelationshipKind> {
        let mut graph = DiGraph::with_capacity(self.services.len(), 0);
        let index: HashMap<&str, NodeIndex> = self
            .services
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.clone())))
            .collect();

        for relationship in self.relationships() {
            if let (Some(&from), Some(&to)) = (
                index.get(relationship.from.as_str()),
                index.get(relationship.to.as_str()),
            ) {
                graph.add_edge(from, to, relationship.kind);
            }
        }
        graph
    }
}
