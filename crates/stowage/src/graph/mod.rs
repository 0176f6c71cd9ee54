//! Service dependency graph.
//!
//! A [`ServiceGraph`] is built once from a snapshot of a compose service map
//! and never mutated afterwards. Filtering produces a new, independent graph.
//!
//! # Architecture
//!
//! - `BTreeMap<String, ServiceNode>` is the single owning registry. Sorted
//!   iteration over it is what makes cycle detection, ordering and rendering
//!   reproducible run to run.
//! - Edges are stored as service names on both endpoints rather than as
//!   references between nodes, so the bidirectional structure needs no
//!   shared ownership.
//! - `petgraph` projections of the registry are built on demand for the
//!   focused queries (transitive closure, reachability).
//!
//! ## Edge Direction Convention
//!
//! - `a.depends_on()` lists the services `a` requires.
//! - `a.depended_by()` lists the services that require `a`.
//! - `b ∈ a.depends_on() ⇔ a ∈ b.depended_by()` always holds.
//!
//! ## Peer Maps
//!
//! `network_peers` and `volume_peers` map a network name or volume identifier
//! to every service sharing it, **including the node itself**. Displays that
//! say "shared with" filter the node out.
//!
//! ## Cycles
//!
//! Cycles are data, not errors. Building and rendering succeed on cyclic
//! input; [`ServiceGraph::topological_order`] is only present when no cycle
//! was recorded.

mod build;
mod cycles;
mod filter;
mod peers;
mod query;
mod topo;

pub use peers::volume_identifier;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use stowage_compose::{HealthCheck, Service};

use crate::error::{Error, Result};

/// A service and all of its relationships within one graph.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceNode {
    name: String,
    definition: Service,
    depends_on: Vec<String>,
    depended_by: Vec<String>,
    networks: Vec<String>,
    network_peers: BTreeMap<String, Vec<String>>,
    volumes: Vec<String>,
    volume_peers: BTreeMap<String, Vec<String>>,
}

impl ServiceNode {
    /// Create an unlinked node. Edges and peers are filled in by the builder.
    fn new(name: &str, definition: Service) -> Self {
        Self {
            name: name.to_string(),
            networks: definition.networks.clone(),
            volumes: definition.volumes.clone(),
            definition,
            depends_on: Vec::new(),
            depended_by: Vec::new(),
            network_peers: BTreeMap::new(),
            volume_peers: BTreeMap::new(),
        }
    }

    /// Copy of this node with every edge and peer list dropped.
    fn detached(&self) -> Self {
        Self::new(&self.name, self.definition.clone())
    }

    /// Service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying service definition.
    pub fn definition(&self) -> &Service {
        &self.definition
    }

    /// Services this one depends on, in declaration order.
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Services that depend on this one.
    pub fn depended_by(&self) -> &[String] {
        &self.depended_by
    }

    /// Networks this service attaches to.
    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    /// Raw mount specifications.
    pub fn volumes(&self) -> &[String] {
        &self.volumes
    }

    /// Network name to every service on it (self included).
    pub fn network_peers(&self) -> &BTreeMap<String, Vec<String>> {
        &self.network_peers
    }

    /// Volume identifier to every service mounting it (self included).
    pub fn volume_peers(&self) -> &BTreeMap<String, Vec<String>> {
        &self.volume_peers
    }

    /// Services sharing `network` with this one, self excluded.
    pub fn shared_network_with(&self, network: &str) -> Vec<&str> {
        others(self.network_peers.get(network), &self.name)
    }

    /// Services sharing the volume behind `mount` with this one, self excluded.
    ///
    /// Bind mounts never share anything.
    pub fn shared_volume_with(&self, mount: &str) -> Vec<&str> {
        let peers = volume_identifier(mount).and_then(|id| self.volume_peers.get(id));
        others(peers, &self.name)
    }

    /// Health check, if one is declared.
    pub fn health_check(&self) -> Option<&HealthCheck> {
        self.definition.health_check.as_ref()
    }

    /// Whether a health check is declared.
    pub fn has_health_check(&self) -> bool {
        self.definition.health_check.is_some()
    }
}

fn others<'a>(peers: Option<&'a Vec<String>>, name: &str) -> Vec<&'a str> {
    peers
        .into_iter()
        .flatten()
        .filter(|peer| peer.as_str() != name)
        .map(String::as_str)
        .collect()
}

/// One detected dependency cycle.
///
/// The starting service is repeated as the final element, so `a → b → a` is
/// stored as `[a, b, a]` and a self-dependency as `[a, a]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycle(Vec<String>);

impl Cycle {
    /// Close a cycle over `path`, which starts at the re-entered service.
    fn closing(path: &[&str]) -> Self {
        let mut names: Vec<String> = path.iter().map(|name| (*name).to_string()).collect();
        if let Some(first) = path.first() {
            names.push((*first).to_string());
        }
        Self(names)
    }

    /// The names in the cycle, closing repeat included.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Number of edges in the loop (a self-dependency has length one).
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Whether the cycle has no edges.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `name` participates in the cycle.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Whether `from → to` appears as consecutive entries.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.0.windows(2).any(|pair| pair[0] == from && pair[1] == to)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" → "))
    }
}

/// Kind of relationship between two services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RelationshipKind {
    /// `from` lists `to` in `depends_on`.
    DependsOn,
    /// Both services attach to the named network.
    Network(String),
    /// Both services mount the identified volume.
    Volume(String),
}

impl RelationshipKind {
    /// The network name or volume identifier, if any.
    pub fn metadata(&self) -> Option<&str> {
        match self {
            RelationshipKind::DependsOn => None,
            RelationshipKind::Network(name) | RelationshipKind::Volume(name) => Some(name),
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::DependsOn => write!(f, "depends_on"),
            RelationshipKind::Network(name) => write!(f, "network: {name}"),
            RelationshipKind::Volume(name) => write!(f, "volume: {name}"),
        }
    }
}

/// A directed relationship fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    /// Source service.
    pub from: String,
    /// Target service.
    pub to: String,
    /// What connects them.
    #[serde(flatten)]
    pub kind: RelationshipKind,
}

/// How a service relates to a selected service, for interactive highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// The selected service itself.
    Selected,
    /// The selected service depends on it.
    Dependency,
    /// It depends on the selected service.
    Dependent,
    /// Shares a network with the selected service.
    NetworkPeer,
    /// Shares a volume with the selected service.
    VolumePeer,
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Highlight::Selected => write!(f, "selected"),
            Highlight::Dependency => write!(f, "dependency"),
            Highlight::Dependent => write!(f, "dependent"),
            Highlight::NetworkPeer => write!(f, "network peer"),
            Highlight::VolumePeer => write!(f, "volume peer"),
        }
    }
}

/// An immutable, fully resolved service dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceGraph {
    services: BTreeMap<String, ServiceNode>,
    cycles: Vec<Cycle>,
    topological_order: Option<Vec<String>>,
}

impl ServiceGraph {
    /// All nodes keyed by name.
    pub fn services(&self) -> &BTreeMap<String, ServiceNode> {
        &self.services
    }

    /// Look up a node by name.
    pub fn service(&self, name: &str) -> Option<&ServiceNode> {
        self.services.get(name)
    }

    /// Look up a node by name, failing with [`Error::ServiceNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotFound`] if no such service exists.
    pub fn require(&self, name: &str) -> Result<&ServiceNode> {
        self.services
            .get(name)
            .ok_or_else(|| Error::ServiceNotFound(name.to_string()))
    }

    /// Service names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Number of services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the graph has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Recorded cycles, in detection order.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Whether any cycle was recorded.
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Dependency order, present only for acyclic graphs.
    ///
    /// The order starts with services nothing depends on and ends with the
    /// services everything depends on.
    pub fn topological_order(&self) -> Option<&[String]> {
        self.topological_order.as_deref()
    }

    /// Services with no dependencies, sorted.
    pub fn root_services(&self) -> Vec<&str> {
        self.services
            .values()
            .filter(|node| node.depends_on.is_empty())
            .map(ServiceNode::name)
            .collect()
    }

    /// Whether `name` participates in any recorded cycle.
    pub fn is_in_cycle(&self, name: &str) -> bool {
        self.cycles.iter().any(|cycle| cycle.contains(name))
    }

    /// Whether `from → to` is an edge of any recorded cycle.
    pub fn is_cycle_edge(&self, from: &str, to: &str) -> bool {
        self.cycles.iter().any(|cycle| cycle.has_edge(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display_and_edges() {
        let cycle = Cycle::closing(&["api", "worker"]);
        assert_eq!(cycle.to_string(), "api → worker → api");
        assert_eq!(cycle.len(), 2);
        assert!(cycle.has_edge("api", "worker"));
        assert!(cycle.has_edge("worker", "api"));
        assert!(!cycle.has_edge("api", "api"));
    }

    #[test]
    fn test_self_cycle_has_length_one() {
        let cycle = Cycle::closing(&["db"]);
        assert_eq!(cycle.names(), ["db", "db"]);
        assert_eq!(cycle.len(), 1);
        assert!(!cycle.is_empty());
    }

    #[test]
    fn test_relationship_kind_metadata() {
        assert_eq!(RelationshipKind::DependsOn.metadata(), None);
        assert_eq!(
            RelationshipKind::Network("backend".into()).metadata(),
            Some("backend")
        );
        assert_eq!(
            RelationshipKind::Volume("data".into()).to_string(),
            "volume: data"
        );
    }

    #[test]
    fn test_relationship_serializes_flat() {
        let relationship = Relationship {
            from: "api".into(),
            to: "db".into(),
            kind: RelationshipKind::Network("backend".into()),
        };
        let json = serde_json::to_value(&relationship).expect("should serialize");
        assert_eq!(json["from"], "api");
        assert_eq!(json["kind"], "network");
        assert_eq!(json["name"], "backend");
    }
}
