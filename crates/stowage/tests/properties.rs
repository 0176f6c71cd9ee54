//! Property tests for graph invariants over generated service maps.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use stowage::ServiceGraph;
use stowage::output::{DotOptions, OutputConfig, TreeOptions, render_dot, render_tree};
use stowage_compose::Service;

mod common;
use common::graph_of;

const NETWORKS: [&str; 3] = ["frontend", "backend", "metrics"];
const MOUNTS: [&str; 4] = ["data:/var/lib/data", "logs:/var/log", "./bind:/app", "cache"];

/// Service maps of up to eight services named `s0..sN`.
///
/// With `acyclic`, a service only depends on services with a higher index,
/// which rules out cycles. Otherwise any edge is possible, self-loops included.
fn arb_services(acyclic: bool) -> impl Strategy<Value = Vec<Service>> {
    (1usize..8).prop_flat_map(move |n| {
        prop::collection::vec(
            (
                prop::collection::vec(any::<bool>(), n),
                prop::collection::btree_set(0..NETWORKS.len(), 0..3),
                prop::collection::btree_set(0..MOUNTS.len(), 0..3),
            ),
            n,
        )
        .prop_map(move |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (edges, networks, mounts))| {
                    let depends_on = edges
                        .iter()
                        .enumerate()
                        .filter(|&(j, &edge)| edge && (!acyclic || j > i))
                        .map(|(j, _)| format!("s{j}"));
                    Service::new(format!("s{i}"))
                        .with_depends_on(depends_on)
                        .with_networks(networks.into_iter().map(|k| NETWORKS[k]))
                        .with_volumes(mounts.into_iter().map(|k| MOUNTS[k]))
                })
                .collect()
        })
    })
}

fn assert_linear_extension(graph: &ServiceGraph, order: &[String]) -> Result<(), TestCaseError> {
    prop_assert_eq!(order.len(), graph.len());
    let unique: HashSet<&String> = order.iter().collect();
    prop_assert_eq!(unique.len(), order.len());

    let position = |name: &str| order.iter().position(|n| n == name);
    for node in graph.services().values() {
        for dependency in node.depends_on() {
            prop_assert!(
                position(node.name()) < position(dependency),
                "{} must precede {}",
                node.name(),
                dependency
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn edges_are_mutual_inverses(services in arb_services(false)) {
        let graph = graph_of(services);
        for node in graph.services().values() {
            for dependency in node.depends_on() {
                let target = graph.service(dependency);
                prop_assert!(target.is_some(), "dangling edge to {}", dependency);
                prop_assert!(target.unwrap().depended_by().iter().any(|n| n == node.name()));
            }
            for dependent in node.depended_by() {
                let source = graph.service(dependent);
                prop_assert!(source.is_some(), "dangling edge from {}", dependent);
                prop_assert!(source.unwrap().depends_on().iter().any(|n| n == node.name()));
            }
        }
    }

    #[test]
    fn peer_lists_include_self(services in arb_services(false)) {
        let graph = graph_of(services);
        for node in graph.services().values() {
            for peers in node.network_peers().values().chain(node.volume_peers().values()) {
                prop_assert!(peers.iter().any(|peer| peer == node.name()));
            }
            prop_assert_eq!(node.network_peers().len(), node.networks().len());
        }
    }

    #[test]
    fn acyclic_graphs_have_valid_order(services in arb_services(true)) {
        let graph = graph_of(services);
        prop_assert!(!graph.has_cycles());
        let order = graph.topological_order();
        prop_assert!(order.is_some());
        assert_linear_extension(&graph, order.unwrap())?;
    }

    #[test]
    fn order_present_exactly_when_acyclic(services in arb_services(false)) {
        let graph = graph_of(services);
        match graph.topological_order() {
            Some(order) => {
                prop_assert!(!graph.has_cycles());
                assert_linear_extension(&graph, order)?;
            }
            None => prop_assert!(graph.has_cycles()),
        }
    }

    #[test]
    fn detected_cycles_are_closed_walks(services in arb_services(false)) {
        let graph = graph_of(services);
        for cycle in graph.cycles() {
            let names = cycle.names();
            prop_assert!(names.len() >= 2);
            prop_assert_eq!(names.first(), names.last());
            for pair in names.windows(2) {
                let from = graph.service(&pair[0]).unwrap();
                prop_assert!(from.depends_on().contains(&pair[1]));
            }
        }
    }

    #[test]
    fn filter_keeps_focal_service(services in arb_services(false), depth in prop::option::of(0usize..4)) {
        let graph = graph_of(services);
        let names: Vec<String> = graph.names().map(str::to_string).collect();
        for name in &names {
            let filtered = graph.filter_by_service(name, depth).unwrap();
            prop_assert!(filtered.service(name).is_some());
            for node in filtered.services().values() {
                prop_assert!(graph.service(node.name()).is_some());
                for dependency in node.depends_on() {
                    prop_assert!(filtered.service(dependency).is_some());
                }
            }
        }
    }

    #[test]
    fn renderers_name_every_service(services in arb_services(false)) {
        let graph = graph_of(services);
        let names: BTreeSet<&str> = graph.names().collect();

        let tree = render_tree(&graph, &TreeOptions::default(), &OutputConfig::plain());
        let tree_names: BTreeSet<&str> = tree
            .lines()
            .filter_map(|line| line.split_once("◆ ").map(|(_, rest)| rest))
            .filter_map(|rest| rest.split_whitespace().next())
            .collect();
        prop_assert_eq!(&tree_names, &names);

        let dot = render_dot(&graph, &DotOptions::default());
        for name in &names {
            let declaration = format!("  \"{name}\" [");
            prop_assert!(dot.contains(&declaration), "missing node {}", name);
        }
    }
}

#[test]
fn test_mutual_dependency_is_one_cycle() {
    let graph = graph_of(vec![
        Service::new("a").with_depends_on(["b"]),
        Service::new("b").with_depends_on(["a"]),
    ]);
    assert!(!graph.cycles().is_empty());
    assert!(
        graph
            .cycles()
            .iter()
            .any(|cycle| cycle.contains("a") && cycle.contains("b"))
    );
}

#[test]
fn test_self_dependency_is_cycle_of_length_one() {
    let graph = graph_of(vec![Service::new("a").with_depends_on(["a"])]);
    assert_eq!(graph.cycles().len(), 1);
    assert_eq!(graph.cycles()[0].len(), 1);
    assert_eq!(graph.cycles()[0].names(), ["a", "a"]);
}
