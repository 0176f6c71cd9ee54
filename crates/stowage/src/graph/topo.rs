//! Kahn's-algorithm ordering.
//!
//! The in-degree of a service is the number of services depending on it, so
//! the queue is seeded with services nothing depends on and the order ends
//! with the services everything depends on. Read it backwards for a
//! "dependencies first" startup sequence.

use std::collections::{BTreeMap, HashMap, VecDeque};

use super::{ServiceGraph, ServiceNode};
use crate::error::{Error, Result};

impl ServiceGraph {
    /// The dependency order, or why there is none.
    ///
    /// Returns the stored [`ServiceGraph::topological_order`] when present;
    /// otherwise re-runs the sort so the caller learns how far it got.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicOrder`] if the graph has a cycle.
    pub fn dependency_order(&self) -> Result<Vec<String>> {
        match &self.topological_order {
            Some(order) => Ok(order.clone()),
            None => topological_sort(&self.services),
        }
    }
}

/// Order the node set, failing if a cycle stalls the queue.
///
/// Ties are broken alphabetically: the seed queue is sorted, and each batch of
/// services released by one step is sorted before it is appended.
pub(super) fn topological_sort(nodes: &BTreeMap<String, ServiceNode>) -> Result<Vec<String>> {
    let mut in_degree: HashMap<&str, usize> = nodes
        .iter()
        .map(|(name, node)| (name.as_str(), node.depended_by.len()))
        .collect();

    let mut queue: VecDeque<&str> = nodes
        .iter()
        .filter(|(_, node)| node.depended_by.is_empty())
        .map(|(name, _)| name.as_str())
        .collect();

    let mut order = Vec::with_capacity(nodes.len());

    while let Some(current) = queue.pop_front() {
        order.push(current.to_string());

        let mut released = Vec::new();
        if let Some(node) = nodes.get(current) {
            for dependency in &node.depends_on {
                if let Some(degree) = in_degree.get_mut(dependency.as_str()) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        released.push(dependency.as_str());
                    }
                }
            }
        }

        released.sort_unstable();
        queue.extend(released);
    }

    if order.len() < nodes.len() {
        return Err(Error::CyclicOrder {
            ordered: order.len(),
            total: nodes.len(),
        });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_compose::Service;

    fn nodes(defs: &[(&str, &[&str])]) -> BTreeMap<String, ServiceNode> {
        let services = defs
            .iter()
            .map(|(name, deps)| {
                (
                    (*name).to_string(),
                    Service::new(*name).with_depends_on(deps.iter().copied()),
                )
            })
            .collect();
        ServiceGraph::build(&services)
            .expect("graph should build")
            .services
    }

    #[test]
    fn test_order_runs_from_dependents_to_dependencies() {
        let order = topological_sort(&nodes(&[
            ("web", &["api"]),
            ("api", &["db", "cache"]),
            ("db", &[]),
            ("cache", &[]),
        ]))
        .expect("acyclic");
        assert_eq!(order, vec!["web", "api", "cache", "db"]);
    }

    #[test]
    fn test_seed_queue_is_sorted() {
        let order = topological_sort(&nodes(&[("zeta", &[]), ("alpha", &[]), ("mid", &[])]))
            .expect("acyclic");
        assert_eq!(order, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_released_batch_is_sorted_and_appended() {
        // "a" releases d and c (sorted to c, d), which queue behind "b".
        let order = topological_sort(&nodes(&[
            ("a", &["d", "c"]),
            ("b", &[]),
            ("c", &[]),
            ("d", &[]),
        ]))
        .expect("acyclic");
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_shared_dependency_waits_for_all_dependents() {
        let order = topological_sort(&nodes(&[
            ("api", &["db"]),
            ("worker", &["queue"]),
            ("queue", &["db"]),
            ("db", &[]),
        ]))
        .expect("acyclic");
        assert_eq!(order, vec!["api", "worker", "queue", "db"]);
    }

    #[test]
    fn test_dependency_order_reports_stall() {
        let services = [
            Service::new("a").with_depends_on(["b"]),
            Service::new("b").with_depends_on(["a"]),
        ]
        .into_iter()
        .map(|service| (service.name.clone(), service))
        .collect();
        let graph = ServiceGraph::build(&services).expect("graph should build");

        assert!(matches!(
            graph.dependency_order(),
            Err(Error::CyclicOrder {
                ordered: 0,
                total: 2
            })
        ));
    }

    #[test]
    fn test_cycle_stalls_sort() {
        let result = topological_sort(&nodes(&[("a", &["b"]), ("b", &["a"]), ("c", &[])]));
        assert!(matches!(
            result,
            Err(Error::CyclicOrder {
                ordered: 1,
                total: 3
            })
        ));
    }
}
