//! Network and volume peer indexing.

use std::collections::BTreeMap;

use super::ServiceNode;

/// Derive the shared-volume identifier from a raw mount specification.
///
/// Mounts starting with `/` or `.` are host or relative bind mounts and never
/// identify a shared volume. Otherwise the identifier is everything before the
/// first `:`, or the whole string when there is none.
///
/// This is a string heuristic: two services mounting `data:/a` and `data:/b`
/// are peers whether or not `data` is declared as a top-level volume.
///
/// ```
/// use stowage::graph::volume_identifier;
///
/// assert_eq!(volume_identifier("data:/var/lib/data"), Some("data"));
/// assert_eq!(volume_identifier("cache"), Some("cache"));
/// assert_eq!(volume_identifier("./local:/app"), None);
/// assert_eq!(volume_identifier("/srv/data:/data"), None);
/// ```
pub fn volume_identifier(mount: &str) -> Option<&str> {
    if mount.starts_with(['/', '.']) {
        return None;
    }
    let identifier = mount.split_once(':').map_or(mount, |(name, _)| name);
    (!identifier.is_empty()).then_some(identifier)
}

/// Recompute `network_peers` and `volume_peers` for every node in the set.
pub(super) fn index_relationships(nodes: &mut BTreeMap<String, ServiceNode>) {
    let networks = group_members(nodes, |node| {
        node.networks.iter().map(String::as_str).collect()
    });
    let volumes = group_members(nodes, |node| {
        node.volumes
            .iter()
            .filter_map(|mount| volume_identifier(mount))
            .collect()
    });

    for node in nodes.values_mut() {
        node.network_peers = node
            .networks
            .iter()
            .filter_map(|network| {
                networks
                    .get(network)
                    .map(|members| (network.clone(), members.clone()))
            })
            .collect();

        node.volume_peers = node
            .volumes
            .iter()
            .filter_map(|mount| volume_identifier(mount))
            .filter_map(|identifier| {
                volumes
                    .get(identifier)
                    .map(|members| (identifier.to_string(), members.clone()))
            })
            .collect();
    }

    tracing::debug!(
        networks = networks.len(),
        volumes = volumes.len(),
        "Indexed shared networks and volumes"
    );
}

/// Group node names under every key `keys` yields for them.
///
/// Nodes are visited in name order, so member lists come out sorted and a node
/// listing the same key twice still appears once.
fn group_members<F>(nodes: &BTreeMap<String, ServiceNode>, keys: F) -> BTreeMap<String, Vec<String>>
where
    F: for<'a> Fn(&'a ServiceNode) -> Vec<&'a str>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, node) in nodes {
        for key in keys(node) {
            let members = groups.entry(key.to_string()).or_default();
            if members.last() != Some(name) {
                members.push(name.clone());
            }
        }
    }
    groups
}
