//! Graphviz DOT rendering for `stowage graph --format dot`.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::graph::ServiceGraph;

/// Which decorations to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotOptions {
    /// Group services sharing a network into dashed clusters.
    pub show_networks: bool,
    /// Connect services mounting the same volume with dotted edges.
    pub show_volumes: bool,
    /// Emphasize services that declare a health check.
    pub show_health_checks: bool,
    /// Paint cycle members and cycle edges red.
    pub highlight_cycles: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            show_networks: true,
            show_volumes: false,
            show_health_checks: true,
            highlight_cycles: true,
        }
    }
}

/// Render `graph` as a `digraph` description.
///
/// Node and edge statements come out in service name order. Cycle styling
/// wins over health check styling on the same node.
pub fn render_dot(graph: &ServiceGraph, options: &DotOptions) -> String {
    let mut out = String::new();
    out.push_str("digraph dependencies {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=rounded];\n\n");

    out.push_str("  // Nodes\n");
    for node in graph.services().values() {
        let name = escape(node.name());
        let healthy = options.show_health_checks && node.has_health_check();

        let mut attrs: Vec<&str> = Vec::new();
        if options.highlight_cycles && graph.is_in_cycle(node.name()) {
            attrs.extend(["color=red", "penwidth=3"]);
        } else if healthy {
            attrs.extend(["color=green", "penwidth=2"]);
        }

        let mut label = name.clone();
        if healthy {
            label.push_str("\\n⚡HealthCheck");
        }
        let label = format!("label=\"{label}\"");
        attrs.push(&label);

        line(&mut out, format_args!("  \"{name}\" [{}];", attrs.join(", ")));
    }

    out.push_str("\n  // Dependencies\n");
    for node in graph.services().values() {
        for dependency in node.depends_on() {
            let style = if options.highlight_cycles && graph.is_cycle_edge(node.name(), dependency) {
                "[color=red, penwidth=2, label=\"CYCLE\"]"
            } else {
                "[color=blue]"
            };
            line(
                &mut out,
                format_args!(
                    "  \"{}\" -> \"{}\" {style};",
                    escape(node.name()),
                    escape(dependency)
                ),
            );
        }
    }

    if options.show_networks {
        let clusters: Vec<_> = groups(graph, Group::Network)
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .collect();
        if !clusters.is_empty() {
            out.push_str("\n  // Network relationships\n");
            let mut used = HashSet::new();
            for (network, members) in clusters {
                let id = unique_cluster_id(network, &mut used);
                line(&mut out, format_args!("  subgraph cluster_{id} {{"));
                line(&mut out, format_args!("    label=\"Network: {}\";", escape(network)));
                out.push_str("    style=dashed;\n");
                out.push_str("    color=gray;\n");
                for member in members {
                    line(&mut out, format_args!("    \"{}\";", escape(member)));
                }
                out.push_str("  }\n");
            }
        }
    }

    if options.show_volumes {
        let shared: Vec<_> = groups(graph, Group::Volume)
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .collect();
        if !shared.is_empty() {
            out.push_str("\n  // Shared volumes\n");
            for (volume, members) in shared {
                for (i, from) in members.iter().enumerate() {
                    for to in &members[i + 1..] {
                        line(
                            &mut out,
                            format_args!(
                                "  \"{}\" -> \"{}\" [style=dotted, dir=none, color=gray, label=\"{}\"];",
                                escape(from),
                                escape(to),
                                escape(volume)
                            ),
                        );
                    }
                }
            }
        }
    }

    out.push_str("}\n");
    out
}

#[derive(Clone, Copy)]
enum Group {
    Network,
    Volume,
}

/// Network name or volume identifier to its sorted member list.
fn groups(graph: &ServiceGraph, group: Group) -> BTreeMap<&str, &[String]> {
    let mut groups = BTreeMap::new();
    for node in graph.services().values() {
        let peers = match group {
            Group::Network => node.network_peers(),
            Group::Volume => node.volume_peers(),
        };
        for (key, members) in peers {
            groups.insert(key.as_str(), members.as_slice());
        }
    }
    groups
}

/// Make `name` safe as part of a DOT identifier.
fn cluster_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Sanitized cluster id for `name`, suffixed with `_2`, `_3`, ... when a
/// different network already sanitized to the same text.
fn unique_cluster_id(name: &str, used: &mut HashSet<String>) -> String {
    let base = cluster_id(name);
    let mut candidate = base.clone();
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        n += 1;
        candidate = format!("{base}_{n}");
    }
    candidate
}

/// Append one formatted line.
fn line(out: &mut String, args: fmt::Arguments<'_>) {
    out.push_str(&args.to_string());
    out.push('\n');
}

/// Escape backslashes and double quotes for a quoted DOT string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
