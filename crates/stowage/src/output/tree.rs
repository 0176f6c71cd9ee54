//! Indented tree rendering for `stowage graph --format tree`.
//!
//! ```text
//! Dependency Graph
//! ================ ...
//!
//! ◆ db ⚡
//! └── 🌐 network: backend (shared with: api)
//! ◆ api
//! ├── ◆ db (see above)
//! └── 🌐 network: backend (shared with: db)
//! ```
//!
//! Roots are services with no dependencies. Each is expanded depth-first
//! through its `depends_on` children; every service the root walk never
//! reached is then listed as its own top-level entry. Dependencies hang
//! directly under their dependent, with no `depends_on:` label line.

use std::collections::HashSet;

use super::OutputConfig;
use super::color::{Glyphs, accent, bold, colorize_name, dimmed, success, warning};
use crate::graph::{ServiceGraph, ServiceNode};

/// Recursion below this depth is cut off.
pub const MAX_TREE_DEPTH: usize = 20;

const HEADER_WIDTH: usize = 80;

/// What to include besides `depends_on` children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Draw one leaf per attached network.
    pub show_networks: bool,
    /// Draw one leaf per mount.
    pub show_volumes: bool,
    /// Mark services that declare a health check.
    pub show_health_checks: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_networks: true,
            show_volumes: true,
            show_health_checks: true,
        }
    }
}

/// Render `graph` as an indented text tree.
pub fn render_tree(graph: &ServiceGraph, options: &TreeOptions, config: &OutputConfig) -> String {
    let mut renderer = TreeRenderer {
        graph,
        options,
        config,
        glyphs: Glyphs::for_config(config),
        visited: HashSet::new(),
        out: String::new(),
    };
    renderer.render();
    renderer.out
}

struct TreeRenderer<'a> {
    graph: &'a ServiceGraph,
    options: &'a TreeOptions,
    config: &'a OutputConfig,
    glyphs: Glyphs,
    visited: HashSet<&'a str>,
    out: String,
}

impl<'a> TreeRenderer<'a> {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn render(&mut self) {
        let title = bold("Dependency Graph", self.config);
        self.line(&title);
        self.line(&"=".repeat(HEADER_WIDTH));
        self.line("");

        let graph = self.graph;
        for root in graph.root_services() {
            self.service(root, "", true, 0);
        }

        // Everything the root walk missed gets its own entry, even if an
        // earlier entry in this pass reaches it.
        let unreached: Vec<&str> = graph
            .names()
            .filter(|name| !self.visited.contains(name))
            .collect();
        for name in unreached {
            self.service(name, "", true, 0);
        }

        if graph.has_cycles() {
            self.line("");
            let heading = format!("{} Circular Dependencies Detected:", self.glyphs.alert);
            let heading = warning(&heading, self.config);
            self.line(&heading);
            let separator = format!(" {} ", self.glyphs.arrow);
            for cycle in graph.cycles() {
                let joined = cycle.names().join(&separator);
                self.line(&format!("    {joined}"));
            }
        }
    }

    fn connector(&self, is_last: bool) -> String {
        let connector = if is_last {
            self.glyphs.corner
        } else {
            self.glyphs.branch
        };
        dimmed(connector, self.config)
    }

    fn service(&mut self, name: &'a str, prefix: &str, is_last: bool, depth: usize) {
        if depth > MAX_TREE_DEPTH {
            tracing::trace!(service = name, depth, "Tree depth limit reached");
            return;
        }
        let Some(node) = self.graph.service(name) else {
            return;
        };

        let lead = if depth == 0 {
            String::new()
        } else {
            format!("{prefix}{}", self.connector(is_last))
        };
        let icon = self.glyphs.service;
        let label = colorize_name(name, self.config);

        if depth > 0 && self.visited.contains(name) {
            let reference = dimmed("(see above)", self.config);
            self.line(&format!("{lead}{icon} {label} {reference}"));
            return;
        }
        self.visited.insert(name);

        let health = if self.options.show_health_checks && node.has_health_check() {
            format!(" {}", success(self.glyphs.health, self.config))
        } else {
            String::new()
        };
        self.line(&format!("{lead}{icon} {label}{health}"));

        let child_prefix = match (depth, is_last) {
            (0, _) => String::new(),
            (_, true) => format!("{prefix}{}", self.glyphs.space),
            (_, false) => format!("{prefix}{}", dimmed(self.glyphs.pipe, self.config)),
        };
        self.children(node, &child_prefix, depth);
    }

    fn children(&mut self, node: &'a ServiceNode, prefix: &str, depth: usize) {
        let networks: &[String] = if self.options.show_networks {
            node.networks()
        } else {
            &[]
        };
        let volumes: &[String] = if self.options.show_volumes {
            node.volumes()
        } else {
            &[]
        };

        let total = node.depends_on().len() + networks.len() + volumes.len();
        let mut position = 0;
        let mut next_is_last = || {
            position += 1;
            position == total
        };

        for dependency in node.depends_on() {
            let is_last = next_is_last();
            self.service(dependency, prefix, is_last, depth + 1);
        }

        for network in networks {
            let is_last = next_is_last();
            let shared = shared_suffix(&node.shared_network_with(network));
            let line = format!(
                "{prefix}{}{} network: {}{shared}",
                self.connector(is_last),
                self.glyphs.network,
                accent(network, self.config),
            );
            self.line(&line);
        }

        for mount in volumes {
            let is_last = next_is_last();
            let shared = shared_suffix(&node.shared_volume_with(mount));
            let line = format!(
                "{prefix}{}{} volume: {}{shared}",
                self.connector(is_last),
                self.glyphs.volume,
                accent(mount, self.config),
            );
            self.line(&line);
        }
    }
}

fn shared_suffix(peers: &[&str]) -> String {
    if peers.is_empty() {
        String::new()
    } else {
        format!(" (shared with: {})", peers.join(", "))
    }
}
