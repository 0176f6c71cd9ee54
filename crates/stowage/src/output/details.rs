//! Detail view for `stowage show <service>`.

use stowage_compose::HealthCheck;

use super::OutputConfig;
use super::color::{
    Glyphs, accent, bold, colorize_highlight, colorize_name, dimmed, error, success,
};
use crate::error::Result;
use crate::graph::{Highlight, ServiceGraph, ServiceNode};

/// Render everything known about one service.
///
/// Sections with nothing to show are left out. The trailing "Related"
/// section lists every service the selected one is connected to, classified
/// the way [`ServiceGraph::highlights`] does.
///
/// # Errors
///
/// Returns [`crate::Error::ServiceNotFound`] if `name` is not in the graph.
pub fn render_service_details(graph: &ServiceGraph, name: &str, config: &OutputConfig) -> Result<String> {
    let node = graph.require(name)?;
    let highlights = graph.highlights(name)?;
    let transitive = graph.transitive_dependencies(name)?;
    let glyphs = Glyphs::for_config(config);

    let mut out = Details::default();
    out.line(bold(&format!("Service: {}", node.name()), config));
    out.blank();

    write_source(&mut out, node, config);

    out.list(
        "Dependencies",
        node.depends_on().iter().map(|d| colorize_name(d, config)),
        glyphs.bullet,
        config,
    );
    out.list(
        "Required By",
        node.depended_by().iter().map(|d| colorize_name(d, config)),
        glyphs.bullet,
        config,
    );

    let indirect: Vec<String> = transitive
        .iter()
        .filter(|(_, depth)| *depth > 1)
        .map(|(dep, depth)| format!("{} {}", colorize_name(dep, config), dimmed(&format!("(depth {depth})"), config)))
        .collect();
    out.list("Indirect Dependencies", indirect, glyphs.bullet, config);

    out.list(
        "Networks",
        node.networks().iter().map(|network| {
            let peers = node.shared_network_with(network);
            let mut line = accent(network, config);
            if !peers.is_empty() {
                line.push_str(&format!(" (shared with: {})", peers.join(", ")));
            }
            line
        }),
        glyphs.network,
        config,
    );
    out.list(
        "Volumes",
        node.volumes().iter().map(|mount| {
            let peers = node.shared_volume_with(mount);
            let mut line = accent(mount, config);
            if !peers.is_empty() {
                line.push_str(&format!(" (shared with: {})", peers.join(", ")));
            }
            line
        }),
        glyphs.volume,
        config,
    );
    out.list("Ports", node.definition().ports.iter().cloned(), glyphs.bullet, config);

    if let Some(health_check) = node.health_check() {
        write_health_check(&mut out, health_check, &glyphs, config);
    }

    if graph.is_in_cycle(name) {
        let cycles = graph
            .cycles()
            .iter()
            .filter(|cycle| cycle.contains(name))
            .map(|cycle| error(&cycle.names().join(&format!(" {} ", glyphs.arrow)), config));
        out.list("Circular Dependencies", cycles, glyphs.alert.trim_end(), config);
    }

    out.list(
        "Related",
        highlights
            .iter()
            .filter(|(_, highlight)| **highlight != Highlight::Selected)
            .map(|(peer, highlight)| {
                format!(
                    "{} {}",
                    colorize_highlight(peer, *highlight, config),
                    dimmed(&format!("({highlight})"), config)
                )
            }),
        glyphs.bullet,
        config,
    );

    Ok(out.finish())
}

fn write_source(out: &mut Details, node: &ServiceNode, config: &OutputConfig) {
    let definition = node.definition();
    if let Some(image) = &definition.image {
        out.line(format!("{} {image}", dimmed("Image:", config)));
        out.blank();
    } else if let Some(build) = &definition.build {
        out.line(format!("{} {}", dimmed("Build Context:", config), build.context));
        if let Some(dockerfile) = &build.dockerfile {
            out.line(format!("{} {dockerfile}", dimmed("Dockerfile:", config)));
        }
        out.blank();
    }
}

fn write_health_check(out: &mut Details, health_check: &HealthCheck, glyphs: &Glyphs, config: &OutputConfig) {
    let heading = format!("{} Health Check:", glyphs.health);
    out.line(success(&heading, config));
    if !health_check.test.is_empty() {
        out.line(format!("  {} {}", dimmed("Test:", config), health_check.test.join(" ")));
    }
    if let Some(interval) = &health_check.interval {
        out.line(format!("  {} {interval}", dimmed("Interval:", config)));
    }
    if let Some(timeout) = &health_check.timeout {
        out.line(format!("  {} {timeout}", dimmed("Timeout:", config)));
    }
    if let Some(retries) = health_check.retries {
        out.line(format!("  {} {retries}", dimmed("Retries:", config)));
    }
    out.blank();
}

#[derive(Default)]
struct Details {
    text: String,
}

impl Details {
    fn line(&mut self, text: impl AsRef<str>) {
        self.text.push_str(text.as_ref());
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    /// A titled section with one marked entry per item, skipped when empty.
    fn list<I, S>(&mut self, title: &str, items: I, marker: &str, config: &OutputConfig)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return;
        }
        self.line(bold(&format!("{title}:"), config));
        for item in items {
            self.line(format!("  {marker} {}", item.as_ref()));
        }
        self.blank();
    }

    fn finish(mut self) -> String {
        while self.text.ends_with("\n\n") {
            self.text.pop();
        }
        self.text
    }
}
