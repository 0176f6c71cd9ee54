//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::{Context, Result};

use super::args::{CyclesArgs, GraphArgs, OrderArgs, ShowArgs};
use super::types::GraphFormatArg;
use crate::app::App;
use crate::graph::ServiceGraph;
use crate::output::color::{Glyphs, success, warning};
use crate::output::{self, OutputConfig, OutputMode};

/// Execute the graph command
pub async fn execute_graph(app: &App, args: &GraphArgs, output_mode: OutputMode) -> Result<()> {
    let mut graph = app.graph()?;
    tracing::debug!(
        project = %app.project_name(),
        files = app.compose_files().len(),
        services = graph.len(),
        "Rendering dependency graph"
    );
    if let Some(service) = &args.service {
        graph = graph.filter_by_service(service, args.depth)?;
    }

    if graph.has_cycles() {
        warn_about_cycles(&graph);
    }

    let format = match output_mode {
        OutputMode::Json => GraphFormatArg::Json,
        OutputMode::Text => args.format,
    };

    // Files never get ANSI escapes.
    let mut config = OutputConfig::from_env();
    if args.output.is_some() {
        config.use_colors = false;
    }

    let rendered = match format {
        GraphFormatArg::Tree => output::render_tree(&graph, &args.tree_options(), &config),
        GraphFormatArg::Dot => output::render_dot(&graph, &args.dot_options()),
        GraphFormatArg::Json => serde_json::to_string_pretty(&graph)?,
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("failed to write graph to {}", path.display()))?;
            tracing::info!(path = %path.display(), %format, "Wrote dependency graph");
            if output_mode == OutputMode::Json {
                output::print_json(&serde_json::json!({
                    "output": path.display().to_string(),
                    "format": format.to_string(),
                    "services": graph.len(),
                }))?;
            } else {
                eprintln!("Graph exported to {}", path.display());
            }
        }
        None => output::print_text(&rendered)?,
    }

    Ok(())
}

/// Report cycles on stderr so they never end up in rendered output.
fn warn_about_cycles(graph: &ServiceGraph) {
    let config = OutputConfig::from_env();
    let glyphs = Glyphs::for_config(&config);
    tracing::warn!(cycles = graph.cycles().len(), "Circular dependencies detected");

    eprintln!(
        "{}",
        warning(
            &format!("{} Circular dependencies detected:", glyphs.alert),
            &config
        )
    );
    let separator = format!(" {} ", glyphs.arrow);
    for cycle in graph.cycles() {
        eprintln!("    {}", cycle.names().join(&separator));
    }
    eprintln!();
}

/// Execute the order command
pub fn execute_order(app: &App, args: &OrderArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph()?;
    let mut order = graph.dependency_order()?;
    if args.reverse {
        order.reverse();
    }

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "order": order,
                "reverse": args.reverse,
            }))?;
        }
        OutputMode::Text => {
            for (position, name) in order.iter().enumerate() {
                println!("{:>3}. {name}", position + 1);
            }
        }
    }

    Ok(())
}

/// Execute the cycles command
pub fn execute_cycles(app: &App, _args: &CyclesArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph()?;
    let config = OutputConfig::from_env();

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "count": graph.cycles().len(),
                "cycles": graph.cycles(),
            }))?;
        }
        OutputMode::Text if !graph.has_cycles() => {
            output::print_message(&success("No circular dependencies found.", &config))?;
        }
        OutputMode::Text => {
            let glyphs = Glyphs::for_config(&config);
            let separator = format!(" {} ", glyphs.arrow);
            let count = graph.cycles().len();
            let heading = format!(
                "Found {count} circular dependenc{}:",
                if count == 1 { "y" } else { "ies" }
            );
            output::print_message(&warning(&heading, &config))?;
            for cycle in graph.cycles() {
                println!("  {}", cycle.names().join(&separator));
            }
        }
    }

    Ok(())
}

/// Execute the show command
pub fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph()?;

    match output_mode {
        OutputMode::Json => {
            let node = graph.require(&args.service)?;
            let transitive: Vec<_> = graph
                .transitive_dependencies(&args.service)?
                .into_iter()
                .map(|(name, depth)| serde_json::json!({ "name": name, "depth": depth }))
                .collect();
            output::print_json(&serde_json::json!({
                "service": node,
                "in_cycle": graph.is_in_cycle(&args.service),
                "transitive_dependencies": transitive,
                "highlights": graph.highlights(&args.service)?,
            }))?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let details = output::render_service_details(&graph, &args.service, &config)?;
            output::print_text(&details)?;
        }
    }

    Ok(())
}
