//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for stowage using clap's derive API.
//!
//! # Commands
//!
//! - `graph`: Render the dependency graph as a tree, DOT, or JSON
//! - `order`: Print the topological order
//! - `cycles`: List circular dependencies
//! - `show`: Show one service and everything related to it
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `-f/--file`: Compose file(s) to load instead of the project configuration
//!
//! # Example
//!
//! ```bash
//! stowage graph
//! stowage graph --format dot --output deps.dot
//! stowage -f docker-compose.yml -f docker-compose.dev.yml graph --service api --depth 1
//! stowage order --reverse
//! stowage --json show api
//! ```

mod args;
mod execute;
mod types;
mod validators;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// Re-export argument structs
pub use args::{CyclesArgs, GraphArgs, OrderArgs, ShowArgs};

// Re-export types
pub use types::GraphFormatArg;

// Re-export validators for external use
pub use validators::validate_service_name;

/// Stowage - dependency graphs for multi-service compose projects
///
/// Reads compose files (from `-f` or `.stowage.yaml`) and analyzes how the
/// services depend on each other, which networks and volumes they share, and
/// whether any dependencies are circular.
#[derive(Parser, Debug)]
#[command(name = "stowage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Compose file to load (repeat to layer overrides)
    #[arg(short = 'f', long = "file", global = true)]
    pub files: Vec<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the dependency graph
    ///
    /// Draws every service with its dependencies, shared networks, and
    /// volumes. Use `--service` and `--depth` to focus on one service.
    Graph(GraphArgs),

    /// Print services in dependency order
    ///
    /// Dependents come first by default; `--reverse` prints the order in
    /// which services can be started. Fails when dependencies are circular.
    Order(OrderArgs),

    /// List circular dependencies
    Cycles(CyclesArgs),

    /// Show detailed information about a service
    ///
    /// Displays the image or build, dependencies in both directions,
    /// networks, volumes, ports, health check, and related services.
    Show(ShowArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Stowage compose dependency analyzer");
            println!("Use --help for more information");
            return Ok(());
        };

        let app = App::from_directory(&std::env::current_dir()?, &self.files).await?;
        match command {
            Commands::Graph(args) => execute::execute_graph(&app, args, output_mode).await,
            Commands::Order(args) => execute::execute_order(&app, args, output_mode),
            Commands::Cycles(args) => execute::execute_cycles(&app, args, output_mode),
            Commands::Show(args) => execute::execute_show(&app, args, output_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["stowage"]).expect("should parse");
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert!(cli.files.is_empty());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stowage", "cycles", "--json", "-f", "a.yml"])
            .expect("should parse");
        assert!(cli.json);
        assert_eq!(cli.files, vec![PathBuf::from("a.yml")]);
        assert!(matches!(cli.command, Some(Commands::Cycles(_))));
    }

    #[test]
    fn test_parse_repeated_files_keep_order() {
        let cli = Cli::try_parse_from(["stowage", "-f", "base.yml", "--file", "dev.yml", "order"])
            .expect("should parse");
        assert_eq!(
            cli.files,
            vec![PathBuf::from("base.yml"), PathBuf::from("dev.yml")]
        );
    }

    #[test]
    fn test_parse_graph_defaults() {
        let cli = Cli::try_parse_from(["stowage", "graph"]).expect("should parse");
        match cli.command {
            Some(Commands::Graph(args)) => {
                assert_eq!(args.format, GraphFormatArg::Tree);
                assert!(args.service.is_none());
                assert!(args.depth.is_none());
                assert!(args.output.is_none());
                assert_eq!(args.tree_options(), crate::output::TreeOptions::default());
            }
            _ => panic!("Expected Graph command"),
        }
    }

    #[test]
    fn test_parse_graph_all_flags() {
        let cli = Cli::try_parse_from([
            "stowage",
            "graph",
            "--format",
            "dot",
            "--service",
            "api",
            "--depth",
            "2",
            "--output",
            "deps.dot",
            "--no-networks",
            "--no-volumes",
            "--no-health",
            "--no-highlight-cycles",
        ])
        .expect("should parse");
        match cli.command {
            Some(Commands::Graph(args)) => {
                assert_eq!(args.format, GraphFormatArg::Dot);
                assert_eq!(args.service.as_deref(), Some("api"));
                assert_eq!(args.depth, Some(2));
                assert_eq!(args.output, Some(PathBuf::from("deps.dot")));
                let dot = args.dot_options();
                assert!(!dot.show_networks);
                assert!(!dot.show_volumes);
                assert!(!dot.show_health_checks);
                assert!(!dot.highlight_cycles);
            }
            _ => panic!("Expected Graph command"),
        }
    }

    #[test]
    fn test_parse_graph_depth_requires_service() {
        let result = Cli::try_parse_from(["stowage", "graph", "--depth", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_graph_rejects_unknown_format() {
        let result = Cli::try_parse_from(["stowage", "graph", "--format", "svg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_show_validates_name() {
        let cli = Cli::try_parse_from(["stowage", "show", "api"]).expect("should parse");
        assert!(matches!(cli.command, Some(Commands::Show(args)) if args.service == "api"));

        let result = Cli::try_parse_from(["stowage", "show", "bad name"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_order_reverse() {
        let cli = Cli::try_parse_from(["stowage", "order", "-r"]).expect("should parse");
        assert!(matches!(cli.command, Some(Commands::Order(args)) if args.reverse));
    }
}
