//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use std::path::PathBuf;

use clap::Parser;

use super::types::GraphFormatArg;
use super::validators::validate_service_name;
use crate::output::{DotOptions, TreeOptions};

/// Arguments for the `graph` command
#[derive(Parser, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = GraphFormatArg::Tree)]
    pub format: GraphFormatArg,

    /// Only show the neighborhood of this service
    #[arg(short, long, value_parser = validate_service_name)]
    pub service: Option<String>,

    /// Maximum distance from `--service` (unlimited when omitted)
    #[arg(short, long, requires = "service")]
    pub depth: Option<usize>,

    /// Write the rendered graph to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hide network relationships
    #[arg(long)]
    pub no_networks: bool,

    /// Hide volume relationships
    #[arg(long)]
    pub no_volumes: bool,

    /// Hide health check markers
    #[arg(long)]
    pub no_health: bool,

    /// Do not color cycle members and cycle edges (DOT only)
    #[arg(long)]
    pub no_highlight_cycles: bool,
}

impl GraphArgs {
    /// Tree rendering options selected by the flags.
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            show_networks: !self.no_networks,
            show_volumes: !self.no_volumes,
            show_health_checks: !self.no_health,
        }
    }

    /// DOT rendering options selected by the flags.
    pub fn dot_options(&self) -> DotOptions {
        DotOptions {
            show_networks: !self.no_networks,
            show_volumes: !self.no_volumes,
            show_health_checks: !self.no_health,
            highlight_cycles: !self.no_highlight_cycles,
        }
    }
}

/// Arguments for the `order` command
#[derive(Parser, Debug, Clone, Default)]
pub struct OrderArgs {
    /// Print dependencies before their dependents (startup order)
    #[arg(short, long)]
    pub reverse: bool,
}

/// Arguments for the `cycles` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CyclesArgs {}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Service to describe
    #[arg(value_parser = validate_service_name)]
    pub service: String,
}
