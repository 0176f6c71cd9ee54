//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:        green   (health checks, clean results)
//!   - Warning:        yellow  (cycle warnings)
//!   - Error:          red     (cycle members, failures)
//!   - Info/Reference: cyan    (service names, root marker)
//!   - Accent:         magenta (networks and volumes)
//!   - Muted:          dimmed  (field labels, connectors, back-references)
//!   - Emphasis:       bold    (section headers)

use colored::Colorize;

use super::OutputConfig;
use crate::graph::Highlight;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Colorize a service name (cyan).
pub(crate) fn colorize_name(name: &str, config: &OutputConfig) -> String {
    info(name, config)
}

/// Colorize a network name or volume mount (magenta).
pub(crate) fn accent(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.magenta().to_string()
}

/// Apply dimmed style to text (for labels and connectors).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Colorize a service name by how it relates to the selected service.
pub(crate) fn colorize_highlight(name: &str, highlight: Highlight, config: &OutputConfig) -> String {
    if !config.use_colors {
        return name.to_string();
    }
    match highlight {
        Highlight::Selected => name.cyan().bold().to_string(),
        Highlight::Dependency => name.blue().to_string(),
        Highlight::Dependent => name.yellow().to_string(),
        Highlight::NetworkPeer => name.magenta().to_string(),
        Highlight::VolumePeer => name.green().to_string(),
    }
}

/// Glyph set for tree and detail output, with ASCII fallback.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Glyphs {
    pub branch: &'static str,
    pub corner: &'static str,
    pub pipe: &'static str,
    pub space: &'static str,
    pub service: &'static str,
    pub health: &'static str,
    pub network: &'static str,
    pub volume: &'static str,
    pub bullet: &'static str,
    pub arrow: &'static str,
    pub alert: &'static str,
}

impl Glyphs {
    pub(crate) fn for_config(config: &OutputConfig) -> Self {
        if config.use_ascii {
            Self {
                branch: "|-- ",
                corner: "`-- ",
                pipe: "|   ",
                space: "    ",
                service: "*",
                health: "+",
                network: "[net]",
                volume: "[vol]",
                bullet: "-",
                arrow: "->",
                alert: "!!",
            }
        } else {
            Self {
                branch: "├── ",
                corner: "└── ",
                pipe: "│   ",
                space: "    ",
                service: "◆",
                health: "⚡",
                network: "🌐",
                volume: "💾",
                bullet: "•",
                arrow: "→",
                alert: "⚠️ ",
            }
        }
    }
}
