//! Output formatting for CLI commands.
//!
//! Renderers produce plain `String`s and never fail; the CLI decides where
//! the text goes.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers
//! - [`tree`]: Indented dependency tree
//! - [`dot`]: Graphviz DOT description
//! - [`details`]: Single-service detail view

pub mod color;
pub mod details;
pub mod dot;
pub mod tree;

use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use details::render_service_details;
pub use dot::{DotOptions, render_dot};
pub use tree::{TreeOptions, render_tree};

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only glyphs instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Plain Unicode output with no ANSI codes, for files and tests.
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `STOWAGE_ASCII`: Set to "1" or "true" for ASCII-only glyphs (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `STOWAGE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_ascii = match lookup("STOWAGE_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "STOWAGE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // Respect NO_COLOR (https://no-color.org/); STOWAGE_COLOR is the explicit switch.
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("STOWAGE_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Printing
// ============================================================================

/// Print pre-rendered text to stdout, adding a trailing newline if missing.
pub fn print_text(text: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_text(&mut handle, text)
}

fn write_text<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    w.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{json}")
}
