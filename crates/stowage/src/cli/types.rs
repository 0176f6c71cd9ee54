//! CLI value enums.

use clap::ValueEnum;

/// Output format for the `graph` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormatArg {
    /// Indented text tree
    #[default]
    Tree,
    /// Graphviz DOT description
    Dot,
    /// The structured graph as JSON
    Json,
}

impl std::fmt::Display for GraphFormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Dot => write!(f, "dot"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_format_display_matches_value_names() {
        for format in GraphFormatArg::value_variants() {
            let value = format
                .to_possible_value()
                .expect("no variant is skipped");
            assert_eq!(format.to_string(), value.get_name());
        }
    }
}
