//! Stowage CLI binary.

use anyhow::Result;
use stowage::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the stowage CLI.
///
/// Uses tokio's current_thread runtime; the only I/O is reading a handful
/// of config and compose files and optionally writing one output file.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered graphs on stdout stay clean.
    // Example: RUST_LOG=stowage=debug,stowage_compose=trace stowage graph
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stowage=info,stowage_compose=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting stowage CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Stowage CLI completed successfully");
    Ok(())
}
