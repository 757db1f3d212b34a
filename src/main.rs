//! bootval - Main Entry Point
//!
//! Bootstrap optimism-corrected validation of binary outcome models.

use bootval::cli::{cmd_validate, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bootval=info".into()),
        )
        .init();

    let cli = Cli::parse();
    cmd_validate(&cli)?;

    Ok(())
}
