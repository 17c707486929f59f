//! Herald - Multilingual broadcast orchestrator
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herald=info,herald_core=info,herald_channels=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();

    if cli.command.is_some() {
        debug!("Starting Herald v{}", env!("CARGO_PKG_VERSION"));

        if !std::path::Path::new(".env").exists() {
            warn!(".env file not found; relying on config files and environment");
        }
    }

    cli::run(cli).await
}
