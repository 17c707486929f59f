//! CLI module for Herald
//!
//! Provides the broadcast commands:
//! - `send-all`: status, groups and Telegram, then clean up on full success
//! - `send-wa` / `send-telegram` / `send-wa-status`: one channel, no cleanup
//! - `wa-list`: list WhatsApp groups and save them for recipient lists
//! - `queue-status`: show the queue and the active bundle
//! - `clean`: delete the active bundle by hand

use crate::settings::{load_config, AppConfig};
use clap::{Parser, Subcommand};
use herald_channels::ChannelKind;
use herald_core::{format_error_for_cli, CleanupPolicy};
use std::process::ExitCode;
use tracing::info;

pub mod queue;
pub mod send;
pub mod wa_list;

const SEND_ALL: &[ChannelKind] = &ChannelKind::ALL;
const SEND_WA: &[ChannelKind] = &[ChannelKind::WhatsAppGroups];
const SEND_TELEGRAM: &[ChannelKind] = &[ChannelKind::Telegram];
const SEND_WA_STATUS: &[ChannelKind] = &[ChannelKind::WhatsAppStatus];

/// Herald broadcast CLI
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Broadcast daily image + caption bundles to WhatsApp and Telegram")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Post status, send to WhatsApp groups and Telegram, then clean up
    SendAll,
    /// Send to WhatsApp groups only
    SendWa,
    /// Send to Telegram groups only
    SendTelegram,
    /// Post WhatsApp status only
    SendWaStatus,
    /// List WhatsApp groups and save them to the group dump file
    WaList,
    /// Show queued bundles and which one is next
    QueueStatus,
    /// Delete the active bundle (queue slot, or root images and captions)
    Clean,
}

impl Commands {
    /// Channels a send command runs, or `None` for other commands
    pub fn channels(&self) -> Option<&'static [ChannelKind]> {
        match self {
            Self::SendAll => Some(SEND_ALL),
            Self::SendWa => Some(SEND_WA),
            Self::SendTelegram => Some(SEND_TELEGRAM),
            Self::SendWaStatus => Some(SEND_WA_STATUS),
            Self::WaList | Self::QueueStatus | Self::Clean => None,
        }
    }

    /// Only the full broadcast may delete content
    pub fn cleanup_policy(&self) -> CleanupPolicy {
        match self {
            Self::SendAll => CleanupPolicy::OnFullSuccess,
            _ => CleanupPolicy::Never,
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    let config = load_config()?;
    if let Err(e) = config.validate() {
        eprintln!("{}", format_error_for_cli(&e));
        return Ok(ExitCode::FAILURE);
    }

    match command {
        Commands::WaList => wa_list::run(&config).await,
        Commands::QueueStatus => queue::status(&config),
        Commands::Clean => queue::clean(&config),
        send_command => run_send(&config, send_command).await,
    }
}

async fn run_send(config: &AppConfig, command: Commands) -> anyhow::Result<ExitCode> {
    let channels = command.channels().unwrap_or_default();
    let result = send::run(config, channels, command.cleanup_policy()).await;

    let grace = config.shutdown_grace();
    if !grace.is_zero() {
        info!(secs = grace.as_secs(), "Waiting before exit");
        tokio::time::sleep(grace).await;
    }

    result
}
