//! `wa-list` command
//!
//! Lists the groups of the connected WhatsApp account and saves them so the
//! per-language recipient lists can be assembled from the dump.

use crate::settings::AppConfig;
use anyhow::{anyhow, Context, Result};
use herald_channels::{BroadcastChannel, GroupSummary, WhatsAppSession};
use herald_core::{retry_with_fixed_delay, TokioDelay};
use std::path::Path;
use std::process::ExitCode;

pub async fn run(config: &AppConfig) -> Result<ExitCode> {
    let session = WhatsAppSession::connect(config.whatsapp.clone())
        .await
        .context("Failed to connect to WhatsApp")?;

    println!("📋 Fetching WhatsApp groups...");

    // The group list is often incomplete right after the session comes up
    let groups = retry_with_fixed_delay(&config.retry, &TokioDelay, || session.list_groups())
        .await
        .map_err(|e| {
            anyhow!(
                "Failed to fetch groups after {} attempts: {}",
                e.attempts,
                e.last_error
            )
        })?;

    println!("\n📱 Found {} groups:\n", groups.len());
    for (index, group) in groups.iter().enumerate() {
        println!("{}. {}", index + 1, group.name);
        println!("   ID: {}", group.id);
    }

    save_groups(&config.group_dump_path, &groups)?;
    println!("\n💾 Group list saved to {}", config.group_dump_path.display());

    Ok(ExitCode::SUCCESS)
}

fn save_groups(path: &Path, groups: &[GroupSummary]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(groups).context("Failed to serialize groups")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
