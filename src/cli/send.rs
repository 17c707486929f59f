//! Send commands
//!
//! Resolves the bundle, brings up the channels the command needs and hands
//! everything to the broadcaster.

use crate::settings::AppConfig;
use anyhow::{Context, Result};
use herald_channels::{BroadcastChannel, ChannelKind, TelegramAdapter, WhatsAppSession};
use herald_core::{
    BroadcastReport, Broadcaster, CleanupOutcome, CleanupPolicy, ContentResolver,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Run a broadcast over `channels`
pub async fn run(config: &AppConfig, channels: &[ChannelKind], policy: CleanupPolicy) -> Result<ExitCode> {
    let resolver = ContentResolver::new(&config.content);
    let Some(bundle) = resolver
        .resolve()
        .context("Failed to read the content queue")?
    else {
        println!("📭 Queue is empty - nothing to send");
        println!("   Add a numbered folder under {}", resolver.queue_root().display());
        return Ok(ExitCode::SUCCESS);
    };

    println!("📦 Sending {}", bundle.describe());

    let mut broadcaster = Broadcaster::new(config.languages.clone(), config.pacing.clone())
        .with_cleanup_policy(policy);

    if channels.iter().any(|kind| *kind != ChannelKind::Telegram) {
        info!(bridge = %config.whatsapp.bridge_url, "Connecting to WhatsApp");
        let session = WhatsAppSession::connect(config.whatsapp.clone())
            .await
            .context("Failed to connect to WhatsApp")?;
        let session: Arc<dyn BroadcastChannel> = Arc::new(session);
        for kind in channels.iter().filter(|k| **k != ChannelKind::Telegram) {
            broadcaster = broadcaster.with_channel(*kind, session.clone());
        }
    }

    if channels.contains(&ChannelKind::Telegram) {
        broadcaster = match TelegramAdapter::new(&config.telegram()) {
            Ok(adapter) => broadcaster.with_channel(ChannelKind::Telegram, Arc::new(adapter)),
            Err(e) => {
                warn!(error = %e, "Telegram not configured - skipping");
                broadcaster.with_unavailable(ChannelKind::Telegram)
            }
        };
    }

    let report = broadcaster.run(&bundle).await;
    print_report(&report);

    Ok(if report.delivered() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_report(report: &BroadcastReport) {
    println!();
    println!("📊 Broadcast summary (run {})", report.run_id);

    for channel in &report.channels {
        if !channel.validation_errors.is_empty() {
            println!("  ❌ {}: not sent", channel.kind);
            for error in &channel.validation_errors {
                println!("     - {}", error);
            }
            continue;
        }
        let mark = if channel.succeeded() { "✅" } else { "⚠️ " };
        println!("  {} {}", mark, channel.kind);
        for lang in &channel.languages {
            if lang.skipped {
                println!("     {}: skipped (no recipient list)", lang.language);
                continue;
            }
            println!("     {}: {}", lang.language, lang.outcome);
            for failure in &lang.outcome.failures {
                println!("       ✗ {}: {}", failure.recipient, failure.error);
            }
        }
    }

    for kind in &report.skipped {
        println!("  ⏭️  {}: not configured", kind);
    }

    match &report.cleanup {
        CleanupOutcome::Cleaned(cleanup) if cleanup.slot_removed => {
            println!("🗑️  Queue folder deleted");
        }
        CleanupOutcome::Cleaned(cleanup) => {
            println!(
                "🗑️  Deleted {} image(s), cleared {} message file(s)",
                cleanup.removed.len(),
                cleanup.truncated.len()
            );
        }
        CleanupOutcome::Kept(reason) => println!("📁 Content kept: {}", reason),
        CleanupOutcome::Failed(message) => {
            println!("❗ Content was sent but could not be deleted");
            println!("{}", message);
        }
    }

    let elapsed = report.finished_at - report.started_at;
    println!("⏱️  Finished in {}s", elapsed.num_seconds());
}
