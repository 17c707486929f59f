//! `queue-status` and `clean` commands

use crate::settings::AppConfig;
use anyhow::{Context, Result};
use herald_channels::ChannelKind;
use herald_core::{cleanup, format_error_for_cli, validate, ContentBundle, ContentResolver};
use std::process::ExitCode;

/// Show queue depth, every slot, and whether the active bundle is complete
pub fn status(config: &AppConfig) -> Result<ExitCode> {
    let resolver = ContentResolver::new(&config.content);

    if resolver.has_queue() {
        let slots = resolver.slots().context("Failed to read the content queue")?;
        println!("📦 Queue: {} bundle(s) in {}", slots.len(), resolver.queue_root().display());
        for (index, slot) in slots.iter().enumerate() {
            let marker = if index == 0 { "▶" } else { " " };
            println!("  {} {:>4}  {}", marker, slot.number, slot.path.display());
        }
        if slots.is_empty() {
            println!("📭 Queue is empty - nothing to send");
            return Ok(ExitCode::SUCCESS);
        }
    } else {
        println!(
            "📂 No queue folder; sending from {}",
            config.content.work_dir.display()
        );
    }

    if let Some(bundle) = resolver.resolve().context("Failed to read the content queue")? {
        print_readiness(&bundle, config);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_readiness(bundle: &ContentBundle, config: &AppConfig) {
    // Status posts need only images and captions, so this never reads recipient lists
    let errors = validate(bundle, &config.languages, ChannelKind::WhatsAppStatus);
    if errors.is_empty() {
        println!("✅ Next bundle is complete ({})", bundle.describe());
        return;
    }
    println!("⚠️  Next bundle is incomplete ({}):", bundle.describe());
    for error in errors {
        println!("   - {}", error);
    }
}

/// Delete the active bundle without sending it
pub fn clean(config: &AppConfig) -> Result<ExitCode> {
    let resolver = ContentResolver::new(&config.content);
    let Some(bundle) = resolver.resolve().context("Failed to read the content queue")? else {
        println!("📭 Queue is empty - nothing to clean");
        return Ok(ExitCode::SUCCESS);
    };

    match cleanup(&bundle, &config.languages) {
        Ok(report) if report.slot_removed => {
            println!("🗑️  Deleted {}", bundle.describe());
            Ok(ExitCode::SUCCESS)
        }
        Ok(report) => {
            println!(
                "🗑️  Deleted {} image(s), cleared {} message file(s)",
                report.removed.len(),
                report.truncated.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", format_error_for_cli(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::ContentConfig;
    use std::fs;

    fn config_for(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            content: ContentConfig {
                work_dir: dir.to_path_buf(),
                queue_dir: "queue".into(),
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_clean_removes_lowest_slot_only() {
        let dir = tempfile::tempdir().unwrap();
        for slot in ["2", "8"] {
            let path = dir.path().join("queue").join(slot);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("e.jpg"), "img").unwrap();
        }

        let code = clean(&config_for(dir.path())).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!dir.path().join("queue").join("2").exists());
        assert!(dir.path().join("queue").join("8").exists());
    }

    #[test]
    fn test_clean_empty_queue_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("queue")).unwrap();

        assert_eq!(clean(&config_for(dir.path())).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_status_without_queue_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(status(&config_for(dir.path())).unwrap(), ExitCode::SUCCESS);
    }
}
