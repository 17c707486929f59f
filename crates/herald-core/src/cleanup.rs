//! Cleanup executor
//!
//! The only code allowed to delete bundle content. Queue slots are removed
//! outright; in root mode the images go and caption files are emptied so the
//! next run reports an empty caption rather than a missing one.

use crate::bundle::{find_images, ContentBundle};
use crate::error::{Error, Result};
use crate::settings::LanguageSpec;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// What cleanup did to the bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Files and directories removed
    pub removed: Vec<PathBuf>,
    /// Caption files truncated to empty content
    pub truncated: Vec<PathBuf>,
    /// Whether the slot directory itself was removed
    pub slot_removed: bool,
}

/// Delete a consumed bundle
///
/// Stops at the first failure and returns it; a failed cleanup is never
/// retried.
pub fn cleanup(bundle: &ContentBundle, languages: &[LanguageSpec]) -> Result<CleanupReport> {
    if bundle.is_queued {
        cleanup_slot(bundle)
    } else {
        cleanup_root(bundle, languages)
    }
}

fn cleanup_slot(bundle: &ContentBundle) -> Result<CleanupReport> {
    let dir = &bundle.source_path;
    let mut report = CleanupReport::default();

    info!(bundle = %bundle.describe(), "Deleting queue slot");

    let entries = fs::read_dir(dir).map_err(|e| Error::cleanup(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::cleanup(dir, e))?;
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| Error::cleanup(&path, e))?;
        report.removed.push(path);
    }

    fs::remove_dir(dir).map_err(|e| Error::cleanup(dir, e))?;
    report.removed.push(dir.clone());
    report.slot_removed = true;

    info!(files = report.removed.len() - 1, "Queue slot deleted");
    Ok(report)
}

fn cleanup_root(bundle: &ContentBundle, languages: &[LanguageSpec]) -> Result<CleanupReport> {
    let dir = &bundle.source_path;
    let mut report = CleanupReport::default();

    info!(bundle = %bundle.describe(), "Cleaning up sent content");

    for lang in languages {
        for image in find_images(dir, &lang.image_prefix)? {
            fs::remove_file(&image).map_err(|e| Error::cleanup(&image, e))?;
            info!(language = %lang.name, path = %image.display(), "Deleted image");
            report.removed.push(image);
        }

        let caption = dir.join(&lang.caption_file);
        if caption.is_file() {
            fs::write(&caption, "").map_err(|e| Error::cleanup(&caption, e))?;
            info!(language = %lang.name, path = %caption.display(), "Cleared message file");
            report.truncated.push(caption);
        } else {
            warn!(language = %lang.name, path = %caption.display(), "Message file not present, nothing to clear");
        }
    }

    Ok(report)
}
