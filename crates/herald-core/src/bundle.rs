//! Content bundles and the resolver that picks one
//!
//! A bundle is either the working directory itself (root mode) or the
//! lowest-numbered directory under the queue root (queue mode).

use crate::error::{Error, Result};
use crate::settings::ContentConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image extensions recognised for bundle images (lower case)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// The unit of work for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBundle {
    /// Directory holding every language's image and caption
    pub source_path: PathBuf,
    /// Whether the bundle is a queue slot (cleanup removes the whole slot)
    pub is_queued: bool,
    /// Slot number when queued
    pub slot: Option<u64>,
}

impl ContentBundle {
    /// A root-mode bundle
    #[must_use]
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: path.into(),
            is_queued: false,
            slot: None,
        }
    }

    /// A queue-slot bundle
    #[must_use]
    pub fn queued(slot: QueueSlot) -> Self {
        Self {
            source_path: slot.path,
            is_queued: true,
            slot: Some(slot.number),
        }
    }

    /// Short description for logs and reports
    #[must_use]
    pub fn describe(&self) -> String {
        match self.slot {
            Some(n) => format!("queue slot {} ({})", n, self.source_path.display()),
            None => format!("root bundle ({})", self.source_path.display()),
        }
    }
}

/// A numbered queue subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSlot {
    /// Slot number parsed from the directory name
    pub number: u64,
    /// Directory path
    pub path: PathBuf,
}

/// Parse a directory name as a slot number
///
/// Only plain ASCII digit strings qualify; signs, whitespace and anything
/// that overflows `u64` are rejected.
#[must_use]
pub fn parse_slot_name(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Whether `file_name` is an image for `prefix`
///
/// The stem is compared case-insensitively and the extension must be one of
/// [`IMAGE_EXTENSIONS`].
#[must_use]
pub fn is_image_for(file_name: &str, prefix: &str) -> bool {
    let path = Path::new(file_name);
    let (Some(stem), Some(ext)) = (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) else {
        return false;
    };
    stem.to_lowercase() == prefix.to_lowercase()
        && IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// Every image file in `dir` matching `prefix`, sorted by name
pub fn find_images(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        // Follows symlinks, like the slot scan
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_image_for(name, prefix) {
                matches.push(entry.path());
            }
        }
    }
    matches.sort();
    Ok(matches)
}

/// Locates the bundle for this invocation
///
/// Owns slot selection: nothing else decides which slot is active.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    work_dir: PathBuf,
    queue_root: PathBuf,
}

impl ContentResolver {
    /// Create a resolver for the configured content layout
    #[must_use]
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            queue_root: config.queue_root(),
        }
    }

    /// Queue root directory
    #[must_use]
    pub fn queue_root(&self) -> &Path {
        &self.queue_root
    }

    /// Whether a queue root directory exists
    #[must_use]
    pub fn has_queue(&self) -> bool {
        self.queue_root.is_dir()
    }

    /// All numeric slots under the queue root, lowest first
    ///
    /// Returns an empty list when there is no queue root.
    pub fn slots(&self) -> Result<Vec<QueueSlot>> {
        if !self.has_queue() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.queue_root).map_err(|e| Error::io(&self.queue_root, e))?;
        let mut slots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.queue_root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(number) = entry.file_name().to_str().and_then(parse_slot_name) else {
                debug!(path = %path.display(), "Ignoring non-numeric queue entry");
                continue;
            };
            slots.push(QueueSlot { number, path });
        }

        // Ties ("7" vs "007") fall back to the name so selection stays deterministic
        slots.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));
        Ok(slots)
    }

    /// Pick the bundle to send
    ///
    /// - no queue root: the working directory, as a root-mode bundle
    /// - queue root with slots: the lowest-numbered slot
    /// - queue root without slots: `None` (the queue is empty)
    pub fn resolve(&self) -> Result<Option<ContentBundle>> {
        if !self.has_queue() {
            debug!(work_dir = %self.work_dir.display(), "No queue directory, using root bundle");
            return Ok(Some(ContentBundle::root(&self.work_dir)));
        }

        let bundle = self.slots()?.into_iter().next().map(ContentBundle::queued);
        match &bundle {
            Some(b) => debug!(bundle = %b.describe(), "Resolved queue slot"),
            None => debug!(queue = %self.queue_root.display(), "Queue is empty"),
        }
        Ok(bundle)
    }
}
