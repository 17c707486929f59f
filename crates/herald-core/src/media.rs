//! Media preparation
//!
//! Channels may want images processed before upload (e.g. upscaled to a
//! minimum width). The pipeline is opaque to the orchestrator; it only needs
//! to know whether the prepared file is a temporary derivative to remove.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An image ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMedia {
    /// File to upload
    pub path: PathBuf,
    /// Whether `path` is a temporary file created by the pipeline
    pub derived: bool,
}

impl PreparedMedia {
    /// Use the original file as-is
    #[must_use]
    pub fn original(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            derived: false,
        }
    }

    /// A temporary derivative owned by the caller
    #[must_use]
    pub fn derived(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            derived: true,
        }
    }

    /// Remove the file if it is a derivative; originals are never touched
    pub fn discard(&self) {
        if !self.derived {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary media"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Could not remove temporary media"),
        }
    }
}

/// Image processing step run before each language's sends
#[async_trait::async_trait]
pub trait MediaPipeline: Send + Sync {
    /// Produce the file to upload for `path`
    async fn prepare(&self, path: &Path) -> Result<PreparedMedia>;
}

/// Sends images unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPipeline;

#[async_trait::async_trait]
impl MediaPipeline for PassthroughPipeline {
    async fn prepare(&self, path: &Path) -> Result<PreparedMedia> {
        Ok(PreparedMedia::original(path))
    }
}
