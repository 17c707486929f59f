//! Delay capability
//!
//! Every wait the orchestrator performs goes through [`Delay`], so tests can
//! swap real sleeping for a recorder.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Something that can wait
#[async_trait::async_trait]
pub trait Delay: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real waiting on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait::async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately and remembers every requested duration
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    requested: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingDelay {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order
    #[must_use]
    pub fn recorded(&self) -> Vec<Duration> {
        self.requested
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(duration);
        }
    }
}
