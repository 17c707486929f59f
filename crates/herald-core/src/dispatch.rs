//! Rate-limited dispatch engine
//!
//! Sends one language's image and caption to every recipient of one channel,
//! in list order, with a randomized gap between consecutive recipients.
//! A failed recipient is logged and counted; it never stops the batch.

use crate::pacing::Delay;
use crate::settings::PacingConfig;
use herald_channels::{BroadcastChannel, RecipientTarget};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// One recipient that did not receive the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientFailure {
    /// Recipient display name
    pub recipient: String,
    /// Channel error message
    pub error: String,
}

/// Tally of one fan-out
///
/// `succeeded <= attempted` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// Sends attempted
    pub attempted: usize,
    /// Sends confirmed by the channel
    pub succeeded: usize,
    /// Recipients that failed, in send order
    pub failures: Vec<RecipientFailure>,
}

impl DispatchOutcome {
    /// Record a successful send
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Record a failed send
    pub fn record_failure(&mut self, recipient: impl Into<String>, error: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(RecipientFailure {
            recipient: recipient.into(),
            error: error.into(),
        });
    }

    /// Every attempted send succeeded (vacuously true for zero attempts)
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.attempted
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.attempted)
    }
}

/// Sequential, paced sender for one channel
pub struct DispatchEngine<'a> {
    channel: &'a dyn BroadcastChannel,
    delay: &'a dyn Delay,
    pacing: &'a PacingConfig,
}

impl<'a> DispatchEngine<'a> {
    /// Create an engine over a channel and a delay capability
    #[must_use]
    pub fn new(
        channel: &'a dyn BroadcastChannel,
        delay: &'a dyn Delay,
        pacing: &'a PacingConfig,
    ) -> Self {
        Self {
            channel,
            delay,
            pacing,
        }
    }

    /// Send `media` with `caption` to each recipient in order
    ///
    /// Performs exactly `recipients.len()` sends and `len - 1` waits.
    pub async fn dispatch(
        &self,
        recipients: &[RecipientTarget],
        media: &Path,
        caption: &str,
    ) -> DispatchOutcome {
        let total = recipients.len();
        let mut outcome = DispatchOutcome::default();

        for (index, recipient) in recipients.iter().enumerate() {
            if index > 0 {
                let gap = self.pacing.sample_gap(&mut rand::thread_rng());
                info!(
                    delay_secs = gap.as_secs(),
                    "Waiting before next recipient"
                );
                self.delay.sleep(gap).await;
            }

            info!(
                channel = self.channel.name(),
                recipient = %recipient.display_name,
                "[{}/{}] Sending image with caption",
                index + 1,
                total
            );

            match self
                .channel
                .send_to_recipient(recipient, media, caption)
                .await
            {
                Ok(message_id) => {
                    info!(recipient = %recipient.display_name, message_id = %message_id, "Sent successfully");
                    outcome.record_success();
                }
                Err(e) => {
                    warn!(recipient = %recipient.display_name, error = %e, "Send failed");
                    outcome.record_failure(&recipient.display_name, e.to_string());
                }
            }
        }

        outcome
    }
}
