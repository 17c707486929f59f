//! Broadcast coordinator
//!
//! Runs every channel for one bundle in a fixed order, folds the results
//! into a single success flag and decides whether the bundle may be deleted.

use crate::bundle::ContentBundle;
use crate::cleanup::{cleanup, CleanupReport};
use crate::error::format_error_for_cli;
use crate::fanout::{ChannelFanOut, ChannelReport};
use crate::media::{MediaPipeline, PassthroughPipeline};
use crate::pacing::{Delay, TokioDelay};
use crate::settings::{LanguageSpec, PacingConfig};
use chrono::{DateTime, Utc};
use herald_channels::{BroadcastChannel, ChannelKind};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// When a successful broadcast may delete its bundle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Delete once every channel and language fully succeeded
    #[default]
    OnFullSuccess,
    /// Never delete (single-channel runs)
    Never,
}

/// A channel taking part in a run
///
/// `channel` is `None` when the channel is not configured; it is then skipped
/// without affecting the run's success.
#[derive(Clone)]
pub struct ChannelSlot {
    /// Which channel
    pub kind: ChannelKind,
    /// Connected channel, if available
    pub channel: Option<Arc<dyn BroadcastChannel>>,
}

impl std::fmt::Debug for ChannelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSlot")
            .field("kind", &self.kind)
            .field("available", &self.channel.is_some())
            .finish()
    }
}

/// Why the bundle was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// At least one channel or language did not fully succeed
    IncompleteDelivery,
    /// The run's policy forbids deleting content
    PolicyNever,
    /// Every channel was unavailable, so nothing was delivered
    NoChannelRan,
}

impl std::fmt::Display for KeepReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::IncompleteDelivery => "some sends failed",
            Self::PolicyNever => "cleanup is disabled for this command",
            Self::NoChannelRan => "no channel was available",
        };
        f.write_str(reason)
    }
}

/// What happened to the bundle after the sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Content was deleted (queue slot) or deleted and cleared (root mode)
    Cleaned(CleanupReport),
    /// Content was kept
    Kept(KeepReason),
    /// Deletion was attempted and failed; not retried
    Failed(String),
}

/// Result of one broadcast run
#[derive(Debug, Clone)]
pub struct BroadcastReport {
    /// Correlates every log line of the run
    pub run_id: Uuid,
    /// The bundle that was sent
    pub bundle: ContentBundle,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end, after cleanup
    pub finished_at: DateTime<Utc>,
    /// Reports of channels that ran, in run order
    pub channels: Vec<ChannelReport>,
    /// Channels skipped as unavailable
    pub skipped: Vec<ChannelKind>,
    /// Every channel that ran fully succeeded
    pub success: bool,
    /// Fate of the bundle
    pub cleanup: CleanupOutcome,
}

impl BroadcastReport {
    /// Total sends confirmed across every channel and language
    #[must_use]
    pub fn total_succeeded(&self) -> usize {
        self.channels
            .iter()
            .flat_map(|c| &c.languages)
            .map(|l| l.outcome.succeeded)
            .sum()
    }

    /// Whether the run delivered anything, fully or partially
    ///
    /// False when no channel ran, when every channel that ran was rejected
    /// by validation, or when every attempted send failed.
    #[must_use]
    pub fn delivered(&self) -> bool {
        if self.channels.is_empty() {
            return false;
        }
        if self.channels.iter().all(|c| !c.validation_errors.is_empty()) {
            return false;
        }
        self.success || self.total_succeeded() > 0
    }

    /// Whether the bundle was removed
    #[must_use]
    pub fn cleaned(&self) -> bool {
        matches!(self.cleanup, CleanupOutcome::Cleaned(_))
    }
}

/// Runs a bundle across channels
pub struct Broadcaster {
    languages: Vec<LanguageSpec>,
    pacing: PacingConfig,
    delay: Arc<dyn Delay>,
    pipeline: Arc<dyn MediaPipeline>,
    channels: Vec<ChannelSlot>,
    policy: CleanupPolicy,
}

impl Broadcaster {
    /// Create a broadcaster with real sleeping, unchanged media and no channels
    #[must_use]
    pub fn new(languages: Vec<LanguageSpec>, pacing: PacingConfig) -> Self {
        Self {
            languages,
            pacing,
            delay: Arc::new(TokioDelay),
            pipeline: Arc::new(PassthroughPipeline),
            channels: Vec::new(),
            policy: CleanupPolicy::default(),
        }
    }

    /// Replace the delay capability
    #[must_use]
    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the media pipeline
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: Arc<dyn MediaPipeline>) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Add an available channel
    #[must_use]
    pub fn with_channel(mut self, kind: ChannelKind, channel: Arc<dyn BroadcastChannel>) -> Self {
        self.channels.push(ChannelSlot {
            kind,
            channel: Some(channel),
        });
        self
    }

    /// Add a channel that is enabled for the run but not configured
    #[must_use]
    pub fn with_unavailable(mut self, kind: ChannelKind) -> Self {
        self.channels.push(ChannelSlot {
            kind,
            channel: None,
        });
        self
    }

    /// Set the cleanup policy
    #[must_use]
    pub fn with_cleanup_policy(mut self, policy: CleanupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send `bundle` on every channel, then clean up if allowed
    pub async fn run(&self, bundle: &ContentBundle) -> BroadcastReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("broadcast", run_id = %run_id);
        self.run_inner(run_id, bundle).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, bundle: &ContentBundle) -> BroadcastReport {
        let started_at = Utc::now();
        info!(bundle = %bundle.describe(), "Starting broadcast");

        let mut slots: Vec<&ChannelSlot> = self.channels.iter().collect();
        slots.sort_by_key(|slot| slot.kind);

        let mut reports = Vec::new();
        let mut skipped = Vec::new();

        for slot in slots {
            let Some(channel) = slot.channel.as_deref() else {
                warn!(channel = %slot.kind, "Channel not configured - skipping");
                skipped.push(slot.kind);
                continue;
            };

            let fanout = ChannelFanOut::new(
                slot.kind,
                channel,
                self.delay.as_ref(),
                &self.pacing,
                self.pipeline.as_ref(),
            );
            let report = fanout.run(bundle, &self.languages).await;

            if report.succeeded() {
                info!(channel = %slot.kind, "Channel completed successfully");
            } else {
                warn!(channel = %slot.kind, "Channel did not fully succeed");
            }
            reports.push(report);
        }

        let success = reports.iter().all(ChannelReport::succeeded);
        log_summary(&reports, success);

        let cleanup = self.finish(bundle, &reports, success);

        BroadcastReport {
            run_id,
            bundle: bundle.clone(),
            started_at,
            finished_at: Utc::now(),
            channels: reports,
            skipped,
            success,
            cleanup,
        }
    }

    fn finish(&self, bundle: &ContentBundle, reports: &[ChannelReport], success: bool) -> CleanupOutcome {
        let keep = if reports.is_empty() {
            Some(KeepReason::NoChannelRan)
        } else if !success {
            Some(KeepReason::IncompleteDelivery)
        } else if self.policy == CleanupPolicy::Never {
            Some(KeepReason::PolicyNever)
        } else {
            None
        };

        if let Some(reason) = keep {
            info!(%reason, "Content preserved");
            return CleanupOutcome::Kept(reason);
        }

        match cleanup(bundle, &self.languages) {
            Ok(report) => {
                info!(
                    removed = report.removed.len(),
                    cleared = report.truncated.len(),
                    "Cleanup completed"
                );
                CleanupOutcome::Cleaned(report)
            }
            Err(e) => {
                error!(error = %e, "Cleanup failed; content was already sent and will not be resent");
                CleanupOutcome::Failed(format_error_for_cli(&e))
            }
        }
    }
}

fn log_summary(reports: &[ChannelReport], success: bool) {
    for report in reports {
        if !report.validation_errors.is_empty() {
            warn!(
                channel = %report.kind,
                errors = report.validation_errors.len(),
                "Channel rejected by validation"
            );
            continue;
        }
        for lang in &report.languages {
            if lang.skipped {
                info!(channel = %report.kind, language = %lang.language, "skipped");
            } else {
                info!(
                    channel = %report.kind,
                    language = %lang.language,
                    "{}",
                    lang.outcome
                );
            }
        }
    }

    if success {
        info!("All messages sent successfully");
    } else {
        warn!("Some messages failed; content kept for another attempt");
    }
}
