//! Channel fan-out coordinator
//!
//! Runs one channel across every configured language, strictly in language
//! order. Recipient channels go through the [`DispatchEngine`]; the status
//! channel posts one image per language with a fixed gap in between.

use crate::bundle::ContentBundle;
use crate::dispatch::{DispatchEngine, DispatchOutcome};
use crate::media::MediaPipeline;
use crate::pacing::Delay;
use crate::settings::{LanguageSpec, PacingConfig};
use crate::validation::{plan_channel, LanguagePlan, ValidationError};
use herald_channels::util::preview_caption;
use herald_channels::{BroadcastChannel, ChannelKind};
use tracing::{error, info, info_span, warn, Instrument};

/// Result of one language on one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    /// Language name
    pub language: String,
    /// Send tally
    pub outcome: DispatchOutcome,
    /// No recipient list was configured, so nothing was attempted
    pub skipped: bool,
}

/// Result of one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    /// Which channel
    pub kind: ChannelKind,
    /// Per-language results, in send order (empty when validation failed)
    pub languages: Vec<LanguageReport>,
    /// Problems that stopped the channel before any send
    pub validation_errors: Vec<ValidationError>,
}

impl ChannelReport {
    /// Validation passed and every language reached `succeeded == attempted`
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.validation_errors.is_empty()
            && self.languages.iter().all(|l| l.outcome.is_complete())
    }
}

/// Runs one channel over all languages
pub struct ChannelFanOut<'a> {
    kind: ChannelKind,
    channel: &'a dyn BroadcastChannel,
    delay: &'a dyn Delay,
    pacing: &'a PacingConfig,
    pipeline: &'a dyn MediaPipeline,
}

impl<'a> ChannelFanOut<'a> {
    /// Create a coordinator for `channel` acting as `kind`
    #[must_use]
    pub fn new(
        kind: ChannelKind,
        channel: &'a dyn BroadcastChannel,
        delay: &'a dyn Delay,
        pacing: &'a PacingConfig,
        pipeline: &'a dyn MediaPipeline,
    ) -> Self {
        Self {
            kind,
            channel,
            delay,
            pacing,
            pipeline,
        }
    }

    /// Validate the bundle for this channel, then send every language
    ///
    /// Nothing is sent if any language fails validation.
    pub async fn run(&self, bundle: &ContentBundle, languages: &[LanguageSpec]) -> ChannelReport {
        info!(channel = %self.kind, "Validating configurations");

        let plans = match plan_channel(bundle, languages, self.kind) {
            Ok(plans) => plans,
            Err(errors) => {
                for e in &errors {
                    error!(channel = %self.kind, language = e.language(), "{e}");
                }
                error!(channel = %self.kind, "Please fix the above errors before sending");
                return ChannelReport {
                    kind: self.kind,
                    languages: Vec::new(),
                    validation_errors: errors,
                };
            }
        };

        info!(channel = %self.kind, "All configurations validated successfully");

        let mut reports = Vec::with_capacity(plans.len());
        for (index, plan) in plans.iter().enumerate() {
            let span = info_span!("language", channel = %self.kind, language = %plan.language.name);
            let report = if self.kind.uses_recipients() {
                self.send_recipients(plan).instrument(span).await
            } else {
                if index > 0 {
                    info!(delay_secs = self.pacing.status_gap().as_secs(), "Waiting before next status");
                    self.delay.sleep(self.pacing.status_gap()).await;
                }
                self.send_status(plan).instrument(span).await
            };
            reports.push(report);
        }

        ChannelReport {
            kind: self.kind,
            languages: reports,
            validation_errors: Vec::new(),
        }
    }

    async fn send_recipients(&self, plan: &LanguagePlan) -> LanguageReport {
        let language = plan.language.name.clone();

        let Some(recipients) = plan.recipients.as_deref() else {
            warn!(
                "{}: no {} recipient list configured - skipping",
                plan.language.label(),
                self.kind
            );
            return LanguageReport {
                language,
                outcome: DispatchOutcome::default(),
                skipped: true,
            };
        };

        info!("Sending {} messages", plan.language.label());

        if recipients.is_empty() {
            warn!("No {} recipients configured for {}", self.kind, language);
            return LanguageReport {
                language,
                outcome: DispatchOutcome::default(),
                skipped: false,
            };
        }

        info!(image = %plan.image.display(), "Image");
        info!(preview = %preview_caption(&plan.caption), "Message preview");

        let outcome = match self.pipeline.prepare(&plan.image).await {
            Ok(media) => {
                info!("Sending to {} recipients", recipients.len());
                let engine = DispatchEngine::new(self.channel, self.delay, self.pacing);
                let outcome = engine.dispatch(recipients, &media.path, &plan.caption).await;
                media.discard();
                outcome
            }
            Err(e) => {
                error!(error = %e, "Media preparation failed; no recipient was attempted");
                let mut outcome = DispatchOutcome::default();
                for recipient in recipients {
                    outcome.record_failure(&recipient.display_name, e.to_string());
                }
                outcome
            }
        };

        info!(
            "{} {}: Sent to {} recipients",
            plan.language.label(),
            self.kind,
            outcome
        );

        LanguageReport {
            language,
            outcome,
            skipped: false,
        }
    }

    async fn send_status(&self, plan: &LanguagePlan) -> LanguageReport {
        let language = plan.language.name.clone();
        let mut outcome = DispatchOutcome::default();

        info!("Posting {} status", plan.language.label());
        info!(image = %plan.image.display(), "Image");

        match self.pipeline.prepare(&plan.image).await {
            Ok(media) => {
                match self.channel.send_to_status(&media.path).await {
                    Ok(message_id) => {
                        info!(message_id = %message_id, "{} status posted successfully", plan.language.label());
                        outcome.record_success();
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to post {} status", language);
                        outcome.record_failure("status", e.to_string());
                    }
                }
                media.discard();
            }
            Err(e) => {
                error!(error = %e, "Media preparation failed");
                outcome.record_failure("status", e.to_string());
            }
        }

        LanguageReport {
            language,
            outcome,
            skipped: false,
        }
    }
}
