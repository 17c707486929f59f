//! Herald Core - Broadcast Orchestration
//!
//! This crate decides what to send, checks it, sends it and cleans up:
//! - Bundle: resolving the active content bundle (root or queue slot)
//! - Validation: per-channel checks before any network activity
//! - Dispatch: paced, sequential sends to a recipient list
//! - Fan-out: one channel across every language
//! - Broadcast: every channel, global success, conditional cleanup
//! - Cleanup: deleting consumed content
//! - Retry: bounded retry for flaky startup reads

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod broadcast;
pub mod bundle;
pub mod cleanup;
pub mod dispatch;
pub mod error;
pub mod fanout;
pub mod media;
pub mod pacing;
pub mod retry;
pub mod settings;
pub mod validation;

pub use broadcast::{
    BroadcastReport, Broadcaster, ChannelSlot, CleanupOutcome, CleanupPolicy, KeepReason,
};
pub use bundle::{ContentBundle, ContentResolver, QueueSlot};
pub use cleanup::{cleanup, CleanupReport};
pub use dispatch::{DispatchEngine, DispatchOutcome, RecipientFailure};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use fanout::{ChannelFanOut, ChannelReport, LanguageReport};
pub use media::{MediaPipeline, PassthroughPipeline, PreparedMedia};
pub use pacing::{Delay, RecordingDelay, TokioDelay};
pub use retry::{retry_with_fixed_delay, RetryConfig, RetryError};
pub use settings::{
    default_languages, validate_languages, ContentConfig, LanguageSpec, PacingConfig,
};
pub use validation::{plan_channel, validate, LanguagePlan, ValidationError};
