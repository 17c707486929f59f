//! Application settings
//!
//! Everything the binary needs, deserialized from the layered sources in
//! [`loader`] and checked by [`AppConfig::validate`] before any command runs.

pub mod loader;

use herald_channels::{TelegramConfig, WhatsAppConfig};
use herald_core::{
    default_languages, validate_languages, ContentConfig, LanguageSpec, PacingConfig, RetryConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use loader::load_config;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
    #[serde(default = "default_group_dump_path")]
    pub group_dump_path: PathBuf,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageSpec>,
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

fn default_group_dump_path() -> PathBuf {
    PathBuf::from("config/groups-list.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            pacing: PacingConfig::default(),
            retry: RetryConfig::default(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
            group_dump_path: default_group_dump_path(),
            whatsapp: WhatsAppConfig::default(),
            telegram: TelegramConfig::default(),
            languages: default_languages(),
        }
    }
}

impl AppConfig {
    /// Reject settings that would make any command meaningless
    pub fn validate(&self) -> herald_core::Result<()> {
        validate_languages(&self.languages)?;
        self.pacing.validate()?;
        if self.retry.max_attempts == 0 {
            return Err(herald_core::Error::InvalidConfig {
                field: "retry.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.whatsapp.bridge_url.trim().is_empty() {
            return Err(herald_core::Error::InvalidConfig {
                field: "whatsapp.bridge_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Telegram settings with the `TELEGRAM_BOT_TOKEN` fallback applied
    pub fn telegram(&self) -> TelegramConfig {
        self.telegram.clone().with_env_fallback()
    }

    /// Wait before exiting after a send
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
