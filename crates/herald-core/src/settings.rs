//! Broadcast settings
//!
//! Static configuration consumed by the orchestrator. The binary loads these
//! from TOML/env and calls [`validate_languages`] and
//! [`PacingConfig::validate`] before anything touches the filesystem.

use crate::error::{Error, Result};
use herald_channels::ChannelKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One supported language
///
/// The order of the configured list is the send order for every channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    /// Language name (e.g. "english")
    pub name: String,
    /// File stem of the language's image, matched case-insensitively (e.g. "e")
    pub image_prefix: String,
    /// Caption file name inside the bundle directory
    pub caption_file: String,
    /// WhatsApp group list for this language
    #[serde(default)]
    pub whatsapp_groups: Option<PathBuf>,
    /// Telegram group list for this language
    #[serde(default)]
    pub telegram_groups: Option<PathBuf>,
}

impl LanguageSpec {
    /// Create a language with no recipient lists
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        image_prefix: impl Into<String>,
        caption_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image_prefix: image_prefix.into(),
            caption_file: caption_file.into(),
            whatsapp_groups: None,
            telegram_groups: None,
        }
    }

    /// Set the WhatsApp group list
    #[must_use]
    pub fn with_whatsapp_groups(mut self, path: impl Into<PathBuf>) -> Self {
        self.whatsapp_groups = Some(path.into());
        self
    }

    /// Set the Telegram group list
    #[must_use]
    pub fn with_telegram_groups(mut self, path: impl Into<PathBuf>) -> Self {
        self.telegram_groups = Some(path.into());
        self
    }

    /// Recipient list for a channel, if that channel uses one and it is configured
    #[must_use]
    pub fn recipient_list(&self, kind: ChannelKind) -> Option<&Path> {
        match kind {
            ChannelKind::WhatsAppGroups => self.whatsapp_groups.as_deref(),
            ChannelKind::Telegram => self.telegram_groups.as_deref(),
            ChannelKind::WhatsAppStatus => None,
        }
    }

    /// Name in upper case, as shown in progress output
    #[must_use]
    pub fn label(&self) -> String {
        self.name.to_uppercase()
    }
}

/// The default english + tamil pair
#[must_use]
pub fn default_languages() -> Vec<LanguageSpec> {
    vec![
        LanguageSpec::new("english", "e", "english.txt")
            .with_whatsapp_groups("config/groups-english-list.json")
            .with_telegram_groups("config/telegram-groups-english-list.json"),
        LanguageSpec::new("tamil", "t", "tamil.txt")
            .with_whatsapp_groups("config/groups-tamil-list.json")
            .with_telegram_groups("config/telegram-groups-tamil-list.json"),
    ]
}

/// Check the language list for problems that would make a run meaningless
pub fn validate_languages(languages: &[LanguageSpec]) -> Result<()> {
    if languages.is_empty() {
        return Err(Error::InvalidConfig {
            field: "languages".to_string(),
            message: "at least one language is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for lang in languages {
        if lang.name.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "languages.name".to_string(),
                message: "language name must not be empty".to_string(),
            });
        }
        if !seen.insert(lang.name.as_str()) {
            return Err(Error::InvalidConfig {
                field: "languages.name".to_string(),
                message: format!("duplicate language '{}'", lang.name),
            });
        }
        if lang.image_prefix.trim().is_empty() || lang.image_prefix.contains('.') {
            return Err(Error::InvalidConfig {
                field: "languages.image_prefix".to_string(),
                message: format!("'{}' needs a non-empty prefix without dots", lang.name),
            });
        }
        if lang.caption_file.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "languages.caption_file".to_string(),
                message: format!("'{}' needs a caption file name", lang.name),
            });
        }
    }

    Ok(())
}

/// Where bundles live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root-mode bundle directory
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Queue root, relative to `work_dir` unless absolute
    #[serde(default = "default_queue_dir")]
    pub queue_dir: PathBuf,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_queue_dir() -> PathBuf {
    PathBuf::from("queue")
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            queue_dir: default_queue_dir(),
        }
    }
}

impl ContentConfig {
    /// Resolved queue root
    #[must_use]
    pub fn queue_root(&self) -> PathBuf {
        self.work_dir.join(&self.queue_dir)
    }
}

/// Send pacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Lower bound of the randomized gap between recipients
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    /// Upper bound (inclusive) of the randomized gap between recipients
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Fixed gap between status posts
    #[serde(default = "default_status_delay_ms")]
    pub status_delay_ms: u64,
}

fn default_min_delay_ms() -> u64 {
    15_000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_status_delay_ms() -> u64 {
    5_000
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            status_delay_ms: default_status_delay_ms(),
        }
    }
}

impl PacingConfig {
    /// Create with explicit bounds
    #[must_use]
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, status_delay_ms: u64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            status_delay_ms,
        }
    }

    /// Reject an inverted range
    pub fn validate(&self) -> Result<()> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(Error::InvalidConfig {
                field: "pacing.min_delay_ms".to_string(),
                message: format!(
                    "{} exceeds max_delay_ms {}",
                    self.min_delay_ms, self.max_delay_ms
                ),
            });
        }
        Ok(())
    }

    /// Draw one inter-recipient gap uniformly from `[min_delay_ms, max_delay_ms]`
    pub fn sample_gap<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let low = self.min_delay_ms.min(self.max_delay_ms);
        let high = self.max_delay_ms.max(self.min_delay_ms);
        Duration::from_millis(rng.gen_range(low..=high))
    }

    /// Fixed gap between status posts
    #[must_use]
    pub fn status_gap(&self) -> Duration {
        Duration::from_millis(self.status_delay_ms)
    }
}
