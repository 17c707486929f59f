//! Telegram configuration types

use serde::{Deserialize, Serialize};

/// Token value shipped in sample configs; treated as "not configured"
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    #[serde(default)]
    pub bot_token: String,
}

impl TelegramConfig {
    /// Create with a bot token
    #[must_use]
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
        }
    }

    /// Fill an empty token from `TELEGRAM_BOT_TOKEN`
    #[must_use]
    pub fn with_env_fallback(mut self) -> Self {
        if self.bot_token.trim().is_empty() {
            if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
                self.bot_token = token;
            }
        }
        self
    }

    /// Whether a usable token is present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let token = self.bot_token.trim();
        !token.is_empty() && token != PLACEHOLDER_TOKEN
    }
}
