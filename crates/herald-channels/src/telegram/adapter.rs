//! Telegram adapter core

use super::config::TelegramConfig;
use crate::error::{Error, Result};
use crate::util::mask_secret;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::info;

/// Telegram bot adapter
pub struct TelegramAdapter {
    pub(crate) bot: Bot,
}

impl TelegramAdapter {
    /// Create a new Telegram adapter
    ///
    /// # Errors
    /// Returns an error when the config carries no usable token, so callers
    /// can treat the channel as unavailable.
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(Error::Telegram("TELEGRAM_BOT_TOKEN not set".to_string()));
        }
        let token = config.bot_token.trim();
        let bot = Bot::new(token);
        info!(token = %mask_secret(token), "Telegram bot initialized");
        Ok(Self { bot })
    }

    /// Map a recipient-list chat id to a Telegram recipient
    ///
    /// Numeric ids become chat ids; anything else is sent as a public
    /// channel username.
    pub fn parse_recipient(chat_id: &str) -> Result<Recipient> {
        let chat_id = chat_id.trim();
        if chat_id.is_empty() {
            return Err(Error::Parse("empty Telegram chat id".to_string()));
        }
        match chat_id.parse::<i64>() {
            Ok(id) => Ok(Recipient::Id(ChatId(id))),
            Err(_) => Ok(Recipient::ChannelUsername(chat_id.to_string())),
        }
    }
}
