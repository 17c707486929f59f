//! BroadcastChannel trait implementation for Telegram

use super::adapter::TelegramAdapter;
use crate::error::{Error, Result};
use crate::message::{BroadcastChannel, GroupSummary, RecipientAddress, RecipientTarget};
use crate::util::whatsapp_to_telegram_markdown;
use std::path::Path;
use teloxide::{
    payloads::SendPhotoSetters,
    prelude::*,
    types::{InputFile, MessageId, ParseMode, ThreadId},
};

#[async_trait::async_trait]
impl BroadcastChannel for TelegramAdapter {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send_to_recipient(
        &self,
        target: &RecipientTarget,
        media: &Path,
        caption: &str,
    ) -> Result<String> {
        let RecipientAddress::Telegram { chat_id, topic_id } = &target.address else {
            return Err(Error::Parse(format!(
                "{} is not a Telegram recipient",
                target.display_name
            )));
        };
        let recipient = TelegramAdapter::parse_recipient(chat_id)?;

        // Captions are authored with WhatsApp formatting
        #[allow(deprecated)]
        let mut request = self
            .bot
            .send_photo(recipient, InputFile::file(media.to_path_buf()))
            .caption(whatsapp_to_telegram_markdown(caption))
            .parse_mode(ParseMode::Markdown);

        if let Some(topic) = topic_id {
            request = request.message_thread_id(ThreadId(MessageId(*topic)));
        }

        let sent = request.await.map_err(|e| Error::Telegram(e.to_string()))?;

        Ok(sent.id.0.to_string())
    }

    async fn send_to_status(&self, _media: &Path) -> Result<String> {
        Err(Error::Unsupported {
            channel: "telegram",
            operation: "status posts",
        })
    }

    async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
        // Bots cannot enumerate the chats they belong to
        Err(Error::Unsupported {
            channel: "telegram",
            operation: "group listing",
        })
    }
}
