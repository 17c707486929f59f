//! Recipient list files
//!
//! Each language/channel pair has its own JSON array. WhatsApp entries look
//! like `{ "name": "...", "id": "...@g.us" }`; Telegram entries look like
//! `{ "name": "...", "chatId": -100123 | "@channel", "topicId": 7 }`.

use crate::error::{Error, Result};
use crate::message::{ChannelKind, RecipientAddress, RecipientTarget};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct WhatsAppRecord {
    name: String,
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatIdValue {
    Number(i64),
    Text(String),
}

impl ChatIdValue {
    fn into_string(self) -> String {
        match self {
            Self::Number(id) => id.to_string(),
            Self::Text(id) => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TelegramRecord {
    name: String,
    chat_id: ChatIdValue,
    #[serde(default)]
    topic_id: Option<i32>,
}

/// Parse a recipient list from its JSON text
///
/// Order is preserved exactly; no deduplication is performed.
pub fn parse_recipients(json: &str, kind: ChannelKind) -> Result<Vec<RecipientTarget>> {
    match kind {
        ChannelKind::Telegram => {
            let records: Vec<TelegramRecord> =
                serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;
            Ok(records
                .into_iter()
                .map(|r| RecipientTarget {
                    display_name: r.name,
                    address: RecipientAddress::Telegram {
                        chat_id: r.chat_id.into_string(),
                        // 0 is never a real thread; treat it as "no topic"
                        topic_id: r.topic_id.filter(|id| *id != 0),
                    },
                })
                .collect())
        }
        ChannelKind::WhatsAppGroups | ChannelKind::WhatsAppStatus => {
            let records: Vec<WhatsAppRecord> =
                serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;
            Ok(records
                .into_iter()
                .map(|r| RecipientTarget::whatsapp(r.name, r.id))
                .collect())
        }
    }
}

/// Read and parse a recipient list file
pub fn load_recipients(path: &Path, kind: ChannelKind) -> Result<Vec<RecipientTarget>> {
    let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_recipients(&json, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whatsapp_list_keeps_order() {
        let json = r#"[
            {"name": "Zeta", "id": "2@g.us"},
            {"name": "Alpha", "id": "1@g.us"},
            {"name": "Zeta", "id": "2@g.us"}
        ]"#;
        let targets = parse_recipients(json, ChannelKind::WhatsAppGroups).unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], RecipientTarget::whatsapp("Zeta", "2@g.us"));
        assert_eq!(targets[1].display_name, "Alpha");
        assert_eq!(targets[2], targets[0]);
    }

    #[test]
    fn test_parse_telegram_numeric_and_text_chat_ids() {
        let json = r#"[
            {"name": "Forum", "chatId": -1001234567890, "topicId": 42},
            {"name": "Channel", "chatId": "@herald_news"},
            {"name": "Zero topic", "chatId": "-100", "topicId": 0}
        ]"#;
        let targets = parse_recipients(json, ChannelKind::Telegram).unwrap();

        assert_eq!(
            targets[0],
            RecipientTarget::telegram("Forum", "-1001234567890").with_topic(42)
        );
        assert_eq!(targets[1], RecipientTarget::telegram("Channel", "@herald_news"));
        assert_eq!(targets[2], RecipientTarget::telegram("Zero topic", "-100"));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let targets = parse_recipients("[]", ChannelKind::Telegram).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = parse_recipients(r#"[{"name": "x"}]"#, ChannelKind::WhatsAppGroups).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = parse_recipients(r#"{"name": "x"}"#, ChannelKind::Telegram).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_recipients(&dir.path().join("nope.json"), ChannelKind::Telegram)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
