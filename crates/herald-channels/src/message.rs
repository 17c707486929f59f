//! Message - Broadcast targets and the channel capability
//!
//! This module provides the recipient model shared by every channel and the
//! `BroadcastChannel` trait the dispatch engine talks to.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Channel identifier
///
/// The declaration order is the order a full broadcast visits channels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// WhatsApp status (`status@broadcast`)
    WhatsAppStatus,
    /// WhatsApp groups
    WhatsAppGroups,
    /// Telegram groups and forum topics
    Telegram,
}

impl ChannelKind {
    /// All channels in broadcast order
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::WhatsAppStatus,
        ChannelKind::WhatsAppGroups,
        ChannelKind::Telegram,
    ];

    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsAppStatus => "whatsapp_status",
            Self::WhatsAppGroups => "whatsapp_groups",
            Self::Telegram => "telegram",
        }
    }

    /// Whether this channel fans out over a recipient list
    #[must_use]
    pub fn uses_recipients(&self) -> bool {
        !matches!(self, Self::WhatsAppStatus)
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a recipient lives on its channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum RecipientAddress {
    /// WhatsApp group JID (e.g. `120363000000000000@g.us`)
    WhatsApp {
        /// Serialized chat id
        jid: String,
    },
    /// Telegram chat, optionally a forum topic inside it
    Telegram {
        /// Numeric chat id or `@channel` username
        chat_id: String,
        /// Forum topic (message thread) id
        topic_id: Option<i32>,
    },
}

/// One destination on a channel's recipient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientTarget {
    /// Human readable name used in logs
    pub display_name: String,
    /// Channel specific address
    pub address: RecipientAddress,
}

impl RecipientTarget {
    /// Create a WhatsApp group target
    #[must_use]
    pub fn whatsapp(display_name: impl Into<String>, jid: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            address: RecipientAddress::WhatsApp { jid: jid.into() },
        }
    }

    /// Create a Telegram chat target
    #[must_use]
    pub fn telegram(display_name: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            address: RecipientAddress::Telegram {
                chat_id: chat_id.into(),
                topic_id: None,
            },
        }
    }

    /// Set the forum topic (Telegram only; ignored for WhatsApp)
    #[must_use]
    pub fn with_topic(mut self, topic: i32) -> Self {
        if let RecipientAddress::Telegram { topic_id, .. } = &mut self.address {
            *topic_id = Some(topic);
        }
        self
    }
}

/// A group visible to the connected account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group name
    pub name: String,
    /// Serialized group id
    pub id: String,
}

/// Send capability of one messaging platform
///
/// Implementations perform exactly one network send per call and report
/// failure through the returned error; they never retry on their own.
#[async_trait::async_trait]
pub trait BroadcastChannel: Send + Sync {
    /// Platform name used in logs
    fn name(&self) -> &'static str;

    /// Send an image with a caption to one recipient, returning the platform message id
    async fn send_to_recipient(
        &self,
        target: &RecipientTarget,
        media: &Path,
        caption: &str,
    ) -> Result<String>;

    /// Post an image to the account's status broadcast
    async fn send_to_status(&self, media: &Path) -> Result<String>;

    /// List the groups the account belongs to
    async fn list_groups(&self) -> Result<Vec<GroupSummary>>;
}
