//! Herald Channels - Channel Adapters
//!
//! This crate provides the broadcast capability for each messaging platform:
//! - WhatsApp groups and status (via a WhatsApp Web bridge)
//! - Telegram groups and forum topics (via teloxide)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod recipients;
pub mod telegram;
pub mod util;
pub mod whatsapp;

pub use error::{Error, Result};

// Re-export message types
pub use message::{BroadcastChannel, ChannelKind, GroupSummary, RecipientAddress, RecipientTarget};
pub use recipients::{load_recipients, parse_recipients};

// Re-export Telegram adapter
pub use telegram::{TelegramAdapter, TelegramConfig};

// Re-export WhatsApp session
pub use whatsapp::{WhatsAppConfig, WhatsAppSession, STATUS_BROADCAST_JID};
