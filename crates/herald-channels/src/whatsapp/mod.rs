//! WhatsApp - web bridge adapter
//!
//! The bridge is a small HTTP server driving WhatsApp Web. Groups and the
//! status broadcast are both reached through one [`WhatsAppSession`].

/// Session and send implementation.
pub mod adapter;
/// Bridge connection configuration.
pub mod config;
/// Bridge API request/response types.
pub mod types;

pub use adapter::{WhatsAppSession, STATUS_BROADCAST_JID};
pub use config::WhatsAppConfig;
pub use types::ConnectionStatus;
