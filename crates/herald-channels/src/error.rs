//! Error types for herald-channels

use thiserror::Error;

/// Channel error type
#[derive(Debug, Error)]
pub enum Error {
    /// Telegram error
    #[error("telegram error: {0}")]
    Telegram(String),

    /// WhatsApp rejected the request
    #[error("whatsapp error: {0}")]
    WhatsApp(String),

    /// WhatsApp bridge transport failure
    #[error("bridge error: {0}")]
    Bridge(String),

    /// Recipient list or payload parsing error
    #[error("parse error: {0}")]
    Parse(String),

    /// The channel does not implement this operation
    #[error("{channel} does not support {operation}")]
    Unsupported {
        /// Channel name
        channel: &'static str,
        /// Operation name
        operation: &'static str,
    },

    /// Filesystem error while reading media or recipient lists
    #[error("io error on {path}: {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
