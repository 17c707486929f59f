//! Error types for herald-core
//!
//! This module provides error types and user-friendly error formatting.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the content tree failed
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig {
        /// Settings field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// Deleting consumed content failed
    #[error("cleanup failed on {}: {source}", path.display())]
    Cleanup {
        /// Path that could not be removed or truncated
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Media preparation failed
    #[error("media error: {0}")]
    Media(String),

    /// Channel error
    #[error("channel error: {0}")]
    Channel(#[from] herald_channels::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn cleanup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Cleanup {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Io { path, source } => {
                format!("📁 Could not read {}: {}", path.display(), source)
            }
            Error::InvalidConfig { field, message } => {
                format!("⚙️ Configuration error in '{}': {}", field, message)
            }
            Error::Cleanup { path, source } => {
                format!("🗑️ Could not clean up {}: {}", path.display(), source)
            }
            Error::Media(msg) => format!("🖼️ Media error: {}", msg),
            Error::Channel(e) => format!("📡 Channel error: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::InvalidConfig { field, .. } => Some(format!(
                "💡 Check the '{}' setting in config/default.toml or HERALD_* environment variables.",
                field
            )),
            Error::Cleanup { .. } => Some(
                "💡 Content was already sent. Remove the files by hand; do not re-run the send."
                    .to_string(),
            ),
            Error::Channel(herald_channels::Error::Bridge(_)) => {
                Some("💡 Make sure the WhatsApp bridge is running and reachable.".to_string())
            }
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }

    output
}
