use serde::{Deserialize, Serialize};

/// Default WhatsApp Web bridge server URL
pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:3001";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default time allowed for pairing/ready before giving up
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 120;

/// Default interval between `/status` polls while connecting
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// WhatsApp bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Bridge server URL (default: http://localhost:3001)
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// How long `connect` waits for the session to become ready
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Poll interval while waiting for the session
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_bridge_url() -> String {
    DEFAULT_BRIDGE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl WhatsAppConfig {
    /// Create with bridge URL
    #[must_use]
    pub fn new(bridge_url: impl Into<String>) -> Self {
        Self {
            bridge_url: bridge_url.into(),
            ..Default::default()
        }
    }

    /// Build an endpoint URL, tolerating a trailing slash on the base
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.bridge_url.trim_end_matches('/'), path)
    }
}
