use crate::message::GroupSummary;
use serde::{Deserialize, Serialize};

/// Connection status response
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    /// Bridge connection state (e.g. "connected", "waiting_scan").
    pub status: String,
    /// QR code payload for pairing (if waiting for scan).
    pub qr: Option<String>,
}

/// WhatsApp connection status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected
    Disconnected,
    /// Waiting for QR scan
    WaitingScan,
    /// Connected and ready
    Connected,
}

impl ConnectionStatus {
    /// Map the bridge's status string
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "connected" => Self::Connected,
            "waiting_scan" => Self::WaitingScan,
            _ => Self::Disconnected,
        }
    }
}

/// Media upload request
#[derive(Debug, Serialize)]
pub struct UploadRequest<'a> {
    /// Always "image" for broadcasts
    pub media_type: &'a str,
    /// File name shown to recipients
    pub filename: &'a str,
    /// MIME type of the payload
    pub mime_type: &'a str,
    /// Base64 file content
    pub data: String,
}

/// Media upload response
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Bridge-side media handle
    pub media_id: Option<String>,
    /// Error description if the upload failed
    pub error: Option<String>,
}

/// Media message request
#[derive(Debug, Serialize)]
pub struct MediaMessageRequest<'a> {
    /// Destination JID
    pub to: &'a str,
    /// Always "image" for broadcasts
    pub media_type: &'a str,
    /// Handle returned by the upload
    pub media_id: &'a str,
    /// Caption sent together with the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
    /// Suppress the read receipt the bridge sends by default
    pub send_seen: bool,
}

/// Media message response
#[derive(Debug, Deserialize)]
pub struct MediaMessageResponse {
    /// WhatsApp message ID if sent
    pub message_id: Option<String>,
    /// Error description if sending failed
    pub error: Option<String>,
}

/// Group listing response
#[derive(Debug, Deserialize)]
pub struct GroupsResponse {
    /// Groups the account participates in
    #[serde(default)]
    pub groups: Vec<GroupSummary>,
}
