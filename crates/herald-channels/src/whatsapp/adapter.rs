use super::config::WhatsAppConfig;
use super::types::{
    ConnectionStatus, GroupsResponse, MediaMessageRequest, MediaMessageResponse, StatusResponse,
    UploadRequest, UploadResponse,
};
use crate::error::{Error, Result};
use crate::message::{BroadcastChannel, GroupSummary, RecipientAddress, RecipientTarget};
use crate::util::image_mime_type;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Address WhatsApp uses for posting to the account's own status
pub const STATUS_BROADCAST_JID: &str = "status@broadcast";

/// A ready WhatsApp session behind the web bridge
///
/// Only obtainable through [`WhatsAppSession::connect`], so holding one means
/// the bridge reported the account as connected.
pub struct WhatsAppSession {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppSession {
    /// Connect to the bridge and wait until the session is ready
    ///
    /// Pairing QR payloads are logged as they appear. Fails if the session is
    /// not ready within `connect_timeout_secs`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created, the bridge is
    /// unreachable, or the session never becomes ready.
    pub async fn connect(config: WhatsAppConfig) -> Result<Self> {
        warn!("WhatsApp Web automation is unofficial; bursty sends risk an account ban");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        let session = Self { config, client };

        let resp = session.request_connect().await?;
        match ConnectionStatus::parse(&resp.status) {
            ConnectionStatus::Connected => {
                info!("WhatsApp client is ready");
                return Ok(session);
            }
            ConnectionStatus::WaitingScan => {
                if let Some(qr) = resp.qr.as_deref() {
                    log_qr(qr);
                }
            }
            ConnectionStatus::Disconnected => {
                debug!(status = %resp.status, "Bridge not connected yet");
            }
        }

        let limit = Duration::from_secs(session.config.connect_timeout_secs);
        match tokio::time::timeout(limit, session.wait_until_ready(resp.qr)).await {
            Ok(Ok(())) => {
                info!("WhatsApp client is ready");
                Ok(session)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::Bridge(format!(
                "session not ready after {}s",
                session.config.connect_timeout_secs
            ))),
        }
    }

    async fn request_connect(&self) -> Result<StatusResponse> {
        self.client
            .post(self.config.endpoint("connect"))
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to connect: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Bridge(format!("Invalid connect response: {e}")))
    }

    async fn fetch_status(&self) -> Result<StatusResponse> {
        self.client
            .get(self.config.endpoint("status"))
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to check status: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Bridge(format!("Invalid status response: {e}")))
    }

    async fn wait_until_ready(&self, mut last_qr: Option<String>) -> Result<()> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            tokio::time::sleep(interval).await;

            let resp = self.fetch_status().await?;
            match ConnectionStatus::parse(&resp.status) {
                ConnectionStatus::Connected => return Ok(()),
                ConnectionStatus::WaitingScan => {
                    if resp.qr.is_some() && resp.qr != last_qr {
                        if let Some(qr) = resp.qr.as_deref() {
                            log_qr(qr);
                        }
                        last_qr = resp.qr;
                    }
                }
                ConnectionStatus::Disconnected => {
                    debug!(status = %resp.status, "Still waiting for WhatsApp session");
                }
            }
        }
    }

    async fn send_media(&self, to: &str, media: &Path, caption: Option<&str>) -> Result<String> {
        let file_data = tokio::fs::read(media).await.map_err(|source| Error::Io {
            path: media.display().to_string(),
            source,
        })?;
        let mime_type = image_mime_type(media);
        let filename = media
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image");

        let upload: UploadResponse = self
            .client
            .post(self.config.endpoint("media/upload"))
            .json(&UploadRequest {
                media_type: "image",
                filename,
                mime_type: mime_type.essence_str(),
                data: BASE64.encode(&file_data),
            })
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to upload media: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to parse upload response: {e}")))?;

        let media_id = upload.media_id.ok_or_else(|| {
            Error::WhatsApp(upload.error.unwrap_or_else(|| "Upload failed".to_string()))
        })?;

        let resp: MediaMessageResponse = self
            .client
            .post(self.config.endpoint("message/media"))
            .json(&MediaMessageRequest {
                to,
                media_type: "image",
                media_id: &media_id,
                caption,
                send_seen: false,
            })
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to send media message: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to parse response: {e}")))?;

        resp.message_id.ok_or_else(|| {
            Error::WhatsApp(resp.error.unwrap_or_else(|| "Send media failed".to_string()))
        })
    }
}

fn log_qr(qr: &str) {
    info!(qr = %qr, "Scan this QR code with WhatsApp > Settings > Linked Devices");
}

#[async_trait::async_trait]
impl BroadcastChannel for WhatsAppSession {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn send_to_recipient(
        &self,
        target: &RecipientTarget,
        media: &Path,
        caption: &str,
    ) -> Result<String> {
        let RecipientAddress::WhatsApp { jid } = &target.address else {
            return Err(Error::Parse(format!(
                "{} is not a WhatsApp recipient",
                target.display_name
            )));
        };
        self.send_media(jid, media, Some(caption)).await
    }

    async fn send_to_status(&self, media: &Path) -> Result<String> {
        self.send_media(STATUS_BROADCAST_JID, media, None).await
    }

    async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
        let resp: GroupsResponse = self
            .client
            .get(self.config.endpoint("groups"))
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("Failed to list groups: {e}")))?
            .error_for_status()
            .map_err(|e| Error::WhatsApp(format!("Group listing rejected: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Bridge(format!("Invalid groups response: {e}")))?;

        Ok(resp.groups)
    }
}
