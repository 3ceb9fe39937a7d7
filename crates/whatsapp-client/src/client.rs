//! Automation bridge HTTP client.

use crate::error::ClientError;
use crate::messaging::MessagingClient;
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Client for the automation bridge that drives the WhatsApp web session.
#[derive(Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
}

impl BridgeClient {
    /// Create a new bridge client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Get the bridge base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the bridge to start (or resume) the WhatsApp session.
    ///
    /// Progress is reported through [`BridgeClient::poll_events`].
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), ClientError> {
        let response = self
            .client
            .post(format!("{}/v1/session/start", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(msg));
        }

        debug!("Session start requested");
        Ok(())
    }

    /// Drain pending session lifecycle events.
    #[instrument(skip(self))]
    pub async fn poll_events(&self) -> Result<Vec<ClientEvent>, ClientError> {
        let response = self
            .client
            .get(format!("{}/v1/session/events", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(msg));
        }

        let raw: Vec<serde_json::Value> = response.json().await?;
        let events = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ClientEvent>(value.clone()) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(event = %value, "Skipping unknown session event: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!("Received {} session events", events.len());
        Ok(events)
    }
}

#[async_trait]
impl MessagingClient for BridgeClient {
    #[instrument(skip(self))]
    async fn is_registered_address(&self, address: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/contacts/{}/registered",
                self.base_url,
                encode(address)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(msg));
        }

        let body: RegisteredResponse = response.json().await?;
        Ok(body.registered)
    }

    #[instrument(skip(self, text))]
    async fn send_text(&self, address: &str, text: &str) -> Result<(), ClientError> {
        let request = SendTextRequest {
            chat_id: address,
            text,
        };

        let response = self
            .client
            .post(format!("{}/v1/messages/text", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Send failed: {}", msg);
            return Err(ClientError::SendFailed(msg));
        }

        debug!("Sent text to {}", address);
        Ok(())
    }

    #[instrument(skip(self, media, options), fields(mimetype = %media.mimetype))]
    async fn send_media(
        &self,
        address: &str,
        media: &MessageMedia,
        options: &MediaOptions,
    ) -> Result<(), ClientError> {
        let request = SendMediaRequest {
            chat_id: address,
            media,
            options,
        };

        let response = self
            .client
            .post(format!("{}/v1/messages/media", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Media send failed: {}", msg);
            return Err(ClientError::SendFailed(msg));
        }

        debug!("Sent media to {}", address);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
