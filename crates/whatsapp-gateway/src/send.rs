//! Two-step send: registration check, then delivery.

use crate::api::Upload;
use crate::phone::to_address;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use whatsapp_client::{ClientError, MediaOptions, MessageMedia, MessagingClient};

/// What a send request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Media,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Text => f.write_str("message"),
            PayloadKind::Media => f.write_str("media"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("Address not registered: {0}")]
    NotRegistered(String),

    #[error("Failed to deliver {kind}: {source}")]
    Delivery {
        kind: PayloadKind,
        #[source]
        source: ClientError,
    },
}

/// Successful delivery, addressed with the number the caller typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub kind: PayloadKind,
    pub number: String,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PayloadKind::Text => write!(f, "Mensagem enviada com sucesso para {}", self.number),
            PayloadKind::Media => write!(f, "Mídia enviada com sucesso para {}", self.number),
        }
    }
}

/// Sends messages through the injected messaging client.
///
/// Delivery is attempted exactly once and only after the registration check
/// succeeded. Both calls are awaited in sequence.
#[derive(Clone)]
pub struct Messenger {
    client: Arc<dyn MessagingClient>,
}

impl Messenger {
    pub fn new(client: Arc<dyn MessagingClient>) -> Self {
        Self { client }
    }

    /// Send a text message to `number`.
    pub async fn send_text(&self, number: &str, message: &str) -> Result<Confirmation, SendError> {
        let address = to_address(number);
        self.ensure_registered(&address, PayloadKind::Text).await?;

        self.client
            .send_text(&address, message)
            .await
            .map_err(|e| delivery_failed(&address, PayloadKind::Text, e))?;

        info!(address = %address, "Message sent");
        Ok(Confirmation {
            kind: PayloadKind::Text,
            number: number.to_string(),
        })
    }

    /// Send an uploaded file to `number`, with an optional caption.
    pub async fn send_media(
        &self,
        number: &str,
        caption: Option<&str>,
        upload: &Upload,
    ) -> Result<Confirmation, SendError> {
        let address = to_address(number);
        let media = MessageMedia::from_bytes(
            upload.mime_type.as_str(),
            &upload.bytes,
            Some(upload.file_name.clone()),
        );
        let options = MediaOptions::with_caption(caption.unwrap_or_default());

        self.ensure_registered(&address, PayloadKind::Media).await?;

        self.client
            .send_media(&address, &media, &options)
            .await
            .map_err(|e| delivery_failed(&address, PayloadKind::Media, e))?;

        info!(address = %address, mimetype = %media.mimetype, "Media sent");
        Ok(Confirmation {
            kind: PayloadKind::Media,
            number: number.to_string(),
        })
    }

    async fn ensure_registered(&self, address: &str, kind: PayloadKind) -> Result<(), SendError> {
        let registered = self
            .client
            .is_registered_address(address)
            .await
            .map_err(|e| delivery_failed(address, kind, e))?;

        if !registered {
            warn!(address = %address, "Recipient is not on WhatsApp");
            return Err(SendError::NotRegistered(address.to_string()));
        }

        Ok(())
    }
}

fn delivery_failed(address: &str, kind: PayloadKind, source: ClientError) -> SendError {
    error!(address = %address, error = %source, "Failed to send {}", kind);
    SendError::Delivery { kind, source }
}
