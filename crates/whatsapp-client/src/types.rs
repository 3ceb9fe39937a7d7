//! Messaging types and bridge wire format.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Suffix that turns a digits-only phone number into a WhatsApp user address.
pub const USER_ADDRESS_SUFFIX: &str = "@c.us";

/// Media payload handed to the messaging client.
///
/// `data` carries the file contents as standard base64 text, which is what the
/// web session expects when attaching a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMedia {
    pub mimetype: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl MessageMedia {
    /// Build a media object from already encoded base64 data.
    pub fn new(
        mimetype: impl Into<String>,
        data: impl Into<String>,
        filename: Option<String>,
    ) -> Self {
        Self {
            mimetype: mimetype.into(),
            data: data.into(),
            filename,
        }
    }

    /// Build a media object from raw file bytes.
    pub fn from_bytes(mimetype: impl Into<String>, bytes: &[u8], filename: Option<String>) -> Self {
        Self::new(mimetype, STANDARD.encode(bytes), filename)
    }
}

/// Options sent alongside a media payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaOptions {
    pub caption: String,
}

impl MediaOptions {
    pub fn with_caption(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
        }
    }
}

/// Session lifecycle signal emitted by the messaging client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// A QR code must be scanned from the phone to pair the session.
    #[serde(rename = "qr")]
    QrCodeReady { payload: String },
    Authenticated,
    Ready,
    #[serde(rename = "auth_failure")]
    AuthenticationFailed {
        #[serde(default)]
        reason: String,
    },
}

/// Registration check response.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredResponse {
    pub registered: bool,
}

/// Outgoing text message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendTextRequest<'a> {
    #[serde(rename = "chatId")]
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Outgoing media message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMediaRequest<'a> {
    #[serde(rename = "chatId")]
    pub chat_id: &'a str,
    pub media: &'a MessageMedia,
    pub options: &'a MediaOptions,
}
