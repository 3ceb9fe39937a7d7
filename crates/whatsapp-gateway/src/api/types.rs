//! API request and response types.

use crate::error::ApiError;
use crate::validation::FieldError;
use axum::body::Bytes;
use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Multipart field carrying the attachment.
pub const MEDIA_FIELD: &str = "media";

/// Content type assumed for attachments sent without one.
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Request to send a text message.
#[derive(Debug, Default, Deserialize)]
pub struct SendTextRequest {
    /// Recipient phone number, as typed by the caller
    #[serde(default)]
    pub number: Option<String>,

    /// Message text
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a send request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Validation failure response.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub errors: Vec<FieldError>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub messaging_client_healthy: bool,
}

/// Uploaded file, held in memory for the duration of the request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: String,
}

/// A multipart text field that may not have been valid text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormText {
    Text(String),
    NotText,
}

/// Fields of a media send request, before validation.
#[derive(Debug, Default)]
pub struct MediaForm {
    pub number: Option<String>,
    pub caption: Option<FormText>,
    pub media: Option<Upload>,
}

impl MediaForm {
    /// Decode a multipart body entirely into memory.
    ///
    /// Only a part named [`MEDIA_FIELD`] that carries a filename counts as the
    /// attachment; the first one wins. Unknown fields are ignored.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = MediaForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                MEDIA_FIELD if field.file_name().is_some() => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    if form.media.is_some() {
                        debug!(file_name = %file_name, "Ignoring extra attachment");
                        continue;
                    }

                    let mime_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_MEDIA_TYPE)
                        .to_string();
                    let bytes = field.bytes().await.map_err(malformed)?;
                    form.media = Some(Upload {
                        bytes,
                        mime_type,
                        file_name,
                    });
                }
                "number" => {
                    let bytes = field.bytes().await.map_err(malformed)?;
                    form.number = Some(String::from_utf8_lossy(&bytes).into_owned());
                }
                "caption" => {
                    let bytes = field.bytes().await.map_err(malformed)?;
                    form.caption = Some(match String::from_utf8(bytes.to_vec()) {
                        Ok(caption) => FormText::Text(caption),
                        Err(_) => FormText::NotText,
                    });
                }
                _ => debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation(vec![FieldError::body(e.body_text())])
}
