//! Messaging client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bridge API error: {0}")]
    Api(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}
