//! Error types for the gateway API.

use crate::api::{ApiResponse, ValidationResponse};
use crate::send::{PayloadKind, SendError};
use crate::validation::FieldError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub const MISSING_FILE_MESSAGE: &str =
    "Nenhum arquivo foi enviado. Por favor, anexe um arquivo na chave \"media\".";
pub const NOT_REGISTERED_MESSAGE: &str =
    "O número de telefone informado não está registrado no WhatsApp.";
pub const TEXT_DELIVERY_MESSAGE: &str = "Ocorreu um erro interno ao tentar enviar a mensagem.";
pub const MEDIA_DELIVERY_MESSAGE: &str = "Ocorreu um erro interno ao tentar enviar a mídia.";
pub const RATE_LIMIT_MESSAGE: &str =
    "Limite de requisições excedido. Tente novamente em instantes.";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("No file attached")]
    MissingFile,

    #[error("Address not registered: {0}")]
    NotRegistered(String),

    /// The cause has already been logged and is not exposed to the caller.
    #[error("Failed to deliver {0}")]
    Delivery(PayloadKind),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::NotRegistered(_) => StatusCode::NOT_FOUND,
            ApiError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<SendError> for ApiError {
    fn from(e: SendError) -> Self {
        match e {
            SendError::NotRegistered(address) => ApiError::NotRegistered(address),
            SendError::Delivery { kind, .. } => ApiError::Delivery(kind),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::Validation(errors) => {
                return (status, Json(ValidationResponse { errors })).into_response();
            }
            ApiError::MissingFile => MISSING_FILE_MESSAGE,
            ApiError::NotRegistered(_) => NOT_REGISTERED_MESSAGE,
            ApiError::Delivery(PayloadKind::Text) => TEXT_DELIVERY_MESSAGE,
            ApiError::Delivery(PayloadKind::Media) => MEDIA_DELIVERY_MESSAGE,
            ApiError::RateLimitExceeded => RATE_LIMIT_MESSAGE,
        };

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}
