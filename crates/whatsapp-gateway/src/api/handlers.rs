//! HTTP request handlers.

use super::types::{ApiResponse, HealthResponse, MediaForm, SendTextRequest};
use super::AppState;
use crate::error::ApiError;
use crate::validation::{self, FieldError};
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = state.client.health_check().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        messaging_client_healthy: healthy,
    })
}

/// Send a text message.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendTextRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::Validation(vec![FieldError::body(e.body_text())]))?;
    let text = validation::validate_text(request)?;

    info!(number = %text.number, "Send message request received");

    let confirmation = state
        .messenger
        .send_text(&text.number, &text.message)
        .await?;

    Ok(Json(ApiResponse::ok(confirmation.to_string())))
}

/// Send a file, with an optional caption.
pub async fn send_media(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let form = match multipart {
        Ok(mut multipart) => MediaForm::read(&mut multipart).await?,
        // A body that is not multipart carries no attachment
        Err(MultipartRejection::InvalidBoundary(_)) => MediaForm::default(),
        Err(e) => return Err(ApiError::Validation(vec![FieldError::body(e.body_text())])),
    };
    let media = validation::validate_media(form)?;

    info!(
        number = %media.number,
        file_name = %media.upload.file_name,
        mime_type = %media.upload.mime_type,
        size = media.upload.bytes.len(),
        "Send media request received"
    );

    let confirmation = state
        .messenger
        .send_media(&media.number, media.caption.as_deref(), &media.upload)
        .await?;

    Ok(Json(ApiResponse::ok(confirmation.to_string())))
}
