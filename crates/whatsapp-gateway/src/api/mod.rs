//! HTTP API for the gateway.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::send::Messenger;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use whatsapp_client::MessagingClient;

/// Default request body limit, large enough for typical media uploads.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Connected messaging client
    pub client: Arc<dyn MessagingClient>,
    /// Send orchestration over the same client
    pub messenger: Messenger,
}

impl AppState {
    /// Create new application state around a ready messaging client.
    pub fn new(client: Arc<dyn MessagingClient>) -> Self {
        Self {
            messenger: Messenger::new(client.clone()),
            client,
        }
    }
}

/// Create the API router without rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::disabled(), DEFAULT_MAX_BODY_BYTES)
}

/// Create the API router with rate limiting on the send endpoints.
pub fn create_router_with_rate_limit(
    state: AppState,
    rate_limit: RateLimitState,
    max_body_bytes: usize,
) -> Router {
    let send_routes = Router::new()
        .route("/send-message", post(handlers::send_message))
        .route("/send-media", post(handlers::send_media))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", send_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
