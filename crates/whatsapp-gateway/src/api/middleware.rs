//! Rate limiting and request logging middleware.

use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};
use tracing::{debug, warn};

/// Global rate limiter (not keyed by caller).
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    /// Global limiter for send requests; `None` when limiting is off
    pub global: Option<Arc<GlobalLimiter>>,
}

impl RateLimitState {
    /// Allow `requests_per_minute` sends across all callers. Zero turns
    /// limiting off.
    pub fn new(requests_per_minute: u32) -> Self {
        let global = NonZeroU32::new(requests_per_minute)
            .map(|rpm| Arc::new(RateLimiter::direct(Quota::per_minute(rpm))));

        Self { global }
    }

    /// No limiting.
    pub fn disabled() -> Self {
        Self { global: None }
    }

    fn check(&self) -> bool {
        self.global
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}

/// Rate limiting middleware.
///
/// Returns 429 Too Many Requests once the global quota is spent.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !rate_limit.check() {
        warn!("Global rate limit exceeded");
        return Err(ApiError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_exhaustion() {
        let state = RateLimitState::new(1);

        assert!(state.check());
        // Second request in the same minute is refused
        assert!(!state.check());
    }

    #[test]
    fn test_zero_disables_limiting() {
        let state = RateLimitState::new(0);
        assert!(state.global.is_none());
        for _ in 0..100 {
            assert!(state.check());
        }
    }

    #[test]
    fn test_disabled() {
        let state = RateLimitState::disabled();
        for _ in 0..100 {
            assert!(state.check());
        }
    }
}
