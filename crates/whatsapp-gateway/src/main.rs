//! WhatsApp Gateway - Entry point.

use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whatsapp_client::{BridgeClient, EventReceiver};
use whatsapp_gateway::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    Lifecycle,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let addr = match config.server.socket_addr() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting WhatsApp client");

    let client = match BridgeClient::new(
        &config.whatsapp.bridge_url,
        config.whatsapp.request_timeout,
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create bridge client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.initialize().await {
        error!(
            "Failed to start session on bridge at {}: {}",
            config.whatsapp.bridge_url, e
        );
        std::process::exit(1);
    }

    // Routes are not mounted until the session is ready
    let receiver = EventReceiver::new(client.clone(), config.whatsapp.event_poll_interval);
    let mut events = Box::pin(receiver.stream());
    let mut lifecycle = Lifecycle::new();

    if let Err(e) = lifecycle.wait_until_ready(&mut events).await {
        error!("{}", e);
        std::process::exit(1);
    }

    let state = AppState::new(Arc::new(client));
    let rate_limit = RateLimitState::new(config.rate_limit.per_minute);
    let app = create_router_with_rate_limit(state, rate_limit, config.server.max_body_bytes);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);
    info!("Send endpoint: POST http://{}/api/send-message", addr);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        fatal = lifecycle.watch(&mut events) => {
            error!("{}", fatal);
            std::process::exit(1);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }
}
