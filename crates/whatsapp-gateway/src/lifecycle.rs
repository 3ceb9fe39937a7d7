//! Session startup state machine.
//!
//! The HTTP surface is only mounted once the messaging client reports it is
//! ready. Authentication failure is terminal: a misconfigured session cannot
//! recover on its own, so the process has to stop.

use thiserror::Error;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};
use whatsapp_client::ClientEvent;

/// Session state as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    /// Waiting for the QR code to be scanned.
    Pairing,
    Authenticated,
    Ready,
    Failed(String),
}

impl SessionState {
    /// Next state after `event`. `Failed` absorbs everything.
    pub fn next(&self, event: &ClientEvent) -> SessionState {
        match (self, event) {
            (SessionState::Failed(reason), _) => SessionState::Failed(reason.clone()),
            (_, ClientEvent::AuthenticationFailed { reason }) => {
                SessionState::Failed(reason.clone())
            }
            // Routes are already mounted; a ready session stays ready.
            (SessionState::Ready, _) => SessionState::Ready,
            (_, ClientEvent::QrCodeReady { .. }) => SessionState::Pairing,
            (_, ClientEvent::Authenticated) => SessionState::Authenticated,
            (_, ClientEvent::Ready) => SessionState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Session event stream ended")]
    EventsClosed,
}

/// Tracks the session state while consuming lifecycle events.
#[derive(Debug)]
pub struct Lifecycle {
    state: SessionState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event, logging what the operator needs to see.
    pub fn apply(&mut self, event: &ClientEvent) -> &SessionState {
        let next = self.state.next(event);

        match event {
            ClientEvent::QrCodeReady { payload } if !self.state.is_ready() => {
                info!(qr = %payload, "QR code received, scan it with the phone to pair");
            }
            ClientEvent::QrCodeReady { .. } => {
                warn!("QR code received while ready, ignoring");
            }
            ClientEvent::Authenticated => info!("Session authenticated"),
            ClientEvent::Ready if !self.state.is_ready() => info!("WhatsApp client is ready"),
            ClientEvent::Ready => {}
            ClientEvent::AuthenticationFailed { .. } => {}
        }

        self.state = next;
        &self.state
    }

    /// Consume events until the session is ready.
    pub async fn wait_until_ready<S>(&mut self, events: &mut S) -> Result<(), LifecycleError>
    where
        S: Stream<Item = ClientEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            match self.apply(&event) {
                SessionState::Ready => return Ok(()),
                SessionState::Failed(reason) => {
                    return Err(LifecycleError::AuthenticationFailed(reason.clone()))
                }
                _ => {}
            }
        }

        Err(LifecycleError::EventsClosed)
    }

    /// Keep consuming events after startup; returns on the first fatal one.
    pub async fn watch<S>(&mut self, events: &mut S) -> LifecycleError
    where
        S: Stream<Item = ClientEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            if let SessionState::Failed(reason) = self.apply(&event) {
                return LifecycleError::AuthenticationFailed(reason.clone());
            }
        }

        LifecycleError::EventsClosed
    }
}
