//! WhatsApp messaging client.
//!
//! The WhatsApp web session itself lives in an automation bridge process. This
//! crate defines the [`MessagingClient`] seam the gateway depends on and a
//! [`BridgeClient`] that implements it over the bridge's HTTP API.

mod client;
mod error;
mod messaging;
mod receiver;
mod types;

pub use client::BridgeClient;
pub use error::ClientError;
#[cfg(feature = "mock")]
pub use messaging::MockMessagingClient;
pub use messaging::MessagingClient;
pub use receiver::EventReceiver;
pub use types::*;
