//! The messaging client seam.

use crate::error::ClientError;
use crate::types::{MediaOptions, MessageMedia};
use async_trait::async_trait;

/// Operations the gateway needs from a connected WhatsApp session.
///
/// Implementations own the session and process commands in submission order;
/// callers never lock around them.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Whether `address` belongs to a WhatsApp account.
    async fn is_registered_address(&self, address: &str) -> Result<bool, ClientError>;

    /// Send a plain text message.
    async fn send_text(&self, address: &str, text: &str) -> Result<(), ClientError>;

    /// Send a media attachment.
    async fn send_media(
        &self,
        address: &str,
        media: &MessageMedia,
        options: &MediaOptions,
    ) -> Result<(), ClientError>;

    /// Check if the session backend is reachable.
    async fn health_check(&self) -> bool;
}
