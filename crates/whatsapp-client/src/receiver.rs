//! Session event receiver with polling.

use crate::client::BridgeClient;
use crate::types::ClientEvent;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Event receiver that polls the bridge for session lifecycle events.
pub struct EventReceiver {
    client: BridgeClient,
    poll_interval: Duration,
}

impl EventReceiver {
    /// Create a new event receiver.
    pub fn new(client: BridgeClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    /// Start receiving events as an async stream.
    pub fn stream(self) -> impl Stream<Item = ClientEvent> {
        async_stream::stream! {
            loop {
                match self.client.poll_events().await {
                    Ok(events) => {
                        for event in events {
                            debug!(?event, "Session event");
                            yield event;
                        }
                    }
                    Err(e) => {
                        error!("Event poll error: {}", e);
                        // Back off on error
                        sleep(Duration::from_secs(5)).await;
                        continue;
                    }
                }

                sleep(self.poll_interval).await;
            }
        }
    }
}
