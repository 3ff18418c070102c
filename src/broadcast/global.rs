//! Cross-process fan-out over a shared relay channel.
//!
//! ## Frames
//!
//! Each broadcast is published on the relay as a single text frame:
//!
//! ```text
//! <session id> 0x1E <payload>
//! ```
//!
//! Every process runs one listener task that splits incoming frames and
//! hands the payload to its `LocalBroadcaster`. A process also hears its
//! own frames, which is how its local viewers get served. Subscriptions
//! never leave the process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::DuelError;

use super::local::LocalBroadcaster;
use super::{Broadcaster, Viewer};

/// Separator between session id and payload (ASCII record separator).
pub const FRAME_SEPARATOR: char = '\u{1e}';

/// Build a relay frame.
#[must_use]
pub fn encode_frame(id: &str, payload: &str) -> String {
    let mut frame = String::with_capacity(id.len() + 1 + payload.len());
    frame.push_str(id);
    frame.push(FRAME_SEPARATOR);
    frame.push_str(payload);
    frame
}

/// Split a relay frame into `(id, payload)`.
#[must_use]
pub fn decode_frame(frame: &str) -> Option<(&str, &str)> {
    frame.split_once(FRAME_SEPARATOR)
}

/// Pub/sub channel shared by every process.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Publish a frame to every subscriber, this process included.
    async fn publish(&self, frame: String) -> Result<(), DuelError>;

    /// Open a new subscription.
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// In-process relay. Clones share one channel, standing in for several
/// processes connected to the same pub/sub server.
#[derive(Clone)]
pub struct MemoryRelay {
    tx: broadcast::Sender<String>,
}

impl MemoryRelay {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for MemoryRelay {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Relay for MemoryRelay {
    async fn publish(&self, frame: String) -> Result<(), DuelError> {
        // No subscribers means no process is listening; nothing to deliver.
        let _ = self.tx.send(frame);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

/// Broadcaster that reaches viewers connected to any process.
pub struct GlobalBroadcaster {
    local: Arc<LocalBroadcaster>,
    relay: Arc<dyn Relay>,
    listener: JoinHandle<()>,
}

impl GlobalBroadcaster {
    /// Start listening on `relay`. Must be called inside a tokio runtime.
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let local = Arc::new(LocalBroadcaster::new());
        let frames = relay.subscribe();
        let listener = tokio::spawn(listen(frames, local.clone()));
        Self {
            local,
            relay,
            listener,
        }
    }

    /// The process-local viewer registry.
    pub fn local(&self) -> &LocalBroadcaster {
        &self.local
    }
}

impl Drop for GlobalBroadcaster {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn listen(mut frames: broadcast::Receiver<String>, local: Arc<LocalBroadcaster>) {
    loop {
        match frames.recv().await {
            Ok(frame) => match decode_frame(&frame) {
                Some((id, payload)) => {
                    let delivered = local.deliver(id, payload);
                    tracing::debug!(session = %id, delivered, "relayed broadcast");
                }
                None => tracing::warn!(len = frame.len(), "dropping relay frame without separator"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "relay listener lagged, frames lost");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[async_trait]
impl Broadcaster for GlobalBroadcaster {
    async fn subscribe(&self, id: &str, viewer: Viewer) -> Result<(), DuelError> {
        self.local.add(id, viewer);
        Ok(())
    }

    async fn unsubscribe(&self, id: &str, viewer_id: &str) -> Result<(), DuelError> {
        self.local.remove(id, viewer_id);
        Ok(())
    }

    async fn broadcast(&self, id: &str, payload: &str) -> Result<(), DuelError> {
        self.relay.publish(encode_frame(id, payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_frame_roundtrip() {
        let frame = encode_frame("duel-1", r#"{"type":"MOVE"}"#);
        assert_eq!(decode_frame(&frame), Some(("duel-1", r#"{"type":"MOVE"}"#)));
        assert_eq!(decode_frame("no separator"), None);
    }

    #[test]
    fn test_payload_may_contain_separator() {
        let frame = encode_frame("id", "a\u{1e}b");
        assert_eq!(decode_frame(&frame), Some(("id", "a\u{1e}b")));
    }

    #[tokio::test]
    async fn test_broadcast_crosses_processes() {
        let relay: Arc<dyn Relay> = Arc::new(MemoryRelay::default());
        let a = GlobalBroadcaster::new(relay.clone());
        let b = GlobalBroadcaster::new(relay);

        let (on_a, mut a_rx) = Viewer::channel("on-a");
        let (on_b, mut b_rx) = Viewer::channel("on-b");
        a.subscribe("duel", on_a).await.unwrap();
        b.subscribe("duel", on_b).await.unwrap();

        a.broadcast("duel", "hello").await.unwrap();

        let wait = Duration::from_secs(1);
        assert_eq!(timeout(wait, a_rx.recv()).await.unwrap().as_deref(), Some("hello"));
        assert_eq!(timeout(wait, b_rx.recv()).await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_malformed_frames_are_skipped() {
        let relay = Arc::new(MemoryRelay::default());
        let broadcaster = GlobalBroadcaster::new(relay.clone());
        let (viewer, mut rx) = Viewer::channel("v");
        broadcaster.subscribe("duel", viewer).await.unwrap();

        relay.publish("garbage".to_string()).await.unwrap();
        broadcaster.broadcast("duel", "ok").await.unwrap();

        let got = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got.as_deref(), Some("ok"));
    }
}
