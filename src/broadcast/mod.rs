//! Fan-out of session updates to connected viewers.
//!
//! A viewer is any open connection watching a session, seated player or
//! spectator alike. The transport owns the socket; this module only sees
//! the sending half of a channel feeding it.
//!
//! - `LocalBroadcaster`: viewers connected to this process
//! - `GlobalBroadcaster`: viewers connected to any process, via a `Relay`

pub mod global;
pub mod local;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::DuelError;

pub use global::{GlobalBroadcaster, MemoryRelay, Relay};
pub use local::LocalBroadcaster;

/// Sending half of one viewer connection.
#[derive(Clone, Debug)]
pub struct Viewer {
    id: String,
    tx: mpsc::UnboundedSender<String>,
}

impl Viewer {
    pub fn new(id: impl Into<String>, tx: mpsc::UnboundedSender<String>) -> Self {
        Self { id: id.into(), tx }
    }

    /// A viewer plus the receiver the transport drains into its socket.
    pub fn channel(id: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(id, tx), rx)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue a text frame. Returns false once the connection is gone.
    pub fn send(&self, payload: &str) -> bool {
        self.tx.send(payload.to_string()).is_ok()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Delivers payloads to every viewer of a session.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn subscribe(&self, id: &str, viewer: Viewer) -> Result<(), DuelError>;

    async fn unsubscribe(&self, id: &str, viewer_id: &str) -> Result<(), DuelError>;

    /// Send `payload` to every viewer of `id`.
    async fn broadcast(&self, id: &str, payload: &str) -> Result<(), DuelError>;
}
