//! Process-local fan-out.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::DuelError;

use super::{Broadcaster, Viewer};

/// Viewer sets keyed by session id, visible to this process only.
#[derive(Default)]
pub struct LocalBroadcaster {
    viewers: DashMap<String, Vec<Viewer>>,
}

impl LocalBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live viewers of `id`.
    pub fn viewer_count(&self, id: &str) -> usize {
        self.viewers.get(id).map_or(0, |set| set.len())
    }

    /// Deliver `payload` to every viewer of `id`, dropping viewers whose
    /// connection has closed. Returns the number reached.
    pub fn deliver(&self, id: &str, payload: &str) -> usize {
        let delivered = match self.viewers.get_mut(id) {
            Some(mut set) => {
                set.retain(|viewer| viewer.send(payload));
                set.len()
            }
            None => return 0,
        };

        if delivered == 0 {
            self.viewers.remove_if(id, |_, set| set.is_empty());
        }
        delivered
    }

    pub(crate) fn add(&self, id: &str, viewer: Viewer) {
        let mut set = self.viewers.entry(id.to_string()).or_default();
        if !set.iter().any(|v| v.id() == viewer.id()) {
            set.push(viewer);
        }
    }

    pub(crate) fn remove(&self, id: &str, viewer_id: &str) {
        if let Some(mut set) = self.viewers.get_mut(id) {
            set.retain(|v| v.id() != viewer_id);
        }
        self.viewers.remove_if(id, |_, set| set.is_empty());
    }
}

#[async_trait]
impl Broadcaster for LocalBroadcaster {
    async fn subscribe(&self, id: &str, viewer: Viewer) -> Result<(), DuelError> {
        self.add(id, viewer);
        Ok(())
    }

    async fn unsubscribe(&self, id: &str, viewer_id: &str) -> Result<(), DuelError> {
        self.remove(id, viewer_id);
        Ok(())
    }

    async fn broadcast(&self, id: &str, payload: &str) -> Result<(), DuelError> {
        let delivered = self.deliver(id, payload);
        tracing::debug!(session = %id, delivered, "broadcast to local viewers");
        Ok(())
    }
}
