//! In-memory session store.
//!
//! Sessions are kept bincode-encoded, exactly as a remote key-value store
//! would hold them, so every `get` hands out an independent copy. A
//! recency index ordered newest-first serves listings and expiry.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::DuelError;
use crate::session::DuelSession;

use super::{ScanCursor, ScanPage, SessionStore};

/// Source of "now" for touch stamps and expiry.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

type RecencyKey = (Reverse<DateTime<Utc>>, String);

/// In-memory `SessionStore` for tests and single-process deployments.
pub struct MemorySessionStore {
    inner: Mutex<Inner>,
    clock: Clock,
}

#[derive(Default)]
struct Inner {
    sessions: FxHashMap<String, Stored>,
    recency: BTreeSet<RecencyKey>,
}

struct Stored {
    bytes: Vec<u8>,
    version: u64,
    touched_at: DateTime<Utc>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Use a custom clock. Tests use this to age sessions.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
        }
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stamp, encode and insert. The caller has already checked versions.
    fn write(
        &self,
        inner: &mut Inner,
        id: &str,
        mut session: DuelSession,
        version: u64,
    ) -> Result<DuelSession, DuelError> {
        let now = (self.clock)();
        session.stamp(version, now);
        let bytes = bincode::serialize(&session)?;

        if let Some(previous) = inner.sessions.insert(
            id.to_string(),
            Stored {
                bytes,
                version,
                touched_at: now,
            },
        ) {
            inner
                .recency
                .remove(&(Reverse(previous.touched_at), id.to_string()));
        }
        inner.recency.insert((Reverse(now), id.to_string()));

        Ok(session)
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<DuelSession>, DuelError> {
        let inner = self.inner.lock();
        match inner.sessions.get(id) {
            Some(stored) => Ok(Some(bincode::deserialize(&stored.bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, id: &str, session: DuelSession) -> Result<DuelSession, DuelError> {
        let mut inner = self.inner.lock();
        let version = inner.sessions.get(id).map_or(0, |s| s.version) + 1;
        self.write(&mut inner, id, session, version)
    }

    async fn compare_and_put(
        &self,
        id: &str,
        session: DuelSession,
        expected_version: u64,
    ) -> Result<DuelSession, DuelError> {
        let mut inner = self.inner.lock();
        let current = inner.sessions.get(id).map_or(0, |s| s.version);
        if current != expected_version {
            return Err(DuelError::Conflict { id: id.to_string() });
        }
        self.write(&mut inner, id, session, current + 1)
    }

    async fn delete(&self, id: &str) -> Result<bool, DuelError> {
        let mut inner = self.inner.lock();
        match inner.sessions.remove(id) {
            Some(stored) => {
                inner
                    .recency
                    .remove(&(Reverse(stored.touched_at), id.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn scan_ids(
        &self,
        cursor: Option<ScanCursor>,
        count: usize,
    ) -> Result<ScanPage, DuelError> {
        let inner = self.inner.lock();

        // One extra entry tells us where the next page starts.
        let mut entries: Vec<&RecencyKey> = match cursor {
            Some(cursor) => inner
                .recency
                .range((Reverse(cursor.touched_at), cursor.id)..)
                .take(count + 1)
                .collect(),
            None => inner.recency.iter().take(count + 1).collect(),
        };

        let next_cursor = if entries.len() > count {
            entries.pop().map(|(Reverse(touched_at), id)| ScanCursor {
                touched_at: *touched_at,
                id: id.clone(),
            })
        } else {
            None
        };

        Ok(ScanPage {
            ids: entries.into_iter().map(|(_, id)| id.clone()).collect(),
            next_cursor,
        })
    }

    async fn expire(&self, max_age: Duration) -> Result<usize, DuelError> {
        let max_age = chrono::Duration::from_std(max_age).map_err(|err| DuelError::Store {
            reason: format!("expiry age out of range: {max_age:?}"),
            source: Some(Box::new(err)),
        })?;
        let cutoff = (self.clock)() - max_age;

        let mut inner = self.inner.lock();
        let stale: Vec<RecencyKey> = inner
            .recency
            .range((Reverse(cutoff), String::new())..)
            .cloned()
            .collect();

        for key in &stale {
            inner.recency.remove(key);
            inner.sessions.remove(&key.1);
        }

        if !stale.is_empty() {
            tracing::debug!(expired = stale.len(), cutoff = %cutoff, "expired idle sessions");
        }
        Ok(stale.len())
    }
}
