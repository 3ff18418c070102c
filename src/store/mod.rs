//! Session persistence boundary.
//!
//! A `SessionStore` holds whole sessions keyed by id. Writers follow a
//! read-modify-write cycle: load, mutate in memory, write back.
//!
//! ## Consistency
//!
//! - `put` is last-write-wins. Two writers that loaded the same version
//!   silently clobber each other.
//! - `compare_and_put` only writes when the stored version still matches
//!   the version the writer loaded, and reports `DuelError::Conflict`
//!   otherwise. The service uses this one.
//!
//! Every successful write bumps the session's version and stamps its touch
//! time; the touch time drives both expiry and listing order.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DuelError;
use crate::session::DuelSession;

pub use memory::MemorySessionStore;

/// Position in a listing: the first entry of the next page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCursor {
    pub touched_at: DateTime<Utc>,
    pub id: String,
}

/// One page of session ids, most recently touched first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPage {
    pub ids: Vec<String>,
    /// `None` on the last page.
    pub next_cursor: Option<ScanCursor>,
}

/// Storage for duel sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session.
    async fn get(&self, id: &str) -> Result<Option<DuelSession>, DuelError>;

    /// Write unconditionally. Returns the session as stored.
    async fn put(&self, id: &str, session: DuelSession) -> Result<DuelSession, DuelError>;

    /// Write only if the stored version equals `expected_version`.
    ///
    /// An absent session has version 0.
    async fn compare_and_put(
        &self,
        id: &str,
        session: DuelSession,
        expected_version: u64,
    ) -> Result<DuelSession, DuelError>;

    /// Remove a session. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool, DuelError>;

    /// Page through ids, starting at `cursor` (or the newest session).
    async fn scan_ids(
        &self,
        cursor: Option<ScanCursor>,
        count: usize,
    ) -> Result<ScanPage, DuelError>;

    /// Delete sessions untouched for at least `max_age`. Returns how many.
    async fn expire(&self, max_age: Duration) -> Result<usize, DuelError>;
}
