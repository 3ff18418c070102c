//! Session service configuration.
//!
//! Loading configuration from files or the environment is the embedding
//! application's job; this is only the typed value it hands over.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which colour the first player to join a fresh session receives.
///
/// `Random` is resolved by a coin flip when the session is created, so a
/// stored session always knows its first seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatPreference {
    PreferWhite,
    PreferBlack,
    #[default]
    Random,
}

/// Session service parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuelConfig {
    /// Sessions untouched for longer than this are reclaimed (default: 1 hour).
    pub session_ttl: Duration,

    /// Number of session ids per listing page (default: 20).
    pub scan_page_size: usize,

    /// Attempts at an optimistic write before giving up with a conflict
    /// (default: 3). Each attempt reloads and re-validates the session.
    pub write_attempts: u32,

    /// Seed for seat assignment coin flips. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(60 * 60),
            scan_page_size: 20,
            write_attempts: 3,
            seed: None,
        }
    }
}

impl DuelConfig {
    /// Set the expiry age for idle sessions.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the listing page size.
    pub fn with_scan_page_size(mut self, size: usize) -> Self {
        self.scan_page_size = size;
        self
    }

    /// Set the number of optimistic write attempts.
    pub fn with_write_attempts(mut self, attempts: u32) -> Self {
        self.write_attempts = attempts;
        self
    }

    /// Seed the seat assignment RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
