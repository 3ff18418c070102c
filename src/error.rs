//! Error taxonomy for the engine, sessions, store and broadcaster.
//!
//! ## Classes
//!
//! - **User errors** (`InvalidMove`, `InvalidNotation`, `InvalidCommand`):
//!   reported back to the requesting client only. The session is untouched.
//! - **Invariant violations**: a board without a king, a move cache queried
//!   before it was ever computed. Fatal for the operation in progress.
//! - **Infrastructure** (`Store`, `Encoding`, `Broadcast`, `Conflict`):
//!   propagated as-is, never retried here.

/// Errors produced by `hex-duel`.
#[derive(Debug, thiserror::Error)]
pub enum DuelError {
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    #[error("invalid hexagon notation: {notation:?}")]
    InvalidNotation { notation: String },

    #[error("invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error("session {id} not found")]
    SessionNotFound { id: String },

    #[error("session {id} was modified concurrently")]
    Conflict { id: String },

    #[error("store error: {reason}")]
    Store {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("failed to encode outbound message")]
    Encoding {
        #[source]
        source: serde_json::Error,
    },

    /// Delivery failure reported by a relay or transport.
    #[error("broadcast error: {reason}")]
    Broadcast { reason: String },
}

impl DuelError {
    /// Shorthand for an `InvalidMove` error.
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        DuelError::InvalidMove {
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InvariantViolation` error.
    pub fn invariant(reason: impl Into<String>) -> Self {
        DuelError::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Errors caused by the requester rather than by the system.
    ///
    /// These are answered with an error message to the requester only.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DuelError::InvalidMove { .. }
                | DuelError::InvalidNotation { .. }
                | DuelError::InvalidCommand { .. }
        )
    }
}

impl From<bincode::Error> for DuelError {
    fn from(err: bincode::Error) -> Self {
        let source: Box<dyn std::error::Error + Send + Sync> = err;
        DuelError::Store {
            reason: "session encoding failed".into(),
            source: Some(source),
        }
    }
}
