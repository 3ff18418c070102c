//! Read-modify-write driver over a store and a broadcaster.
//!
//! Every command loads the session, applies the change in memory and
//! writes it back with `compare_and_put`. When another writer got there
//! first the command is re-validated against the fresh session, up to
//! `DuelConfig::write_attempts` times. No lock is held across a store or
//! broadcaster call.
//!
//! Successful changes are broadcast to every viewer of the session; user
//! errors go back to the offending viewer only.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::broadcast::{Broadcaster, Viewer};
use crate::core::{DuelConfig, GameRng, Move, Player, SeatPreference};
use crate::error::DuelError;
use crate::store::{ScanCursor, ScanPage, SessionStore};

use super::duel::{DuelSession, JoinOutcome};
use super::messages::{InboundCommand, OutboundMessage};

/// Session service.
///
/// ## Usage
///
/// ```
/// use std::sync::Arc;
/// use hex_duel::broadcast::LocalBroadcaster;
/// use hex_duel::core::{DuelConfig, Move, Player, SeatPreference};
/// use hex_duel::session::DuelService;
/// use hex_duel::store::MemorySessionStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = DuelService::new(
///     Arc::new(MemorySessionStore::new()),
///     Arc::new(LocalBroadcaster::new()),
///     DuelConfig::default(),
/// );
///
/// let id = service.create(SeatPreference::PreferWhite).await.unwrap();
/// let alice = Player::new("p1", "Alice");
/// service.join(&id, alice.clone()).await.unwrap();
/// service.join(&id, Player::new("p2", "Bob")).await.unwrap();
///
/// let session = service
///     .make_move(&id, &alice, Move::parse("f5", "f6").unwrap())
///     .await
///     .unwrap();
/// assert_eq!(session.history().len(), 1);
/// # });
/// ```
pub struct DuelService<S, B> {
    store: Arc<S>,
    broadcaster: Arc<B>,
    config: DuelConfig,
    rng: Mutex<GameRng>,
}

impl<S: SessionStore, B: Broadcaster> DuelService<S, B> {
    pub fn new(store: Arc<S>, broadcaster: Arc<B>, config: DuelConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            store,
            broadcaster,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn broadcaster(&self) -> &Arc<B> {
        &self.broadcaster
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    // === Sessions ===

    /// Create an empty session and return its id.
    pub async fn create(&self, preference: SeatPreference) -> Result<String, DuelError> {
        let id = Uuid::new_v4().to_string();
        let session = {
            let mut rng = self.rng.lock();
            DuelSession::new(id.clone(), preference, &mut rng)?
        };
        let first_seat = session.first_seat();

        self.store.compare_and_put(&id, session, 0).await?;
        tracing::info!(session = %id, first_seat = %first_seat, "created session");
        Ok(id)
    }

    /// Load a session.
    pub async fn get(&self, id: &str) -> Result<DuelSession, DuelError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DuelError::SessionNotFound { id: id.to_string() })
    }

    /// Seat `player` if there is room. Only writes when a seat changed.
    pub async fn join(&self, id: &str, player: Player) -> Result<DuelSession, DuelError> {
        let (session, outcome) = self
            .update(id, |session| {
                let outcome = session.join(player.clone());
                Ok((outcome, outcome.changed()))
            })
            .await?;

        match outcome {
            JoinOutcome::Seated(color) => {
                tracing::info!(session = %id, player = %player.id, color = %color, "player joined");
            }
            JoinOutcome::AlreadySeated(_) | JoinOutcome::Spectator => {
                tracing::debug!(session = %id, player = %player.id, ?outcome, "join left seats unchanged");
            }
        }
        Ok(session)
    }

    /// Join, start watching, and announce the newcomer to every viewer.
    pub async fn connect(
        &self,
        id: &str,
        player: Player,
        viewer: Viewer,
    ) -> Result<DuelSession, DuelError> {
        let session = self.join(id, player.clone()).await?;
        self.broadcaster.subscribe(id, viewer).await?;

        let message = OutboundMessage::Join {
            player,
            session: session.snapshot(),
        };
        self.broadcaster.broadcast(id, &message.to_json()?).await?;
        Ok(session)
    }

    /// Stop delivering updates to a viewer.
    pub async fn disconnect(&self, id: &str, viewer_id: &str) -> Result<(), DuelError> {
        self.broadcaster.unsubscribe(id, viewer_id).await
    }

    /// Validate, apply, store and broadcast a move.
    pub async fn make_move(
        &self,
        id: &str,
        player: &Player,
        mv: Move,
    ) -> Result<DuelSession, DuelError> {
        let (session, outcome) = self
            .update(id, |session| match session.make_move(player, mv) {
                Ok(outcome) => Ok((outcome, true)),
                Err(err) => {
                    if err.is_user_error() {
                        tracing::debug!(
                            session = %id,
                            player = %player.id,
                            error = %err,
                            board = %session.board(),
                            "rejected move"
                        );
                    }
                    Err(err)
                }
            })
            .await?;

        tracing::info!(session = %id, player = %player.id, record = %outcome.record, check = outcome.check, "move applied");
        if let Some(result) = outcome.result {
            tracing::info!(session = %id, %result, "session ended");
        }

        let message = OutboundMessage::Move {
            mv: mv.into(),
            session: session.snapshot(),
        };
        self.broadcaster.broadcast(id, &message.to_json()?).await?;
        Ok(session)
    }

    /// End the session in the opponent's favour and broadcast it.
    pub async fn forfeit(&self, id: &str, player: &Player) -> Result<DuelSession, DuelError> {
        let (session, result) = self
            .update(id, |session| session.forfeit(player).map(|result| (result, true)))
            .await?;

        tracing::info!(session = %id, player = %player.id, %result, "session ended");

        let message = OutboundMessage::Forfeit {
            session: session.snapshot(),
        };
        self.broadcaster.broadcast(id, &message.to_json()?).await?;
        Ok(session)
    }

    /// Handle a raw inbound text frame from `viewer`.
    ///
    /// User errors are answered with an `ERROR` message to `viewer` and
    /// count as handled. Anything else is returned.
    pub async fn handle_message(
        &self,
        id: &str,
        player: &Player,
        viewer: &Viewer,
        raw: &str,
    ) -> Result<(), DuelError> {
        let handled = match InboundCommand::parse(raw) {
            Ok(InboundCommand::Move { mv }) => match mv.to_move() {
                Ok(mv) => self.make_move(id, player, mv).await.map(|_| ()),
                Err(err) => Err(err),
            },
            Ok(InboundCommand::Forfeit) => self.forfeit(id, player).await.map(|_| ()),
            Err(err) => Err(err),
        };

        match handled {
            Err(err) if err.is_user_error() => {
                let reply = OutboundMessage::error(err.to_string()).to_json()?;
                if !viewer.send(&reply) {
                    tracing::debug!(session = %id, viewer = viewer.id(), "viewer gone before error reply");
                }
                Ok(())
            }
            other => other,
        }
    }

    // === Listing & expiry ===

    /// Sweep expired sessions, then return one page of ids.
    pub async fn list(&self, cursor: Option<ScanCursor>) -> Result<ScanPage, DuelError> {
        self.reap_expired().await?;
        self.store.scan_ids(cursor, self.config.scan_page_size).await
    }

    /// Delete sessions idle for longer than the configured TTL.
    pub async fn reap_expired(&self) -> Result<usize, DuelError> {
        self.store.expire(self.config.session_ttl).await
    }

    // === Internals ===

    /// Load, apply, and conditionally write back.
    ///
    /// `apply` returns its output plus whether the session must be written.
    /// On a version conflict the session is reloaded and `apply` runs again.
    async fn update<T, F>(&self, id: &str, mut apply: F) -> Result<(DuelSession, T), DuelError>
    where
        T: Send,
        F: FnMut(&mut DuelSession) -> Result<(T, bool), DuelError> + Send,
    {
        let attempts = self.config.write_attempts.max(1);

        for attempt in 1..=attempts {
            let mut session = self.get(id).await?;
            let expected = session.version();

            let (output, write) = match apply(&mut session) {
                Ok(applied) => applied,
                Err(err) => {
                    if let DuelError::InvariantViolation { reason } = &err {
                        tracing::error!(session = %id, %reason, "invariant violated");
                    }
                    return Err(err);
                }
            };
            if !write {
                return Ok((session, output));
            }

            match self.store.compare_and_put(id, session, expected).await {
                Ok(stored) => return Ok((stored, output)),
                Err(DuelError::Conflict { .. }) => {
                    tracing::warn!(session = %id, attempt, attempts, "concurrent write, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(DuelError::Conflict { id: id.to_string() })
    }
}
