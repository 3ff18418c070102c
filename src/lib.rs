//! # hex-duel
//!
//! Rules engine and live-session coordinator for two-player chess on a
//! 91-cell hexagonal board.
//!
//! ## Design Principles
//!
//! 1. **Geometry as a branch, not a library**: the board's irregular
//!    adjacency is a single `file <= midpoint` test inside
//!    `Hexagon::walk`. Every move rule is a table of direction walks.
//!
//! 2. **One refresh, many queries**: legal moves, attack maps and check
//!    state are computed together after each move and cached on the game
//!    until the board changes again.
//!
//! 3. **Sessions are values**: a `DuelSession` is loaded, mutated in
//!    memory and written back whole. Concurrent writers are detected with
//!    a version check rather than a lock.
//!
//! ## Modules
//!
//! - `core`: Hexagons, pieces, players, moves, RNG, configuration
//! - `board`: Piece storage, starting position, rendering
//! - `rules`: Move generation, attack maps, check and checkmate
//! - `session`: Duel state machine, wire messages, session service
//! - `store`: Session persistence boundary and in-memory store
//! - `broadcast`: Local and cross-process viewer fan-out
//! - `error`: `DuelError`

pub mod board;
pub mod broadcast;
pub mod core;
pub mod error;
pub mod rules;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    Color, ColorMap, Direction, DuelConfig, GameRng, Hexagon, Move, MoveRecord, Piece, PieceKind,
    Player, SeatPreference,
};

pub use crate::board::Board;

pub use crate::rules::{AttackMap, ChessGame, EndReason, GameResult, MoveGenerator, PieceMoves};

pub use crate::session::{
    DuelService, DuelSession, InboundCommand, JoinOutcome, MoveOutcome, OutboundMessage,
    SessionSnapshot,
};

pub use crate::store::{MemorySessionStore, ScanCursor, ScanPage, SessionStore};

pub use crate::broadcast::{
    Broadcaster, GlobalBroadcaster, LocalBroadcaster, MemoryRelay, Relay, Viewer,
};

pub use crate::error::DuelError;
