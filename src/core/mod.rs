//! Core types: hexagons, pieces, players, moves, RNG, configuration.
//!
//! Everything here is a plain value with no knowledge of game rules.
//! The rules layer (`crate::rules`) and the session layer
//! (`crate::session`) are built on top.

pub mod action;
pub mod config;
pub mod hexagon;
pub mod piece;
pub mod player;
pub mod rng;

pub use action::{Move, MoveRecord};
pub use config::{DuelConfig, SeatPreference};
pub use hexagon::{Direction, Hexagon, FILES, HEXAGON_COUNT, MAX_RANKS, MIDPOINT, RANKS_PER_FILE};
pub use piece::{Color, Piece, PieceKind};
pub use player::{ColorMap, Player};
pub use rng::GameRng;
