//! Game rules.
//!
//! - `movegen`: pseudo-legal targets for each piece type
//! - `check`: attack maps
//! - `game`: board + cached move lists, the refresh protocol, check and
//!   checkmate
//! - `engine`: game outcomes
//!
//! The session layer only ever talks to `ChessGame`.

pub mod check;
pub mod engine;
pub mod game;
pub mod movegen;

pub use check::AttackMap;
pub use engine::{EndReason, GameResult};
pub use game::{ChessGame, MoveCache};
pub use movegen::{MoveGenerator, PieceMoves};
