//! Move representation.
//!
//! A `Move` is just an origin and a destination; the piece travelling is
//! whatever stands on the origin when the move is applied. Legality is
//! decided by the rules layer, never here.

use serde::{Deserialize, Serialize};

use super::hexagon::Hexagon;
use super::piece::Color;
use crate::error::DuelError;

/// A move from one hexagon to another.
///
/// ## Example
///
/// ```
/// use hex_duel::core::{Hexagon, Move};
///
/// let mv = Move::parse("f5", "f6").unwrap();
/// assert_eq!(mv.from, Hexagon::new(5, 4));
/// assert_eq!(mv.to_string(), "f5-f6");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Hexagon,
    pub to: Hexagon,
}

impl Move {
    #[must_use]
    pub const fn new(from: Hexagon, to: Hexagon) -> Self {
        Self { from, to }
    }

    /// Build a move from two notation strings.
    pub fn parse(from: &str, to: &str) -> Result<Self, DuelError> {
        Ok(Self::new(from.parse()?, to.parse()?))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// A move tagged with the side that played it and its ply number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Side that made the move.
    pub color: Color,

    /// The move itself.
    pub mv: Move,

    /// Half-move number, starting at 1.
    pub ply: u32,
}

impl MoveRecord {
    #[must_use]
    pub fn new(color: Color, mv: Move, ply: u32) -> Self {
        Self { color, mv, ply }
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {} {}", self.ply, self.color, self.mv)
    }
}
