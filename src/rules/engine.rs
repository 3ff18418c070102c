//! Game outcomes.

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    Checkmate,
    Forfeit,
}

/// Result of a completed game.
///
/// There are no draws: a duel only ends by checkmate or forfeit, and both
/// have exactly one winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Color,
    pub reason: EndReason,
}

impl GameResult {
    #[must_use]
    pub const fn checkmate(winner: Color) -> Self {
        Self {
            winner,
            reason: EndReason::Checkmate,
        }
    }

    /// `loser` gave up; the other side wins.
    #[must_use]
    pub const fn forfeit(loser: Color) -> Self {
        Self {
            winner: loser.opposite(),
            reason: EndReason::Forfeit,
        }
    }

    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        self.winner == color
    }

    #[must_use]
    pub fn loser(&self) -> Color {
        self.winner.opposite()
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            EndReason::Checkmate => write!(f, "{} wins by checkmate", self.winner),
            EndReason::Forfeit => write!(f, "{} wins by forfeit", self.winner),
        }
    }
}
