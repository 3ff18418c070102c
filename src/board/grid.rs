//! Ragged piece storage and the turn flag.
//!
//! The `Board` stores one `Vec<Piece>` per file, each sized to the file's
//! length, so indexing by `[file][rank]` mirrors the physical outline. It
//! knows nothing about how pieces move; see `crate::rules`.

use serde::{Deserialize, Serialize};

use crate::core::hexagon::{FILES, MAX_RANKS, RANKS_PER_FILE};
use crate::core::{Color, Hexagon, Piece};
use crate::error::DuelError;

/// Piece placement plus side to move.
///
/// ## Usage
///
/// ```
/// use hex_duel::board::Board;
/// use hex_duel::core::{Color, Hexagon, Piece};
///
/// let mut board = Board::empty(Color::White);
/// let f6: Hexagon = "f6".parse().unwrap();
///
/// board.set_piece(f6, Piece::WHITE_KING);
/// assert_eq!(board.get_piece(f6), Piece::WHITE_KING);
/// assert_eq!(board.find_king(Color::White).unwrap(), f6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pieces: Vec<Vec<Piece>>,
    turn: Color,
}

impl Board {
    /// An empty board with `turn` to move.
    #[must_use]
    pub fn empty(turn: Color) -> Self {
        Self {
            pieces: RANKS_PER_FILE
                .iter()
                .map(|&ranks| vec![Piece::EMPTY; ranks])
                .collect(),
            turn,
        }
    }

    /// Rebuild a board from raw per-file piece bytes.
    ///
    /// Fails if the shape does not match the board outline.
    pub fn from_files(files: Vec<Vec<u8>>, turn: Color) -> Result<Self, DuelError> {
        if files.len() != FILES {
            return Err(DuelError::invariant(format!(
                "board has {} files, expected {}",
                files.len(),
                FILES
            )));
        }
        for (file, ranks) in files.iter().enumerate() {
            if ranks.len() != RANKS_PER_FILE[file] {
                return Err(DuelError::invariant(format!(
                    "file {} has {} ranks, expected {}",
                    file,
                    ranks.len(),
                    RANKS_PER_FILE[file]
                )));
            }
        }

        let pieces = files
            .into_iter()
            .map(|ranks| ranks.into_iter().map(Piece).collect())
            .collect();
        Ok(Self { pieces, turn })
    }

    /// Raw per-file piece bytes, the wire format of a snapshot.
    #[must_use]
    pub fn to_files(&self) -> Vec<Vec<u8>> {
        self.pieces
            .iter()
            .map(|ranks| ranks.iter().map(|p| p.0).collect())
            .collect()
    }

    // === Turn ===

    /// Side to move.
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    /// Hand the move to the other side.
    pub fn flip_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    // === Pieces ===

    /// Is `hex` on the board?
    #[must_use]
    pub fn in_bounds(&self, hex: Hexagon) -> bool {
        hex.in_bounds()
    }

    /// Piece on `hex`.
    ///
    /// # Panics
    ///
    /// Panics if `hex` is off the board. Check `in_bounds` first.
    #[must_use]
    pub fn get_piece(&self, hex: Hexagon) -> Piece {
        self.pieces[hex.file as usize][hex.rank as usize]
    }

    /// Piece on `hex`, or `None` when off the board.
    #[must_use]
    pub fn try_get_piece(&self, hex: Hexagon) -> Option<Piece> {
        hex.in_bounds().then(|| self.get_piece(hex))
    }

    /// Place `piece` on `hex` (use `Piece::EMPTY` to clear).
    ///
    /// # Panics
    ///
    /// Panics if `hex` is off the board.
    pub fn set_piece(&mut self, hex: Hexagon, piece: Piece) {
        self.pieces[hex.file as usize][hex.rank as usize] = piece;
    }

    /// Iterate `(hexagon, piece)` over occupied hexagons, file-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Hexagon, Piece)> + '_ {
        Hexagon::all()
            .map(|hex| (hex, self.get_piece(hex)))
            .filter(|(_, piece)| !piece.is_empty())
    }

    /// Locate the king of `color`.
    ///
    /// A started game always has one king per side, so a missing king is
    /// an invariant violation.
    pub fn find_king(&self, color: Color) -> Result<Hexagon, DuelError> {
        let king = Piece::king(color);
        self.occupied()
            .find(|&(_, piece)| piece == king)
            .map(|(hex, _)| hex)
            .ok_or_else(|| DuelError::invariant(format!("board has no {} king", color)))
    }

    // === Rendering ===

    /// Render the board, replacing marked hexagons with `x`.
    ///
    /// One line per file, indented so the hexagonal outline is visible.
    pub fn render_marked(&self, is_marked: impl Fn(Hexagon) -> bool) -> String {
        let mut out = String::new();

        for (file, ranks) in self.pieces.iter().enumerate() {
            let letter = (b'a' + file as u8) as char;
            out.push(letter);
            out.push_str("   ");
            out.push_str(&"  ".repeat(MAX_RANKS - ranks.len()));

            for (rank, piece) in ranks.iter().enumerate() {
                let hex = Hexagon::new(file as i8, rank as i8);
                out.push(if is_marked(hex) { 'x' } else { piece.to_char() });
                out.push_str("   ");
            }
            out.push('\n');
        }

        out
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render_marked(|_| false))
    }
}
