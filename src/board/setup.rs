//! Starting position and pawn start ranks.

use crate::core::{Color, Hexagon, Piece};

use super::grid::Board;

/// Rank index of each white pawn's starting hexagon, per file.
///
/// Files `a` and `k` have no starting pawn, so any white pawn found there
/// has necessarily moved.
const WHITE_PAWN_START: [Option<i8>; 11] = [
    None,
    Some(0),
    Some(1),
    Some(2),
    Some(3),
    Some(4),
    Some(3),
    Some(2),
    Some(1),
    Some(0),
    None,
];

/// Rank index of black's pawn line on files `b` through `j`.
const BLACK_PAWN_START: i8 = 6;

const WHITE_SETUP: [(&str, Piece); 18] = [
    ("b1", Piece::WHITE_PAWN),
    ("c2", Piece::WHITE_PAWN),
    ("d3", Piece::WHITE_PAWN),
    ("e4", Piece::WHITE_PAWN),
    ("f5", Piece::WHITE_PAWN),
    ("g4", Piece::WHITE_PAWN),
    ("h3", Piece::WHITE_PAWN),
    ("i2", Piece::WHITE_PAWN),
    ("j1", Piece::WHITE_PAWN),
    ("c1", Piece::WHITE_ROOK),
    ("i1", Piece::WHITE_ROOK),
    ("d1", Piece::WHITE_KNIGHT),
    ("h1", Piece::WHITE_KNIGHT),
    ("e1", Piece::WHITE_QUEEN),
    ("f1", Piece::WHITE_BISHOP),
    ("f2", Piece::WHITE_BISHOP),
    ("f3", Piece::WHITE_BISHOP),
    ("g1", Piece::WHITE_KING),
];

const BLACK_SETUP: [(&str, Piece); 18] = [
    ("b7", Piece::BLACK_PAWN),
    ("c7", Piece::BLACK_PAWN),
    ("d7", Piece::BLACK_PAWN),
    ("e7", Piece::BLACK_PAWN),
    ("f7", Piece::BLACK_PAWN),
    ("g7", Piece::BLACK_PAWN),
    ("h7", Piece::BLACK_PAWN),
    ("i7", Piece::BLACK_PAWN),
    ("j7", Piece::BLACK_PAWN),
    ("c8", Piece::BLACK_ROOK),
    ("i8", Piece::BLACK_ROOK),
    ("d9", Piece::BLACK_KNIGHT),
    ("h9", Piece::BLACK_KNIGHT),
    ("e10", Piece::BLACK_QUEEN),
    ("f9", Piece::BLACK_BISHOP),
    ("f10", Piece::BLACK_BISHOP),
    ("f11", Piece::BLACK_BISHOP),
    ("g10", Piece::BLACK_KING),
];

/// Decode a compile-time notation literal. Only used on the tables above.
const fn square(notation: &str) -> Hexagon {
    let bytes = notation.as_bytes();
    let file = (bytes[0] - b'a') as i8;
    let rank = if bytes.len() == 3 {
        (bytes[1] - b'0') * 10 + (bytes[2] - b'0')
    } else {
        bytes[1] - b'0'
    };
    Hexagon::new(file, rank as i8 - 1)
}

impl Board {
    /// The standard starting position, white to move.
    #[must_use]
    pub fn initial() -> Self {
        let mut board = Self::empty(Color::White);
        for (notation, piece) in WHITE_SETUP.iter().chain(BLACK_SETUP.iter()) {
            board.set_piece(square(notation), *piece);
        }
        board
    }

    /// Has the pawn `piece` standing on `hex` left its starting hexagon?
    ///
    /// Judged purely from position: a pawn that moved away and came back
    /// is impossible, so rank alone decides. Black's start line is b7..j7,
    /// so a black pawn below rank 7 has moved.
    #[must_use]
    pub fn has_pawn_moved(&self, hex: Hexagon, piece: Piece) -> bool {
        if piece.is_white() {
            match WHITE_PAWN_START.get(hex.file as usize).copied().flatten() {
                Some(start) => hex.rank > start,
                None => true,
            }
        } else {
            hex.rank < BLACK_PAWN_START
        }
    }
}
