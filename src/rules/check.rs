//! Attack maps.
//!
//! An attack map marks every hexagon a colour threatens. Pawn advances are
//! moves but not threats, so a pawn's same-file targets are left out.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::Hexagon;

use super::movegen::PieceMoves;

/// 91-bit set of threatened hexagons, indexed by `Hexagon::index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackMap {
    bits: [u64; 2],
}

impl AttackMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a hexagon as threatened. Off-board hexagons are ignored.
    pub fn mark(&mut self, hex: Hexagon) {
        if hex.in_bounds() {
            let index = hex.index();
            self.bits[index / 64] |= 1u64 << (index % 64);
        }
    }

    /// Is `hex` threatened?
    #[must_use]
    pub fn is_attacked(&self, hex: Hexagon) -> bool {
        if !hex.in_bounds() {
            return false;
        }
        let index = hex.index();
        self.bits[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Number of threatened hexagons.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Mark the threatening targets of `moves`, read against `board`.
    pub fn extend(&mut self, board: &Board, moves: &PieceMoves) {
        let is_pawn = board.get_piece(moves.origin).is_pawn();
        for &target in &moves.targets {
            if is_pawn && target.file == moves.origin.file {
                continue;
            }
            self.mark(target);
        }
    }

    /// Build a map from a colour's move lists.
    #[must_use]
    pub fn from_moves<'m>(board: &Board, lists: impl IntoIterator<Item = &'m PieceMoves>) -> Self {
        let mut map = Self::new();
        for moves in lists {
            map.extend(board, moves);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Piece};
    use crate::rules::movegen::MoveGenerator;

    fn hex(notation: &str) -> Hexagon {
        notation.parse().unwrap()
    }

    #[test]
    fn test_mark_and_query() {
        let mut map = AttackMap::new();
        map.mark(hex("a1"));
        map.mark(hex("k6"));
        map.mark(Hexagon::new(-1, 0));

        assert!(map.is_attacked(hex("a1")));
        assert!(map.is_attacked(hex("k6")));
        assert!(!map.is_attacked(hex("f6")));
        assert!(!map.is_attacked(Hexagon::new(-1, 0)));
        assert_eq!(map.count(), 2);
    }

    #[test]
    fn test_every_hexagon_fits() {
        let mut map = AttackMap::new();
        for hex in Hexagon::all() {
            map.mark(hex);
        }
        assert_eq!(map.count(), 91);
    }

    #[test]
    fn test_pawn_advance_is_not_a_threat() {
        let mut board = Board::empty(Color::White);
        board.set_piece(hex("f6"), Piece::WHITE_PAWN);
        board.set_piece(hex("g6"), Piece::BLACK_PAWN);

        let moves = MoveGenerator::new(&board).pawn_moves(hex("f6"));
        assert!(moves.contains(hex("f7")));

        let map = AttackMap::from_moves(&board, [&moves]);
        assert!(!map.is_attacked(hex("f7")));
        assert!(map.is_attacked(hex("g6")));
    }
}
