//! Per-piece move generation.
//!
//! Targets are pseudo-legal: whether the mover's own king is left in
//! check is not considered here. The refresh protocol in `rules::game`
//! layers the king-safety filter on top.
//!
//! ## Step tables
//!
//! Rooks slide along the six grid axes. Bishops slide along the six hex
//! diagonals, each of which is two axis steps taken together. Queens do
//! both. Kings and knights take each offset exactly once.

use smallvec::SmallVec;

use crate::board::Board;
use crate::core::{Color, Direction, Hexagon, Piece, PieceKind};
use crate::error::DuelError;

use crate::core::hexagon::Direction::{
    Down as D,
    DownLeft as DL,
    DownRight as DR,
    Up as U,
    UpLeft as UL,
    UpRight as UR,
};

/// Rook steps: one axis direction each.
pub const ROOK_STEPS: [&[Direction]; 6] = [&[U], &[D], &[DL], &[DR], &[UL], &[UR]];

/// Bishop steps: two axis directions applied as one diagonal step.
pub const BISHOP_STEPS: [&[Direction]; 6] = [
    &[UR, DR],
    &[UL, DL],
    &[U, UR],
    &[U, UL],
    &[D, DR],
    &[D, DL],
];

/// King offsets: every rook step and every bishop step, once.
pub const KING_OFFSETS: [&[Direction]; 12] = [
    &[U],
    &[D],
    &[DL],
    &[DR],
    &[UL],
    &[UR],
    &[UR, DR],
    &[UL, DL],
    &[U, UR],
    &[U, UL],
    &[D, DR],
    &[D, DL],
];

/// Knight offsets: twelve three-step jumps.
pub const KNIGHT_OFFSETS: [&[Direction]; 12] = [
    &[UR, UR, U],
    &[UR, U, U],
    &[DR, DR, D],
    &[DR, D, D],
    &[UL, UL, U],
    &[UL, U, U],
    &[DL, DL, D],
    &[DL, D, D],
    &[UL, UL, DL],
    &[DL, DL, UL],
    &[UR, UR, DR],
    &[DR, DR, UR],
];

/// Target list for one piece.
///
/// Target order carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PieceMoves {
    /// Where the piece stands.
    pub origin: Hexagon,

    /// Where it may go.
    pub targets: SmallVec<[Hexagon; 16]>,
}

impl PieceMoves {
    #[must_use]
    pub fn new(origin: Hexagon) -> Self {
        Self {
            origin,
            targets: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, target: Hexagon) -> bool {
        self.targets.contains(&target)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

/// Read-only move generator over a board.
#[derive(Clone, Copy, Debug)]
pub struct MoveGenerator<'a> {
    board: &'a Board,
}

impl<'a> MoveGenerator<'a> {
    #[must_use]
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Can `piece` finish a step on `target`? Empty or opponent-held.
    fn can_land(&self, piece: Piece, target: Hexagon) -> bool {
        target.in_bounds() && {
            let occupant = self.board.get_piece(target);
            occupant.is_empty() || piece.is_opponent(occupant)
        }
    }

    /// Repeat each step until leaving the board or hitting a piece.
    fn slide(&self, origin: Hexagon, steps: &[&[Direction]]) -> PieceMoves {
        let piece = self.board.get_piece(origin);
        let mut moves = PieceMoves::new(origin);

        for step in steps {
            let mut current = origin.walk_path(step);
            while current.in_bounds() {
                let occupant = self.board.get_piece(current);
                if occupant.is_empty() {
                    moves.targets.push(current);
                } else {
                    if piece.is_opponent(occupant) {
                        moves.targets.push(current);
                    }
                    break;
                }
                current = current.walk_path(step);
            }
        }

        moves
    }

    /// Take each offset once.
    fn hop(
        &self,
        origin: Hexagon,
        offsets: &[&[Direction]],
        accept: impl Fn(Hexagon) -> bool,
    ) -> PieceMoves {
        let piece = self.board.get_piece(origin);
        let mut moves = PieceMoves::new(origin);

        for offset in offsets {
            let target = origin.walk_path(offset);
            if self.can_land(piece, target) && accept(target) {
                moves.targets.push(target);
            }
        }

        moves
    }

    #[must_use]
    pub fn rook_moves(&self, origin: Hexagon) -> PieceMoves {
        self.slide(origin, &ROOK_STEPS)
    }

    #[must_use]
    pub fn bishop_moves(&self, origin: Hexagon) -> PieceMoves {
        self.slide(origin, &BISHOP_STEPS)
    }

    #[must_use]
    pub fn queen_moves(&self, origin: Hexagon) -> PieceMoves {
        self.slide(origin, &KING_OFFSETS)
    }

    #[must_use]
    pub fn knight_moves(&self, origin: Hexagon) -> PieceMoves {
        self.hop(origin, &KNIGHT_OFFSETS, |_| true)
    }

    /// King targets, restricted to hexagons where `not_attacked` holds.
    ///
    /// Pass `|_| true` for the unfiltered list used by attack maps and
    /// the checkmate test.
    #[must_use]
    pub fn king_moves(&self, origin: Hexagon, not_attacked: impl Fn(Hexagon) -> bool) -> PieceMoves {
        self.hop(origin, &KING_OFFSETS, not_attacked)
    }

    /// Pawn advances and diagonal captures.
    #[must_use]
    pub fn pawn_moves(&self, origin: Hexagon) -> PieceMoves {
        let piece = self.board.get_piece(origin);
        let (forward, captures) = if piece.is_white() {
            (U, [UL, UR])
        } else {
            (D, [DL, DR])
        };
        let mut moves = PieceMoves::new(origin);

        let one = origin.walk(forward);
        if one.in_bounds() && self.board.get_piece(one).is_empty() {
            moves.targets.push(one);
        }

        // The double step only needs its landing hexagon free.
        let two = one.walk(forward);
        if two.in_bounds()
            && self.board.get_piece(two).is_empty()
            && !self.board.has_pawn_moved(origin, piece)
        {
            moves.targets.push(two);
        }

        for direction in captures {
            let target = origin.walk(direction);
            if target.in_bounds() && piece.is_opponent(self.board.get_piece(target)) {
                moves.targets.push(target);
            }
        }

        moves
    }

    /// Targets for whatever non-king piece stands on `origin`.
    ///
    /// Returns `Ok(None)` for empty hexagons and kings.
    pub fn moves_from(&self, origin: Hexagon) -> Result<Option<PieceMoves>, DuelError> {
        let piece = self.board.get_piece(origin);
        if piece.is_empty() {
            return Ok(None);
        }

        let kind = piece.kind().ok_or_else(|| {
            DuelError::invariant(format!("unknown piece tag {} on {}", piece.0, origin))
        })?;

        Ok(match kind {
            PieceKind::Pawn => Some(self.pawn_moves(origin)),
            PieceKind::Knight => Some(self.knight_moves(origin)),
            PieceKind::Bishop => Some(self.bishop_moves(origin)),
            PieceKind::Rook => Some(self.rook_moves(origin)),
            PieceKind::Queen => Some(self.queen_moves(origin)),
            PieceKind::King => None,
        })
    }

    /// Move lists for every non-king piece of `color`, file-major.
    pub fn piece_moves(&self, color: Color) -> Result<Vec<PieceMoves>, DuelError> {
        let mut lists = Vec::new();
        for (origin, piece) in self.board.occupied() {
            if piece.is_white() != color.is_white() {
                continue;
            }
            if let Some(moves) = self.moves_from(origin)? {
                lists.push(moves);
            }
        }
        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(notation: &str) -> Hexagon {
        notation.parse().unwrap()
    }

    fn sorted(moves: &PieceMoves) -> Vec<String> {
        let mut names: Vec<String> = moves.targets.iter().map(|h| h.to_string()).collect();
        names.sort();
        names
    }

    fn lone(piece: Piece, at: &str) -> Board {
        let mut board = Board::empty(Color::White);
        board.set_piece(hex(at), piece);
        board
    }

    #[test]
    fn test_rook_on_empty_board() {
        let board = lone(Piece::WHITE_ROOK, "f6");
        let moves = MoveGenerator::new(&board).rook_moves(hex("f6"));
        assert_eq!(moves.len(), 30);
        assert!(moves.contains(hex("f1")));
        assert!(moves.contains(hex("f11")));
        assert!(moves.contains(hex("a1")));
        assert!(moves.contains(hex("k6")));
    }

    #[test]
    fn test_king_on_empty_board() {
        let board = lone(Piece::WHITE_KING, "f6");
        let moves = MoveGenerator::new(&board).king_moves(hex("f6"), |_| true);
        assert_eq!(
            sorted(&moves),
            ["d5", "e4", "e5", "e6", "e7", "f5", "f7", "g4", "g5", "g6", "g7", "h5"]
        );
    }

    #[test]
    fn test_king_filter_drops_targets() {
        let board = lone(Piece::WHITE_KING, "f6");
        let blocked = hex("f7");
        let moves = MoveGenerator::new(&board).king_moves(hex("f6"), |h| h != blocked);
        assert_eq!(moves.len(), 11);
        assert!(!moves.contains(blocked));
    }

    #[test]
    fn test_knight_on_empty_board() {
        let board = lone(Piece::WHITE_KNIGHT, "f6");
        let moves = MoveGenerator::new(&board).knight_moves(hex("f6"));
        assert_eq!(
            sorted(&moves),
            ["c4", "c5", "d3", "d7", "e3", "e8", "g3", "g8", "h3", "h7", "i4", "i5"]
        );
    }

    #[test]
    fn test_slide_stops_at_own_piece() {
        let mut board = lone(Piece::WHITE_ROOK, "f6");
        board.set_piece(hex("f8"), Piece::WHITE_PAWN);
        let moves = MoveGenerator::new(&board).rook_moves(hex("f6"));
        assert!(moves.contains(hex("f7")));
        assert!(!moves.contains(hex("f8")));
        assert!(!moves.contains(hex("f9")));
    }

    #[test]
    fn test_slide_captures_and_stops() {
        let mut board = lone(Piece::WHITE_ROOK, "f6");
        board.set_piece(hex("f8"), Piece::BLACK_PAWN);
        let moves = MoveGenerator::new(&board).rook_moves(hex("f6"));
        assert!(moves.contains(hex("f8")));
        assert!(!moves.contains(hex("f9")));
    }

    #[test]
    fn test_white_pawn_double_step() {
        let board = lone(Piece::WHITE_PAWN, "g4");
        let moves = MoveGenerator::new(&board).pawn_moves(hex("g4"));
        assert_eq!(sorted(&moves), ["g5", "g6"]);
    }

    #[test]
    fn test_moved_pawn_single_step() {
        let board = lone(Piece::WHITE_PAWN, "g5");
        let moves = MoveGenerator::new(&board).pawn_moves(hex("g5"));
        assert_eq!(sorted(&moves), ["g6"]);
    }

    #[test]
    fn test_unmoved_pawn_jumps_blocker() {
        let mut board = lone(Piece::WHITE_PAWN, "g4");
        board.set_piece(hex("g5"), Piece::BLACK_KNIGHT);
        let moves = MoveGenerator::new(&board).pawn_moves(hex("g4"));
        assert_eq!(sorted(&moves), ["g6"]);
    }

    #[test]
    fn test_moved_pawn_blocked() {
        let mut board = lone(Piece::WHITE_PAWN, "g5");
        board.set_piece(hex("g6"), Piece::BLACK_KNIGHT);
        let moves = MoveGenerator::new(&board).pawn_moves(hex("g5"));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_double_step_needs_empty_landing() {
        let mut board = lone(Piece::WHITE_PAWN, "g4");
        board.set_piece(hex("g5"), Piece::BLACK_KNIGHT);
        board.set_piece(hex("g6"), Piece::BLACK_KNIGHT);
        let moves = MoveGenerator::new(&board).pawn_moves(hex("g4"));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_black_pawn_captures() {
        let mut board = Board::empty(Color::Black);
        board.set_piece(hex("d5"), Piece::BLACK_PAWN);
        board.set_piece(hex("c4"), Piece::BLACK_KNIGHT);
        board.set_piece(hex("e5"), Piece::WHITE_KNIGHT);
        let moves = MoveGenerator::new(&board).pawn_moves(hex("d5"));
        assert_eq!(sorted(&moves), ["d4", "e5"]);
    }

    #[test]
    fn test_piece_moves_skips_kings_and_opponents() {
        let mut board = Board::empty(Color::White);
        board.set_piece(hex("g1"), Piece::WHITE_KING);
        board.set_piece(hex("f6"), Piece::WHITE_ROOK);
        board.set_piece(hex("d9"), Piece::BLACK_KNIGHT);

        let lists = MoveGenerator::new(&board).piece_moves(Color::White).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].origin, hex("f6"));
    }

    #[test]
    fn test_unknown_tag_is_invariant_violation() {
        let board = lone(Piece(13), "f6");
        let err = MoveGenerator::new(&board).piece_moves(Color::White).unwrap_err();
        assert!(matches!(err, DuelError::InvariantViolation { .. }));
    }
}
