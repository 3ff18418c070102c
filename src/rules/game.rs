//! A board plus its cached per-colour move lists.
//!
//! ## Refresh protocol
//!
//! `init_piece_moves` rebuilds everything from scratch:
//!
//! 1. Generate raw move lists for every non-king piece of both colours.
//! 2. Build each colour's attack map from those lists plus its king's
//!    unfiltered moves.
//! 3. Filter each king's moves by the opponent's attack map and append
//!    the result as the last entry of that colour's list.
//! 4. If the side to move is in check, clear its non-king entries so only
//!    king moves remain legal.
//!
//! Step 4 means a check can never be answered by blocking or capturing
//! the checker, and `is_checkmate` looks only at king escapes. Any change
//! to the board drops the cache; `ensure_piece_moves` rebuilds it lazily.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{Color, ColorMap, Hexagon, Move, Piece};
use crate::error::DuelError;

use super::check::AttackMap;
use super::movegen::{MoveGenerator, PieceMoves};

/// Everything one refresh computes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCache {
    /// Legal move lists per colour, king entry last.
    pub lists: ColorMap<Vec<PieceMoves>>,

    /// Hexagons threatened by each colour.
    pub attacks: ColorMap<AttackMap>,

    /// Each king's moves before the safety filter.
    pub king_reach: ColorMap<PieceMoves>,
}

impl MoveCache {
    /// Compute the cache for `board`.
    pub fn compute(board: &Board) -> Result<Self, DuelError> {
        let generator = MoveGenerator::new(board);

        let white_king = board.find_king(Color::White)?;
        let black_king = board.find_king(Color::Black)?;
        let kings = ColorMap::from_pair(white_king, black_king);

        let mut lists = ColorMap::from_pair(
            generator.piece_moves(Color::White)?,
            generator.piece_moves(Color::Black)?,
        );
        let king_reach = kings.clone().map(|_, king| generator.king_moves(king, |_| true));

        let attacks = ColorMap::new(|color| {
            let mut map = AttackMap::from_moves(board, &lists[color]);
            map.extend(board, &king_reach[color]);
            map
        });

        let turn = board.turn();
        if attacks[turn.opposite()].is_attacked(kings[turn]) {
            lists[turn].clear();
        }

        for color in Color::BOTH {
            let threats = attacks[color.opposite()];
            let safe = generator.king_moves(kings[color], |hex| !threats.is_attacked(hex));
            lists[color].push(safe);
        }

        Ok(Self {
            lists,
            attacks,
            king_reach,
        })
    }

    /// Is `color`'s king on a hexagon the opponent threatens?
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.attacks[color.opposite()].is_attacked(self.king_reach[color].origin)
    }

    /// In check, and every unfiltered king move lands on a threatened hexagon.
    #[must_use]
    pub fn is_checkmate(&self, color: Color) -> bool {
        let threats = &self.attacks[color.opposite()];
        self.in_check(color)
            && self.king_reach[color]
                .targets
                .iter()
                .all(|&hex| threats.is_attacked(hex))
    }
}

/// Board state with lazily refreshed move lists.
///
/// ## Usage
///
/// ```
/// use hex_duel::core::{Color, Move};
/// use hex_duel::rules::ChessGame;
///
/// let mut game = ChessGame::start().unwrap();
/// let opening = Move::parse("f5", "f6").unwrap();
///
/// assert!(game.is_valid_move(Color::White, opening).unwrap());
/// game.make_move(opening).unwrap();
/// game.ensure_piece_moves().unwrap();
/// assert_eq!(game.board().turn(), Color::Black);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessGame {
    board: Board,
    moves: Option<MoveCache>,
}

impl ChessGame {
    /// The starting position with move lists computed.
    pub fn start() -> Result<Self, DuelError> {
        Self::from_board(Board::initial())
    }

    /// Wrap an arbitrary position and compute its move lists.
    ///
    /// Fails if either king is missing.
    pub fn from_board(board: Board) -> Result<Self, DuelError> {
        let mut game = Self { board, moves: None };
        game.init_piece_moves()?;
        Ok(game)
    }

    /// An empty board with no cache. Populate with `with_piece`.
    #[must_use]
    pub fn empty(turn: Color) -> Self {
        Self {
            board: Board::empty(turn),
            moves: None,
        }
    }

    /// Builder-style piece placement for setting up positions.
    #[must_use]
    pub fn with_piece(mut self, hex: Hexagon, piece: Piece) -> Self {
        self.board.set_piece(hex, piece);
        self.moves = None;
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current cache, if fresh.
    #[must_use]
    pub fn cache(&self) -> Option<&MoveCache> {
        self.moves.as_ref()
    }

    // === Refresh ===

    /// Recompute both colours' move lists from scratch.
    pub fn init_piece_moves(&mut self) -> Result<(), DuelError> {
        self.moves = Some(MoveCache::compute(&self.board)?);
        Ok(())
    }

    /// Recompute only if the cache was invalidated.
    pub fn ensure_piece_moves(&mut self) -> Result<(), DuelError> {
        if self.moves.is_none() {
            self.init_piece_moves()?;
        }
        Ok(())
    }

    fn require_cache(&self) -> Result<&MoveCache, DuelError> {
        self.moves
            .as_ref()
            .ok_or_else(|| DuelError::invariant("move lists queried before refresh"))
    }

    // === Queries ===

    /// Cached legal move lists for `color`, king entry last.
    pub fn piece_moves(&self, color: Color) -> Result<&[PieceMoves], DuelError> {
        Ok(&self.require_cache()?.lists[color])
    }

    /// Is `mv` in `color`'s cached legal list?
    pub fn is_valid_move(&self, color: Color, mv: Move) -> Result<bool, DuelError> {
        Ok(self
            .piece_moves(color)?
            .iter()
            .any(|moves| moves.origin == mv.from && moves.contains(mv.to)))
    }

    /// Is the side to move in check?
    pub fn is_check(&self) -> Result<bool, DuelError> {
        Ok(self.require_cache()?.in_check(self.board.turn()))
    }

    /// Is the side to move checkmated?
    pub fn is_checkmate(&self) -> Result<bool, DuelError> {
        Ok(self.require_cache()?.is_checkmate(self.board.turn()))
    }

    /// Is there a pawn on `hex` standing on its promotion rank?
    ///
    /// White promotes on the top rank of each file, black on rank 0.
    /// Nothing is ever promoted automatically.
    #[must_use]
    pub fn can_promote(&self, hex: Hexagon) -> bool {
        match self.board.try_get_piece(hex) {
            Some(piece) if piece.is_pawn() => {
                if piece.is_white() {
                    hex.is_top_rank()
                } else {
                    hex.is_bottom_rank()
                }
            }
            _ => false,
        }
    }

    // === Mutation ===

    /// Move whatever stands on `mv.from` to `mv.to`, capturing any occupant.
    ///
    /// Legality is the caller's business. Flips the turn and drops the
    /// cache.
    pub fn make_move(&mut self, mv: Move) -> Result<(), DuelError> {
        if !mv.from.in_bounds() || !mv.to.in_bounds() {
            return Err(DuelError::invalid_move(format!("{} leaves the board", mv)));
        }
        let piece = self.board.get_piece(mv.from);
        if piece.is_empty() {
            return Err(DuelError::invalid_move(format!("no piece on {}", mv.from)));
        }

        self.board.set_piece(mv.to, piece);
        self.board.set_piece(mv.from, Piece::EMPTY);
        self.board.flip_turn();
        self.moves = None;
        Ok(())
    }
}
