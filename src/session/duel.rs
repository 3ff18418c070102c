//! Per-match state machine.
//!
//! ## Lifecycle
//!
//! ```text
//! Empty --join--> one seat --join--> Active --mate/forfeit--> Ended
//! ```
//!
//! Moves are rejected until both seats are filled and after the session
//! has ended. Late joiners never displace a seated player; they simply
//! watch.

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{Color, ColorMap, GameRng, Move, MoveRecord, Player, SeatPreference};
use crate::error::DuelError;
use crate::rules::{ChessGame, GameResult};

use super::messages::{BoardSnapshot, SessionSnapshot};

/// What `join` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The player took a free seat.
    Seated(Color),
    /// The player was already sitting in this seat.
    AlreadySeated(Color),
    /// Both seats are taken by others. Nothing changed.
    Spectator,
}

impl JoinOutcome {
    /// Did the session change?
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, JoinOutcome::Seated(_))
    }

    /// The player's colour, if seated.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match *self {
            JoinOutcome::Seated(color) | JoinOutcome::AlreadySeated(color) => Some(color),
            JoinOutcome::Spectator => None,
        }
    }
}

/// What a successful move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// The side now to move is in check.
    pub check: bool,
    /// Set when the move delivered mate.
    pub result: Option<GameResult>,
}

/// One match between two seats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelSession {
    id: String,
    game: ChessGame,
    players: ColorMap<Option<Player>>,
    first_seat: Color,
    result: Option<GameResult>,
    history: Vector<MoveRecord>,
    touched_at: DateTime<Utc>,
    version: u64,
}

impl DuelSession {
    /// A fresh session on the starting position with both seats empty.
    ///
    /// `Random` seat preference is resolved here with `rng`.
    pub fn new(
        id: impl Into<String>,
        preference: SeatPreference,
        rng: &mut GameRng,
    ) -> Result<Self, DuelError> {
        let first_seat = match preference {
            SeatPreference::PreferWhite => Color::White,
            SeatPreference::PreferBlack => Color::Black,
            SeatPreference::Random => rng.coin_flip(),
        };

        Ok(Self::from_game(id, ChessGame::start()?, first_seat))
    }

    /// A session resuming `game` with both seats empty.
    ///
    /// The first player to join takes `first_seat`.
    #[must_use]
    pub fn from_game(id: impl Into<String>, game: ChessGame, first_seat: Color) -> Self {
        Self {
            id: id.into(),
            game,
            players: ColorMap::new(|_| None),
            first_seat,
            result: None,
            history: Vector::new(),
            touched_at: Utc::now(),
            version: 0,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn game(&self) -> &ChessGame {
        &self.game
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Player in `color`'s seat.
    #[must_use]
    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players[color].as_ref()
    }

    /// Seat taken by the first joiner.
    #[must_use]
    pub fn first_seat(&self) -> Color {
        self.first_seat
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.result.is_some()
    }

    /// Moves played so far, oldest first.
    ///
    /// Persistent vector: cloning a session for a retry shares it.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// When a store last wrote this session.
    #[must_use]
    pub fn touched_at(&self) -> DateTime<Utc> {
        self.touched_at
    }

    /// Write counter maintained by the store.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record a store write.
    pub fn stamp(&mut self, version: u64, at: DateTime<Utc>) {
        self.version = version;
        self.touched_at = at;
    }

    /// Seat held by `player`, if any.
    #[must_use]
    pub fn color_of(&self, player: &Player) -> Option<Color> {
        Color::BOTH
            .into_iter()
            .find(|&color| self.players[color].as_ref() == Some(player))
    }

    /// Both seats filled?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.iter().all(|(_, seat)| seat.is_some())
    }

    // === Commands ===

    /// Seat `player` if there is room.
    pub fn join(&mut self, player: Player) -> JoinOutcome {
        if let Some(color) = self.color_of(&player) {
            return JoinOutcome::AlreadySeated(color);
        }

        let seat = match (&self.players[Color::White], &self.players[Color::Black]) {
            (None, None) => self.first_seat,
            (None, Some(_)) => Color::White,
            (Some(_), None) => Color::Black,
            (Some(_), Some(_)) => return JoinOutcome::Spectator,
        };

        self.players[seat] = Some(player);
        JoinOutcome::Seated(seat)
    }

    /// Does `player` hold the seat of the side to move?
    #[must_use]
    pub fn is_players_turn(&self, player: &Player) -> bool {
        self.players[self.board().turn()].as_ref() == Some(player)
    }

    /// Validate and apply a move by `mover`.
    ///
    /// On mate the session ends with the mover as winner.
    pub fn make_move(&mut self, mover: &Player, mv: Move) -> Result<MoveOutcome, DuelError> {
        if self.is_ended() {
            return Err(DuelError::invalid_move("the game has already ended"));
        }
        if !self.is_full() {
            return Err(DuelError::invalid_move("waiting for an opponent"));
        }
        if !self.is_players_turn(mover) {
            return Err(DuelError::invalid_move("it is not your turn"));
        }

        let color = self.board().turn();
        self.game.ensure_piece_moves()?;
        if !self.game.is_valid_move(color, mv)? {
            return Err(DuelError::invalid_move(format!("{mv} is not a legal move")));
        }

        self.game.make_move(mv)?;
        self.game.init_piece_moves()?;

        let record = MoveRecord::new(color, mv, self.history.len() as u32 + 1);
        self.history.push_back(record);

        let check = self.game.is_check()?;
        if self.game.is_checkmate()? {
            self.result = Some(GameResult::checkmate(color));
        }

        Ok(MoveOutcome {
            record,
            check,
            result: self.result,
        })
    }

    /// `player` gives up; the opponent wins.
    pub fn forfeit(&mut self, player: &Player) -> Result<GameResult, DuelError> {
        if self.is_ended() {
            return Err(DuelError::invalid_move("the game has already ended"));
        }
        let color = self
            .color_of(player)
            .ok_or_else(|| DuelError::invalid_move("only a seated player can forfeit"))?;

        let result = GameResult::forfeit(color);
        self.result = Some(result);
        Ok(result)
    }

    /// Externally visible state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            board: BoardSnapshot {
                turn: self.board().turn().to_wire(),
                pieces: self.board().to_files(),
            },
            white_player: self.players[Color::White].clone(),
            black_player: self.players[Color::Black].clone(),
            ended: self.is_ended(),
            winner: self.result.map(|result| result.winner.to_wire()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Hexagon, Piece};
    use crate::rules::EndReason;

    fn hex(notation: &str) -> Hexagon {
        notation.parse().unwrap()
    }

    fn alice() -> Player {
        Player::new("p1", "Alice")
    }

    fn bob() -> Player {
        Player::new("p2", "Bob")
    }

    fn mv(from: &str, to: &str) -> Move {
        Move::parse(from, to).unwrap()
    }

    fn session(preference: SeatPreference) -> DuelSession {
        DuelSession::new("duel-1", preference, &mut GameRng::new(1)).unwrap()
    }

    fn active() -> DuelSession {
        let mut duel = session(SeatPreference::PreferWhite);
        duel.join(alice());
        duel.join(bob());
        duel
    }

    #[test]
    fn test_new_session() {
        let duel = session(SeatPreference::PreferBlack);
        assert_eq!(duel.id(), "duel-1");
        assert_eq!(duel.first_seat(), Color::Black);
        assert_eq!(duel.version(), 0);
        assert!(!duel.is_ended());
        assert!(duel.player(Color::White).is_none());
        assert!(duel.game().cache().is_some());
    }

    #[test]
    fn test_random_preference_is_seeded() {
        let a = DuelSession::new("a", SeatPreference::Random, &mut GameRng::new(9)).unwrap();
        let b = DuelSession::new("b", SeatPreference::Random, &mut GameRng::new(9)).unwrap();
        assert_eq!(a.first_seat(), b.first_seat());
    }

    #[test]
    fn test_join_fills_seats() {
        let mut duel = session(SeatPreference::PreferBlack);

        assert_eq!(duel.join(alice()), JoinOutcome::Seated(Color::Black));
        assert_eq!(duel.join(bob()), JoinOutcome::Seated(Color::White));
        assert!(duel.is_full());
    }

    #[test]
    fn test_join_is_idempotent() {
        let mut duel = active();
        let before = duel.clone();

        assert_eq!(duel.join(alice()), JoinOutcome::AlreadySeated(Color::White));
        assert_eq!(duel.join(Player::new("p3", "Carol")), JoinOutcome::Spectator);
        assert_eq!(duel, before);
    }

    #[test]
    fn test_move_rejected_without_opponent() {
        let mut duel = session(SeatPreference::PreferWhite);
        duel.join(alice());

        let err = duel.make_move(&alice(), mv("f5", "f6")).unwrap_err();
        assert!(matches!(err, DuelError::InvalidMove { .. }));
    }

    #[test]
    fn test_move_rejected_out_of_turn() {
        let mut duel = active();
        let err = duel.make_move(&bob(), mv("f7", "f6")).unwrap_err();
        assert!(err.is_user_error());
        assert!(duel.history().is_empty());
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut duel = active();
        let err = duel.make_move(&alice(), mv("f5", "f8")).unwrap_err();
        assert!(err.to_string().contains("f5-f8"));
        assert_eq!(duel.board(), &Board::initial());
    }

    #[test]
    fn test_move_applies_and_flips_turn() {
        let mut duel = active();
        let outcome = duel.make_move(&alice(), mv("f5", "f6")).unwrap();

        assert_eq!(outcome.record.ply, 1);
        assert_eq!(outcome.record.color, Color::White);
        assert!(!outcome.check);
        assert!(outcome.result.is_none());
        assert_eq!(duel.board().turn(), Color::Black);
        assert!(duel.is_players_turn(&bob()));

        duel.make_move(&bob(), mv("f7", "f6")).unwrap_err();
        duel.make_move(&bob(), mv("e7", "e6")).unwrap();
        assert_eq!(duel.history().len(), 2);
    }

    #[test]
    fn test_forfeit() {
        let mut duel = active();
        let result = duel.forfeit(&bob()).unwrap();

        assert_eq!(result.winner, Color::White);
        assert_eq!(result.reason, EndReason::Forfeit);
        assert!(duel.is_ended());

        assert!(duel.forfeit(&alice()).is_err());
        assert!(duel.make_move(&alice(), mv("f5", "f6")).is_err());
    }

    #[test]
    fn test_spectator_cannot_forfeit() {
        let mut duel = active();
        assert!(duel.forfeit(&Player::new("p3", "Carol")).is_err());
        assert!(!duel.is_ended());
    }

    #[test]
    fn test_snapshot() {
        let mut duel = active();
        duel.forfeit(&alice()).unwrap();
        let snap = duel.snapshot();

        assert_eq!(snap.id, "duel-1");
        assert_eq!(snap.board.turn, 1);
        assert_eq!(snap.board.pieces, Board::initial().to_files());
        assert_eq!(snap.white_player, Some(alice()));
        assert_eq!(snap.black_player, Some(bob()));
        assert!(snap.ended);
        assert_eq!(snap.winner, Some(0));
    }

    /// Black to move; the bishop on k2 mates the white king on f6 from j4.
    fn mate_in_one() -> DuelSession {
        let game = ChessGame::empty(Color::Black)
            .with_piece(hex("f6"), Piece::WHITE_KING)
            .with_piece(hex("f4"), Piece::BLACK_QUEEN)
            .with_piece(hex("f8"), Piece::BLACK_QUEEN)
            .with_piece(hex("b4"), Piece::BLACK_BISHOP)
            .with_piece(hex("k2"), Piece::BLACK_BISHOP)
            .with_piece(hex("f9"), Piece::BLACK_KING);
        let mut duel = DuelSession::from_game("duel-mate", game, Color::White);
        duel.join(alice());
        duel.join(bob());
        duel
    }

    #[test]
    fn test_from_game_keeps_position() {
        let duel = mate_in_one();
        assert_eq!(duel.board().turn(), Color::Black);
        assert_eq!(duel.board().get_piece(hex("k2")), Piece::BLACK_BISHOP);
        assert_eq!(duel.player(Color::White), Some(&alice()));
        assert!(duel.is_players_turn(&bob()));
        assert!(duel.history().is_empty());
    }

    #[test]
    fn test_checkmate_ends_session() {
        let mut duel = mate_in_one();
        let outcome = duel.make_move(&bob(), mv("k2", "j4")).unwrap();

        assert!(outcome.check);
        assert_eq!(outcome.result, Some(GameResult::checkmate(Color::Black)));
        assert_eq!(duel.result(), Some(GameResult::checkmate(Color::Black)));
        assert!(duel.is_ended());

        let err = duel.make_move(&alice(), mv("f6", "g6")).unwrap_err();
        assert!(matches!(err, DuelError::InvalidMove { .. }));
        assert_eq!(duel.history().len(), 1);

        let snap = duel.snapshot();
        assert!(snap.ended);
        assert_eq!(snap.winner, Some(Color::Black.to_wire()));
        assert_eq!(snap.winner, Some(0));
    }

    #[test]
    fn test_bincode_roundtrip() {
        let mut duel = active();
        duel.make_move(&alice(), mv("f5", "f6")).unwrap();

        let bytes = bincode::serialize(&duel).unwrap();
        let restored: DuelSession = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, duel);
    }
}
