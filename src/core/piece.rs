//! Piece tags and colours.
//!
//! ## Encoding
//!
//! A piece is a single byte. `0` is an empty hexagon; every other value
//! encodes kind and colour, with the colour carried by parity:
//!
//! | kind   | white | black |
//! |--------|-------|-------|
//! | pawn   | 1     | 2     |
//! | knight | 3     | 4     |
//! | bishop | 5     | 6     |
//! | rook   | 7     | 8     |
//! | queen  | 9     | 10    |
//! | king   | 11    | 12    |
//!
//! The byte is also the wire format of the board snapshot.

use serde::{Deserialize, Serialize};

/// Side colour. Doubles as the board's turn flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colours, white first.
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[must_use]
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    /// Wire encoding: white = 1, black = 0.
    #[must_use]
    pub const fn to_wire(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 0,
        }
    }

    /// Storage slot used by `ColorMap`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Colourless piece kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// A piece tag (or `Piece::EMPTY`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Piece(pub u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);
    pub const WHITE_PAWN: Piece = Piece(1);
    pub const BLACK_PAWN: Piece = Piece(2);
    pub const WHITE_KNIGHT: Piece = Piece(3);
    pub const BLACK_KNIGHT: Piece = Piece(4);
    pub const WHITE_BISHOP: Piece = Piece(5);
    pub const BLACK_BISHOP: Piece = Piece(6);
    pub const WHITE_ROOK: Piece = Piece(7);
    pub const BLACK_ROOK: Piece = Piece(8);
    pub const WHITE_QUEEN: Piece = Piece(9);
    pub const BLACK_QUEEN: Piece = Piece(10);
    pub const WHITE_KING: Piece = Piece(11);
    pub const BLACK_KING: Piece = Piece(12);

    /// Build a piece from kind and colour.
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        let white = match kind {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 5,
            PieceKind::Rook => 7,
            PieceKind::Queen => 9,
            PieceKind::King => 11,
        };
        match color {
            Color::White => Piece(white),
            Color::Black => Piece(white + 1),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Odd tags are white. Note that this is a raw parity test.
    #[must_use]
    pub const fn is_white(self) -> bool {
        self.0 % 2 == 1
    }

    /// Raw parity comparison of two tags.
    ///
    /// `EMPTY` has even parity, so callers test for emptiness first.
    #[must_use]
    pub const fn are_opposite(a: Piece, b: Piece) -> bool {
        a.0 % 2 != b.0 % 2
    }

    /// Both hexagons hold pieces of the same side.
    #[must_use]
    pub const fn is_same_color(self, other: Piece) -> bool {
        !self.is_empty() && !other.is_empty() && !Self::are_opposite(self, other)
    }

    /// Both hexagons hold pieces, of opposing sides.
    #[must_use]
    pub const fn is_opponent(self, other: Piece) -> bool {
        !self.is_empty() && !other.is_empty() && Self::are_opposite(self, other)
    }

    /// Colour of a non-empty piece.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        if self.is_empty() {
            None
        } else if self.is_white() {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    /// Does this piece belong to `color`?
    #[must_use]
    pub const fn is_color(self, color: Color) -> bool {
        !self.is_empty() && self.is_white() == color.is_white()
    }

    /// Kind of a valid, non-empty piece.
    #[must_use]
    pub const fn kind(self) -> Option<PieceKind> {
        match self.0 {
            1 | 2 => Some(PieceKind::Pawn),
            3 | 4 => Some(PieceKind::Knight),
            5 | 6 => Some(PieceKind::Bishop),
            7 | 8 => Some(PieceKind::Rook),
            9 | 10 => Some(PieceKind::Queen),
            11 | 12 => Some(PieceKind::King),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_pawn(self) -> bool {
        matches!(self.kind(), Some(PieceKind::Pawn))
    }

    #[must_use]
    pub const fn is_king(self) -> bool {
        matches!(self.kind(), Some(PieceKind::King))
    }

    /// The king of a side.
    #[must_use]
    pub const fn king(color: Color) -> Self {
        Self::new(PieceKind::King, color)
    }

    /// Single-character symbol: uppercase white, lowercase black, `.` empty.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self.0 {
            0 => '.',
            1 => 'P',
            2 => 'p',
            3 => 'N',
            4 => 'n',
            5 => 'B',
            6 => 'b',
            7 => 'R',
            8 => 'r',
            9 => 'Q',
            10 => 'q',
            11 => 'K',
            12 => 'k',
            _ => '?',
        }
    }
}
