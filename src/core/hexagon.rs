//! Hexagon coordinates and the direction-walk primitive.
//!
//! The board is a hexagon of hexagons: 11 files (`a`..`k`) whose lengths
//! grow towards the midpoint file `f` and shrink again after it:
//!
//! ```text
//! file:   a  b  c  d  e  f  g  h  i  j  k
//! ranks:  6  7  8  9 10 11 10  9  8  7  6
//! ```
//!
//! Because the outline contracts above and below the midpoint, the rank
//! delta of a sideways step depends on which half of the board the step
//! starts from. `Hexagon::walk` encodes that branch directly rather than
//! going through an axial coordinate system.
//!
//! Walking never checks bounds. Callers filter with `Hexagon::in_bounds`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DuelError;

/// Number of files on the board.
pub const FILES: usize = 11;

/// Length of the longest file.
pub const MAX_RANKS: usize = 11;

/// Index of the widest file (`f`).
pub const MIDPOINT: i8 = 5;

/// Number of ranks on each file.
pub const RANKS_PER_FILE: [usize; FILES] = [6, 7, 8, 9, 10, 11, 10, 9, 8, 7, 6];

/// Total number of playable hexagons.
pub const HEXAGON_COUNT: usize = 91;

/// One of the six unit steps along the grid's axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// All six directions.
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::DownLeft,
        Direction::DownRight,
        Direction::UpLeft,
        Direction::UpRight,
    ];
}

/// A cell addressed by `(file, rank)`, both 0-based.
///
/// Coordinates are signed so that a walk may leave the board; such
/// hexagons report `in_bounds() == false`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Hexagon {
    pub file: i8,
    pub rank: i8,
}

impl Hexagon {
    /// Create a hexagon. No bounds check.
    #[must_use]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Number of ranks on `file`, or 0 for a file off the board.
    #[must_use]
    pub const fn ranks_for_file(file: i8) -> usize {
        if file < 0 || file as usize >= FILES {
            0
        } else {
            RANKS_PER_FILE[file as usize]
        }
    }

    /// Is this hexagon on the board?
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.rank >= 0 && (self.rank as usize) < Self::ranks_for_file(self.file)
    }

    /// Take a single step.
    #[must_use]
    pub const fn walk(self, direction: Direction) -> Self {
        let Self { file, rank } = self;
        match direction {
            Direction::Up => Self::new(file, rank + 1),
            Direction::Down => Self::new(file, rank - 1),
            Direction::UpLeft => Self::new(file - 1, rank + if file <= MIDPOINT { 0 } else { 1 }),
            Direction::DownLeft => Self::new(file - 1, rank + if file <= MIDPOINT { -1 } else { 0 }),
            Direction::UpRight => Self::new(file + 1, rank + if file < MIDPOINT { 1 } else { 0 }),
            Direction::DownRight => Self::new(file + 1, rank + if file < MIDPOINT { 0 } else { -1 }),
        }
    }

    /// Apply a sequence of steps in order.
    #[must_use]
    pub fn walk_path(self, path: &[Direction]) -> Self {
        path.iter().fold(self, |hex, &direction| hex.walk(direction))
    }

    /// Flat index in file-major order. Only meaningful when in bounds.
    #[must_use]
    pub fn index(self) -> usize {
        let offset: usize = RANKS_PER_FILE[..self.file as usize].iter().sum();
        offset + self.rank as usize
    }

    /// Iterate every hexagon on the board, file-major.
    ///
    /// ```
    /// use hex_duel::core::Hexagon;
    ///
    /// assert_eq!(Hexagon::all().count(), 91);
    /// assert_eq!(Hexagon::all().next(), Some(Hexagon::new(0, 0)));
    /// ```
    pub fn all() -> impl Iterator<Item = Hexagon> {
        (0..FILES as i8).flat_map(|file| {
            (0..RANKS_PER_FILE[file as usize] as i8).map(move |rank| Hexagon::new(file, rank))
        })
    }

    /// Is this the last rank of its file, counted from white's side?
    #[must_use]
    pub fn is_top_rank(self) -> bool {
        self.in_bounds() && self.rank as usize == RANKS_PER_FILE[self.file as usize] - 1
    }

    /// Is this the first rank of its file?
    #[must_use]
    pub fn is_bottom_rank(self) -> bool {
        self.in_bounds() && self.rank == 0
    }
}

impl std::fmt::Display for Hexagon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' as i16 + self.file as i16) as u8 as char;
        write!(f, "{}{}", file, self.rank as i16 + 1)
    }
}

impl FromStr for Hexagon {
    type Err = DuelError;

    /// Parse notation such as `"f9"`. Bounds are not checked.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DuelError::InvalidNotation {
            notation: s.to_string(),
        };

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if !('a'..='k').contains(&letter) {
            return Err(invalid());
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let rank: u8 = digits.parse().map_err(|_| invalid())?;
        if rank == 0 || rank as usize > MAX_RANKS {
            return Err(invalid());
        }

        Ok(Hexagon::new((letter as u8 - b'a') as i8, rank as i8 - 1))
    }
}
