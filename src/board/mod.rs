//! The playing surface.
//!
//! - `grid`: ragged per-file storage, turn flag, king lookup, rendering
//! - `setup`: the starting position and pawn start ranks

pub mod grid;
pub mod setup;

pub use grid::Board;
