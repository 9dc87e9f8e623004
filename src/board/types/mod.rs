//! Core Janggi types.
//!
//! - `Piece` and `Color` - piece kinds and the two sides
//! - `Square` - compact board point representation (u8, 90 points)
//! - `Move` and `MoveList` - move representation

mod moves;
mod piece;
mod square;

pub use moves::{Move, MoveList};
pub use piece::{Color, Piece, PIECE_TYPES};
pub use square::{Square, FILES, NUM_SQUARES, RANKS};

pub(crate) use moves::{EMPTY_MOVE, MAX_MOVES, MAX_PLY};
pub(crate) use square::{file_to_index, rank_to_index};
