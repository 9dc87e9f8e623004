//! Janggi board representation and game logic.
//!
//! A 9x10 mailbox with precomputed palace and leaper geometry. Supports the
//! full movement rules (palace diagonals, blockable horse and elephant legs,
//! cannon screens), passing, and bikjang detection.
//!
//! # Example
//! ```
//! use janggi_bridge::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod error;
mod eval;
mod fen;
pub mod geometry;
mod make_unmake;
mod movegen;
pub mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use eval::Psqt;
pub use search::{
    format_score, SearchConfig, SearchInfoCallback, SearchIterationInfo, SearchOutcome,
};
pub use state::{Board, UnmakeInfo};
pub use types::{Color, Move, MoveList, Piece, Square, FILES, NUM_SQUARES, PIECE_TYPES, RANKS};

pub(crate) use types::{file_to_index, rank_to_index, EMPTY_MOVE, MAX_MOVES, MAX_PLY};
