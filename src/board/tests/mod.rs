//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `movegen.rs` - Piece movement rules and perft counts
//! - `fen.rs` - FEN import/export and move parsing
//! - `draw.rs` - Repetition and bikjang detection
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `search.rs` - Search results on small positions
//! - `proptest.rs` - Property-based tests

use super::Board;

mod draw;
mod make_unmake;
mod proptest;
mod search;

fn board(fen: &str) -> Board {
    Board::try_from_fen(fen).unwrap()
}

/// Legal moves starting on `from`, in coordinate notation, sorted.
fn moves_from(board: &mut Board, from: &str) -> Vec<String> {
    let mut moves: Vec<String> = board
        .generate_moves()
        .iter()
        .filter(|mv| mv.from().to_string() == from && !mv.is_pass())
        .map(ToString::to_string)
        .collect();
    moves.sort();
    moves
}
