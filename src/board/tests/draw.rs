//! Repetition and bikjang detection tests.

use super::board;
use crate::board::Board;

fn play(board: &mut Board, moves: &[&str]) {
    for mv in moves {
        board.make_move_str(mv).unwrap();
    }
}

#[test]
fn horse_shuffle_repeats_start_position() {
    let mut board = Board::new();
    play(&mut board, &["b0c2", "b9c7", "c2b0"]);
    assert!(!board.is_repetition());
    play(&mut board, &["c7b9"]);
    assert!(board.is_repetition());
    assert_eq!(board.hash(), Board::new().hash());
}

#[test]
fn double_pass_is_a_repetition() {
    let mut board = Board::new();
    play(&mut board, &["e1e1", "e8e8"]);
    assert!(board.is_repetition());
}

#[test]
fn capture_resets_repetition_window() {
    let mut board = board("4k4/9/9/9/9/p8/9/9/9/R3K4 w - - 0 1");
    play(&mut board, &["a0a4", "e9e8"]);
    assert_eq!(board.halfmove_clock(), 1);
    play(&mut board, &["a4a0", "e8e9"]);
    // Same placement as the start minus the captured soldier
    assert!(!board.is_repetition());
    play(&mut board, &["a0a4", "e9e8", "a4a0", "e8e9"]);
    assert!(board.is_repetition());
}

#[test]
fn generals_facing_on_open_file() {
    let board = board("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1");
    assert!(board.generals_facing());
}

#[test]
fn generals_screened_or_apart_do_not_face() {
    assert!(!Board::new().generals_facing());
    assert!(!board("4k4/9/9/9/4p4/9/9/9/9/4K4 w - - 0 1").generals_facing());
    assert!(!board("3k5/9/9/9/9/9/9/9/9/4K4 w - - 0 1").generals_facing());
}
