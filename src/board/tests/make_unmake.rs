//! Make/unmake move tests.

use super::board;
use crate::board::{Board, Color, Piece, Square};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

#[test]
fn capture_make_unmake_restores_everything() {
    let mut board = board("4k4/9/9/9/9/p8/9/9/9/R3K4 w - - 7 12");
    let fen = board.to_fen();
    let hash = board.hash();

    let mv = board.parse_move("a0a4").unwrap();
    assert!(mv.is_capture());
    let info = board.make_move(mv);
    assert_eq!(board.piece_at(sq("a4")), Some((Color::White, Piece::Chariot)));
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.hash(), board.calculate_hash());

    board.unmake_move(mv, info);
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.hash(), hash);
}

#[test]
fn pass_only_flips_side() {
    let mut board = Board::new();
    let before = board.to_fen();
    let mv = board.parse_move("e1e1").unwrap();
    let info = board.make_move(mv);

    assert_eq!(board.side_to_move(), Color::Black);
    assert_eq!(board.general_square(Color::White), sq("e1"));
    assert_ne!(board.hash(), Board::new().hash());
    assert_eq!(board.hash(), board.calculate_hash());

    board.unmake_move(mv, info);
    assert_eq!(board.to_fen(), before);
}

#[test]
fn general_square_tracks_moves() {
    let mut board = Board::new();
    let mv = board.parse_move("e1f2").unwrap();
    let info = board.make_move(mv);
    assert_eq!(board.general_square(Color::White), sq("f2"));
    board.unmake_move(mv, info);
    assert_eq!(board.general_square(Color::White), sq("e1"));
}

#[test]
fn fullmove_advances_after_second_player() {
    let mut board = Board::new();
    board.make_move_str("a3a4").unwrap();
    assert_eq!(board.fullmove_number(), 1);
    board.make_move_str("a6a5").unwrap();
    assert_eq!(board.fullmove_number(), 2);
}
