//! Search tests on small positions.

use std::sync::{Arc, Mutex};

use super::board;
use crate::board::search::{search, SearchConfig, DRAW, MATE};
use crate::board::{format_score, Board, Psqt};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::variant::VariantRules;

const MATE_IN_ONE: &str = "4k4/8R/9/9/9/9/9/9/9/R2K5 w - - 0 1";

fn run(board: &mut Board, config: &SearchConfig) -> crate::board::SearchOutcome {
    let tt = TranspositionTable::new(1);
    search(board, &tt, &Psqt::material_only(), config, &StopFlag::new())
}

#[test]
fn finds_mate_in_one() {
    let mut board = board(MATE_IN_ONE);
    let outcome = run(&mut board, &SearchConfig::depth(3));
    assert_eq!(outcome.best_move().unwrap().to_string(), "a0a9");
    assert_eq!(outcome.score, MATE - 1);
    assert_eq!(format_score(outcome.score), "mate 1");
}

#[test]
fn search_restores_board() {
    let mut board = Board::new();
    let fen = board.to_fen();
    let hash = board.hash();
    let _ = run(&mut board, &SearchConfig::depth(3));
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.hash(), hash);
}

#[test]
fn mated_side_has_no_line() {
    let mut board = board(MATE_IN_ONE);
    board.make_move_str("a0a9").unwrap();
    let outcome = run(&mut board, &SearchConfig::depth(4));
    assert!(outcome.best_line.is_empty());
    assert_eq!(outcome.score, -MATE);
    assert_eq!(format_score(outcome.score), "mate 0");
}

#[test]
fn searchmoves_restricts_root() {
    let mut board = Board::new();
    let only = board.parse_move("i3h3").unwrap();
    let config = SearchConfig::depth(2).with_searchmoves(vec![only]);
    let outcome = run(&mut board, &config);
    assert_eq!(outcome.best_move(), Some(only));
}

#[test]
fn pre_stopped_search_still_returns_a_legal_move() {
    let mut board = Board::new();
    let tt = TranspositionTable::new(1);
    let stop = StopFlag::new();
    stop.stop();
    let outcome = search(
        &mut board,
        &tt,
        &Psqt::material_only(),
        &SearchConfig::depth(10),
        &stop,
    );
    let best = outcome.best_move().unwrap();
    assert!(board.is_legal_move(best));
    assert_eq!(outcome.depth, 0);
}

#[test]
fn node_limit_bounds_the_search() {
    let mut board = Board::new();
    let outcome = run(&mut board, &SearchConfig::depth(60).with_nodes(2_000));
    assert!(outcome.nodes <= 2_100);
    assert!(outcome.best_move().is_some());
}

#[test]
fn callback_sees_each_iteration() {
    let depths = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&depths);
    let config = SearchConfig::depth(3).with_info_callback(Arc::new(move |info| {
        sink.lock().unwrap().push((info.depth, info.to_uci_line()));
    }));
    let mut board = Board::new();
    let _ = run(&mut board, &config);

    let seen = depths.lock().unwrap();
    let levels: Vec<u32> = seen.iter().map(|(d, _)| *d).collect();
    assert_eq!(levels, [1, 2, 3]);
    assert!(seen[0].1.starts_with("info depth 1 seldepth "));
    assert!(seen[0].1.contains(" score cp "));
}

#[test]
fn bikjang_lets_the_weaker_side_draw() {
    let fen = "3k5/9/9/9/9/9/9/9/9/R3K4 b - - 0 1";
    let mut board = board(fen);
    let outcome = run(&mut board, &SearchConfig::depth(2));
    assert_eq!(outcome.score, DRAW);
    assert_eq!(outcome.best_move().unwrap().to().file(), 4);

    let casual = VariantRules {
        allow_pass: true,
        bikjang: false,
    };
    let mut board = Board::try_from_fen_with(fen, casual, false).unwrap();
    let outcome = run(&mut board, &SearchConfig::depth(2));
    assert!(outcome.score < -500);
}
