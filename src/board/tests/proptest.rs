//! Property-based tests using proptest.

use crate::board::{Board, Move, Square, UnmakeInfo};
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=24usize
}

/// Play up to `count` random legal moves, returning what was played.
fn random_playout(board: &mut Board, seed: u64, count: usize) -> Vec<(Move, UnmakeInfo)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut played = Vec::new();
    for _ in 0..count {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        let info = board.make_move(mv);
        played.push((mv, info));
    }
    played
}

proptest! {
    /// Property: make_move followed by unmake_move restores board state exactly
    #[test]
    fn prop_make_unmake_restores_state(seed in any::<u64>(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let initial_hash = board.hash();
        let initial_fen = board.to_fen();

        let mut played = random_playout(&mut board, seed, num_moves);
        while let Some((mv, info)) = played.pop() {
            board.unmake_move(mv, info);
        }

        prop_assert_eq!(board.hash(), initial_hash);
        prop_assert_eq!(board.to_fen(), initial_fen);
    }

    /// Property: incremental hash always matches a full recomputation
    #[test]
    fn prop_hash_consistency(seed in any::<u64>(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let _ = random_playout(&mut board, seed, num_moves);
        prop_assert_eq!(board.hash(), board.calculate_hash());
    }

    /// Property: reverse attack lookup agrees with forward move generation
    #[test]
    fn prop_attacks_match_generation(seed in any::<u64>(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let _ = random_playout(&mut board, seed, num_moves);

        let us = board.side_to_move();
        let pseudo = board.generate_pseudo_moves(false);
        for sq in Square::all() {
            if matches!(board.piece_at(sq), Some((color, _)) if color == us) {
                continue;
            }
            let reached = pseudo.iter().any(|mv| mv.to() == sq);
            prop_assert_eq!(board.is_square_attacked(sq, us), reached, "point {}", sq);
        }
    }

    /// Property: no legal move leaves the mover's general attacked
    #[test]
    fn prop_legal_moves_keep_general_safe(seed in any::<u64>(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let _ = random_playout(&mut board, seed, num_moves);

        let us = board.side_to_move();
        for &mv in board.generate_moves().iter() {
            let info = board.make_move(mv);
            prop_assert!(!board.is_in_check(us), "{} leaves general attacked", mv);
            board.unmake_move(mv, info);
        }
    }

    /// Property: FEN export parses back to the same position
    #[test]
    fn prop_fen_round_trip(seed in any::<u64>(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let _ = random_playout(&mut board, seed, num_moves);

        let fen = board.to_fen();
        let parsed = Board::try_from_fen(&fen).unwrap();
        prop_assert_eq!(parsed.hash(), board.hash());
        prop_assert_eq!(parsed.to_fen(), fen);
    }
}
