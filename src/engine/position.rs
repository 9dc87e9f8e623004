//! The session's game state: a live board plus the per-ply history chain.

use std::sync::Arc;

use crate::board::{Board, Move};
use crate::variant::VariantDescriptor;

/// What was recorded for one ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub key: u64,
    /// Move that led here; `None` for the root.
    pub played: Option<Move>,
    pub halfmove_clock: u32,
}

/// A position and the chain of snapshots leading to it, oldest first.
///
/// The chain always holds at least the root snapshot. Setting up a new
/// position builds a new state rather than editing this one.
#[derive(Debug, Clone)]
pub struct BoardState {
    board: Board,
    variant: Arc<VariantDescriptor>,
    chess960: bool,
    chain: Vec<Snapshot>,
}

impl BoardState {
    #[must_use]
    pub fn new(variant: Arc<VariantDescriptor>, board: Board, chess960: bool) -> Self {
        let root = Snapshot {
            key: board.hash(),
            played: None,
            halfmove_clock: board.halfmove_clock(),
        };
        BoardState {
            board,
            variant,
            chess960,
            chain: vec![root],
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access for move generation; callers must leave the position
    /// as they found it.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn variant(&self) -> &Arc<VariantDescriptor> {
        &self.variant
    }

    #[must_use]
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    /// Play `mv` and extend the chain.
    pub fn apply(&mut self, mv: Move) {
        self.board.make_move(mv);
        self.chain.push(Snapshot {
            key: self.board.hash(),
            played: Some(mv),
            halfmove_clock: self.board.halfmove_clock(),
        });
    }

    #[must_use]
    pub fn chain(&self) -> &[Snapshot] {
        &self.chain
    }

    /// Moves played since the root.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.chain.iter().filter_map(|s| s.played)
    }

    #[must_use]
    pub fn fen(&self) -> String {
        self.board.to_fen()
    }
}

impl Default for BoardState {
    /// Janggi start position.
    fn default() -> Self {
        let variant = Arc::new(VariantDescriptor::janggi());
        let board = Board::start_position(variant.rules);
        BoardState::new(variant, board, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_janggi_root() {
        let state = BoardState::default();
        assert_eq!(state.variant().name, "janggi");
        assert_eq!(state.chain().len(), 1);
        assert_eq!(state.chain()[0].played, None);
        assert_eq!(state.fen(), crate::variant::JANGGI_START_FEN);
    }

    #[test]
    fn apply_extends_chain() {
        let mut state = BoardState::default();
        let mv = state.board_mut().parse_move("b0c2").unwrap();
        state.apply(mv);
        let reply = state.board_mut().parse_move("b9c7").unwrap();
        state.apply(reply);

        assert_eq!(state.chain().len(), 3);
        assert_eq!(state.moves().collect::<Vec<_>>(), [mv, reply]);
        assert_eq!(state.chain()[2].key, state.board().hash());
        assert_eq!(state.chain()[2].halfmove_clock, 2);
    }
}
