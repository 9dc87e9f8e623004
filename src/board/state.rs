use crate::variant::VariantRules;
use crate::zobrist::ZOBRIST;

use super::types::{Color, Piece, Square, NUM_SQUARES};

/// Everything `unmake_move` needs to restore the previous position.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) captured: Option<(Color, Piece)>,
    pub(crate) previous_hash: u64,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_fullmove_number: u32,
}

/// Janggi position as a 90-point mailbox.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) squares: [Option<(Color, Piece)>; NUM_SQUARES],
    pub(crate) side_to_move: Color,
    pub(crate) generals: [Square; 2],
    pub(crate) hash: u64,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Hashes of the positions preceding the current one, oldest first.
    pub(crate) history: Vec<u64>,
    pub(crate) rules: VariantRules,
}

impl Board {
    /// Standard Janggi start position under default rules.
    pub fn new() -> Self {
        Board::start_position(VariantRules::default())
    }

    pub fn start_position(rules: VariantRules) -> Self {
        let mut board = Board::empty(rules);
        let back_rank = [
            Some(Piece::Chariot),
            Some(Piece::Horse),
            Some(Piece::Elephant),
            Some(Piece::Advisor),
            None,
            Some(Piece::Advisor),
            Some(Piece::Elephant),
            Some(Piece::Horse),
            Some(Piece::Chariot),
        ];
        let mut white = Vec::new();
        for (file, piece) in back_rank.iter().enumerate() {
            if let Some(piece) = piece {
                white.push((file, 0, *piece));
            }
        }
        white.push((4, 1, Piece::General));
        white.push((1, 2, Piece::Cannon));
        white.push((7, 2, Piece::Cannon));
        for file in (0..9).step_by(2) {
            white.push((file, 3, Piece::Soldier));
        }

        for (file, rank, piece) in white {
            let sq = Square::from_index(rank * 9 + file);
            board.set_piece(sq, Color::White, piece);
            board.set_piece(sq.flip_vertical(), Color::Black, piece);
        }

        board.hash = board.calculate_hash();
        board
    }

    pub(crate) fn empty(rules: VariantRules) -> Self {
        Board {
            squares: [None; NUM_SQUARES],
            side_to_move: Color::White,
            generals: [Square::from_index(13), Square::from_index(76)],
            hash: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
            rules,
        }
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    #[inline]
    pub(crate) fn is_piece(&self, sq: Square, color: Color, piece: Piece) -> bool {
        self.squares[sq.index()] == Some((color, piece))
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn general_square(&self, color: Color) -> Square {
        self.generals[color.index()]
    }

    #[must_use]
    pub fn rules(&self) -> VariantRules {
        self.rules
    }

    /// Place a piece, updating the hash and general tracking.
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.squares[sq.index()] = Some((color, piece));
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        if piece == Piece::General {
            self.generals[color.index()] = sq;
        }
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let removed = self.squares[sq.index()].take();
        if let Some((color, piece)) = removed {
            self.hash ^= ZOBRIST.piece(color, piece, sq);
        }
        removed
    }

    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash = 0;
        for sq in Square::all() {
            if let Some((color, piece)) = self.piece_at(sq) {
                hash ^= ZOBRIST.piece(color, piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }
        hash
    }

    /// Iterate over the pieces of one side.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some((c, piece)) if c == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// True if the current position already occurred with the same side to
    /// move since the last capture.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        let window = (self.halfmove_clock as usize).min(self.history.len());
        self.history
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .any(|&h| h == self.hash)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
