use crate::zobrist::ZOBRIST;

use super::types::{Color, Move, Piece};
use super::{Board, UnmakeInfo};

impl Board {
    /// Play a move (legal or pseudo-legal) and return what is needed to undo it.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let us = self.side_to_move;
        let mut info = UnmakeInfo {
            captured: None,
            previous_hash: self.hash,
            previous_halfmove_clock: self.halfmove_clock,
            previous_fullmove_number: self.fullmove_number,
        };
        self.history.push(self.hash);

        if !mv.is_pass() {
            info.captured = self.remove_piece(mv.to());
            if let Some((color, piece)) = self.remove_piece(mv.from()) {
                self.set_piece(mv.to(), color, piece);
            }
        }

        self.halfmove_clock = if info.captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = us.opposite();
        self.hash ^= ZOBRIST.black_to_move_key;

        info
    }

    /// Undo `mv`, which must be the last move made.
    pub fn unmake_move(&mut self, mv: Move, info: UnmakeInfo) {
        self.side_to_move = self.side_to_move.opposite();

        if !mv.is_pass() {
            let moved = self.squares[mv.to().index()].take();
            self.squares[mv.from().index()] = moved;
            self.squares[mv.to().index()] = info.captured;
            if let Some((color, Piece::General)) = moved {
                self.generals[color.index()] = mv.from();
            }
            if let Some((color, Piece::General)) = info.captured {
                self.generals[color.index()] = mv.to();
            }
        }

        self.hash = info.previous_hash;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.fullmove_number = info.previous_fullmove_number;
        self.history.pop();
    }
}
