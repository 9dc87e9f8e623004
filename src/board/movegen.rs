//! Move generation and attack detection.
//!
//! Pseudo-legal moves are produced per piece from the geometry tables;
//! legality is decided by making the move and testing the own general.

use super::geometry::{
    elephant_moves, elephant_sources, horse_moves, horse_sources, palace_diag_step, palace_moves,
    soldier_moves, soldier_sources, ORTHOGONAL,
};
use super::types::{Color, Move, MoveList, Piece, Square};
use super::Board;

/// A line walked by sliding pieces: an orthogonal ray or a palace diagonal.
#[derive(Clone, Copy)]
enum Ray {
    Orthogonal(i32, i32),
    PalaceDiagonal(usize),
}

const RAYS: [Ray; 8] = [
    Ray::Orthogonal(ORTHOGONAL[0].0, ORTHOGONAL[0].1),
    Ray::Orthogonal(ORTHOGONAL[1].0, ORTHOGONAL[1].1),
    Ray::Orthogonal(ORTHOGONAL[2].0, ORTHOGONAL[2].1),
    Ray::Orthogonal(ORTHOGONAL[3].0, ORTHOGONAL[3].1),
    Ray::PalaceDiagonal(0),
    Ray::PalaceDiagonal(1),
    Ray::PalaceDiagonal(2),
    Ray::PalaceDiagonal(3),
];

impl Ray {
    #[inline]
    fn step(self, sq: Square) -> Option<Square> {
        match self {
            Ray::Orthogonal(df, dr) => sq.offset(df, dr),
            Ray::PalaceDiagonal(dir) => palace_diag_step(sq, dir),
        }
    }
}

impl Board {
    #[inline]
    fn push_target(&self, list: &mut MoveList, from: Square, to: Square, captures_only: bool) {
        match self.piece_at(to) {
            None if !captures_only => list.push(Move::quiet(from, to)),
            Some((color, _)) if color != self.side_to_move => list.push(Move::capture(from, to)),
            _ => {}
        }
    }

    fn generate_slider_moves(&self, list: &mut MoveList, from: Square, captures_only: bool) {
        for ray in RAYS {
            let mut cur = from;
            while let Some(to) = ray.step(cur) {
                self.push_target(list, from, to, captures_only);
                if !self.is_empty(to) {
                    break;
                }
                cur = to;
            }
        }
    }

    fn generate_cannon_moves(&self, list: &mut MoveList, from: Square, captures_only: bool) {
        for ray in RAYS {
            let mut cur = from;
            let mut screened = false;
            while let Some(to) = ray.step(cur) {
                cur = to;
                match self.piece_at(to) {
                    None if screened && !captures_only => list.push(Move::quiet(from, to)),
                    None => {}
                    Some((_, Piece::Cannon)) => break,
                    Some(_) if !screened => screened = true,
                    Some((color, _)) => {
                        if color != self.side_to_move {
                            list.push(Move::capture(from, to));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn generate_piece_moves(
        &self,
        list: &mut MoveList,
        from: Square,
        piece: Piece,
        captures_only: bool,
    ) {
        match piece {
            Piece::General | Piece::Advisor => {
                for &to in palace_moves(from) {
                    self.push_target(list, from, to, captures_only);
                }
            }
            Piece::Horse => {
                for step in horse_moves(from) {
                    if self.is_empty(step.leg) {
                        self.push_target(list, from, step.target, captures_only);
                    }
                }
            }
            Piece::Elephant => {
                for step in elephant_moves(from) {
                    if step.legs.iter().all(|&leg| self.is_empty(leg)) {
                        self.push_target(list, from, step.target, captures_only);
                    }
                }
            }
            Piece::Chariot => self.generate_slider_moves(list, from, captures_only),
            Piece::Cannon => self.generate_cannon_moves(list, from, captures_only),
            Piece::Soldier => {
                for &to in soldier_moves(self.side_to_move, from) {
                    self.push_target(list, from, to, captures_only);
                }
            }
        }
    }

    /// Pseudo-legal moves for the side to move, excluding the pass.
    pub(crate) fn generate_pseudo_moves(&self, captures_only: bool) -> MoveList {
        let mut list = MoveList::new();
        for sq in Square::all() {
            if let Some((color, piece)) = self.piece_at(sq) {
                if color == self.side_to_move {
                    self.generate_piece_moves(&mut list, sq, piece, captures_only);
                }
            }
        }
        list
    }

    fn retain_legal(&mut self, list: &mut MoveList) {
        let us = self.side_to_move;
        list.retain(|mv| {
            let info = self.make_move(mv);
            let legal = !self.is_in_check(us);
            self.unmake_move(mv, info);
            legal
        });
    }

    /// All legal moves, including the pass when the rules allow it and the
    /// side to move is not in check.
    pub fn generate_moves(&mut self) -> MoveList {
        let mut list = self.generate_pseudo_moves(false);
        self.retain_legal(&mut list);
        let us = self.side_to_move;
        if self.rules.allow_pass && !self.is_in_check(us) {
            list.push(Move::pass(self.general_square(us)));
        }
        list
    }

    /// Legal captures only (quiescence search).
    pub fn generate_captures(&mut self) -> MoveList {
        let mut list = self.generate_pseudo_moves(true);
        self.retain_legal(&mut list);
        list
    }

    /// True if `mv` is legal in the current position.
    pub fn is_legal_move(&mut self, mv: Move) -> bool {
        !mv.is_null() && self.generate_moves().contains(mv)
    }

    /// True if any piece of `by` attacks `sq`.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let target_is_cannon = matches!(self.piece_at(sq), Some((_, Piece::Cannon)));

        for ray in RAYS {
            let mut cur = sq;
            let mut screened = false;
            while let Some(next) = ray.step(cur) {
                cur = next;
                let Some((color, piece)) = self.piece_at(next) else {
                    continue;
                };
                if !screened {
                    if color == by && piece == Piece::Chariot {
                        return true;
                    }
                    if piece == Piece::Cannon {
                        break;
                    }
                    screened = true;
                } else {
                    if color == by && piece == Piece::Cannon && !target_is_cannon {
                        return true;
                    }
                    break;
                }
            }
        }

        if horse_sources(sq)
            .iter()
            .any(|src| self.is_piece(src.origin, by, Piece::Horse) && self.is_empty(src.step.leg))
        {
            return true;
        }

        if elephant_sources(sq).iter().any(|src| {
            self.is_piece(src.origin, by, Piece::Elephant)
                && src.step.legs.iter().all(|&leg| self.is_empty(leg))
        }) {
            return true;
        }

        if soldier_sources(by, sq)
            .iter()
            .any(|&origin| self.is_piece(origin, by, Piece::Soldier))
        {
            return true;
        }

        palace_moves(sq).iter().any(|&origin| {
            self.is_piece(origin, by, Piece::General) || self.is_piece(origin, by, Piece::Advisor)
        })
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.general_square(color), color.opposite())
    }

    /// Both generals on one file with nothing between them (bikjang).
    #[must_use]
    pub fn generals_facing(&self) -> bool {
        let white = self.general_square(Color::White);
        let black = self.general_square(Color::Black);
        if white.file() != black.file() {
            return false;
        }
        let (low, high) = (white.rank().min(black.rank()), white.rank().max(black.rank()));
        ((low + 1)..high).all(|rank| {
            Square::new(white.file(), rank).map_or(true, |sq| self.is_empty(sq))
        })
    }

    /// Count leaf nodes of the legal move tree.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &m in moves.iter() {
            let info = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, info);
        }

        nodes
    }
}
