//! Static evaluation: material plus piece-square bonuses.

use crate::variant::VariantDescriptor;

use super::types::{Color, Piece, Square, NUM_SQUARES, PIECE_TYPES};
use super::Board;

/// Small bonus for having the move.
const TEMPO: i32 = 10;

/// Piece-square tables from the first player's point of view, material
/// included. Second-player lookups mirror the square across the river.
#[derive(Clone, Debug)]
pub struct Psqt {
    variant: String,
    table: [[i32; NUM_SQUARES]; PIECE_TYPES],
}

impl Psqt {
    /// Build the tables for a variant.
    #[must_use]
    pub fn new(variant: &VariantDescriptor) -> Self {
        let mut table = [[0; NUM_SQUARES]; PIECE_TYPES];
        for piece in Piece::ALL {
            for sq in Square::all() {
                table[piece.index()][sq.index()] = piece.value() + positional_bonus(piece, sq);
            }
        }
        log::debug!("piece-square tables built for {}", variant.name);
        Psqt {
            variant: variant.name.clone(),
            table,
        }
    }

    /// Material only, used before any variant tables exist.
    #[must_use]
    pub fn material_only() -> Self {
        let mut table = [[0; NUM_SQUARES]; PIECE_TYPES];
        for piece in Piece::ALL {
            table[piece.index()] = [piece.value(); NUM_SQUARES];
        }
        Psqt {
            variant: String::new(),
            table,
        }
    }

    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    #[inline]
    #[must_use]
    pub fn value(&self, color: Color, piece: Piece, sq: Square) -> i32 {
        let sq = match color {
            Color::White => sq,
            Color::Black => sq.flip_vertical(),
        };
        self.table[piece.index()][sq.index()]
    }
}

impl Default for Psqt {
    fn default() -> Self {
        Psqt::material_only()
    }
}

/// Doubled distance from the board centre (e4/e5), 0 at the middle.
fn centre_distance(sq: Square) -> i32 {
    let file = sq.file() as i32;
    let rank = sq.rank() as i32;
    (2 * file - 8).abs() + (2 * rank - 9).abs()
}

fn positional_bonus(piece: Piece, sq: Square) -> i32 {
    let file = sq.file() as i32;
    let rank = sq.rank() as i32;
    let central_file = (3..=5).contains(&file);
    match piece {
        Piece::General => match (file, rank) {
            (4, 1) => 10,
            (4, _) => 4,
            _ => 0,
        },
        Piece::Advisor => {
            if file == 4 && rank == 1 {
                8
            } else {
                0
            }
        }
        Piece::Elephant => 10 - centre_distance(sq) / 2,
        Piece::Horse => 20 - 2 * centre_distance(sq),
        Piece::Chariot => {
            let territory = if rank >= 5 { 10 } else { 0 };
            10 - 2 * (file - 4).abs() + territory
        }
        Piece::Cannon => {
            let home = if rank <= 2 { 10 } else { 0 };
            home + if central_file { 5 } else { 0 }
        }
        Piece::Soldier => {
            if rank == 9 {
                // Stuck on the last rank: sideways moves only
                return 10;
            }
            let advance = (rank - 3).max(0) * 8;
            let centre = if central_file { 6 } else { 0 };
            let palace = if central_file && rank >= 7 { 20 } else { 0 };
            advance + centre + palace
        }
    }
}

impl Board {
    /// Evaluate from the side to move's point of view.
    #[must_use]
    pub fn evaluate(&self, psqt: &Psqt) -> i32 {
        let mut score = [0i32; 2];
        for sq in Square::all() {
            if let Some((color, piece)) = self.piece_at(sq) {
                score[color.index()] += psqt.value(color, piece, sq);
            }
        }
        let us = self.side_to_move.index();
        score[us] - score[1 - us] + TEMPO
    }
}
