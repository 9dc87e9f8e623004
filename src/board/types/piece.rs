//! Piece and color types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Janggi piece types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

/// Number of distinct piece types.
pub const PIECE_TYPES: usize = 7;

impl Piece {
    /// All piece types in index order
    pub const ALL: [Piece; PIECE_TYPES] = [
        Piece::General,
        Piece::Advisor,
        Piece::Elephant,
        Piece::Horse,
        Piece::Chariot,
        Piece::Cannon,
        Piece::Soldier,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Piece::General => 0,
            Piece::Advisor => 1,
            Piece::Elephant => 2,
            Piece::Horse => 3,
            Piece::Chariot => 4,
            Piece::Cannon => 5,
            Piece::Soldier => 6,
        }
    }

    /// Parse a piece from its FEN letter (k, a, b, n, r, c, p), either case.
    #[must_use]
    pub fn from_char(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'k' => Some(Piece::General),
            'a' => Some(Piece::Advisor),
            'b' => Some(Piece::Elephant),
            'n' => Some(Piece::Horse),
            'r' => Some(Piece::Chariot),
            'c' => Some(Piece::Cannon),
            'p' => Some(Piece::Soldier),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Piece::General => 'k',
            Piece::Advisor => 'a',
            Piece::Elephant => 'b',
            Piece::Horse => 'n',
            Piece::Chariot => 'r',
            Piece::Cannon => 'c',
            Piece::Soldier => 'p',
        }
    }

    /// Convert piece to character with case based on color (uppercase for White)
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Material value in centipawn-equivalent units.
    ///
    /// Scaled from the customary Korean point count (chariot 13, cannon 7,
    /// horse 5, elephant 3, advisor 3, soldier 2) at 50 units per point.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Piece::General => 0,
            Piece::Advisor => 150,
            Piece::Elephant => 150,
            Piece::Horse => 250,
            Piece::Chariot => 650,
            Piece::Cannon => 350,
            Piece::Soldier => 100,
        }
    }

    /// Pieces confined to the palace.
    #[inline]
    #[must_use]
    pub const fn is_palace_bound(self) -> bool {
        matches!(self, Piece::General | Piece::Advisor)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Side to move. White is the first player (Cho), Black the second (Han).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction of a forward soldier step.
    #[inline]
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}
