//! Square types and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// Number of files (a-i).
pub const FILES: usize = 9;
/// Number of ranks (0-9).
pub const RANKS: usize = 10;
/// Number of squares on the board.
pub const NUM_SQUARES: usize = FILES * RANKS;

pub(crate) fn file_to_index(file: char) -> Option<usize> {
    let idx = (file as usize).checked_sub('a' as usize)?;
    (idx < FILES).then_some(idx)
}

pub(crate) fn rank_to_index(rank: char) -> Option<usize> {
    let idx = rank.to_digit(10)? as usize;
    (idx < RANKS).then_some(idx)
}

/// A point on the Janggi board.
///
/// Index layout is `rank * 9 + file`: a0 = 0, i0 = 8, a1 = 9, ..., i9 = 89.
/// Rank 0 is the first player's back rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a square from file and rank, returning `None` when off the board.
    #[must_use]
    pub fn new(file: usize, rank: usize) -> Option<Self> {
        if file < FILES && rank < RANKS {
            Some(Square((rank * FILES + file) as u8))
        } else {
            None
        }
    }

    /// Create a square from an index (0-89). The caller guarantees the range.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES);
        Square(idx as u8)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File (0-8, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        self.0 as usize % FILES
    }

    /// Rank (0-9)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        self.0 as usize / FILES
    }

    /// Step by a file/rank delta, staying on the board.
    #[inline]
    #[must_use]
    pub fn offset(self, df: i32, dr: i32) -> Option<Square> {
        let file = self.file() as i32 + df;
        let rank = self.rank() as i32 + dr;
        if (0..FILES as i32).contains(&file) && (0..RANKS as i32).contains(&rank) {
            Some(Square((rank * FILES as i32 + file) as u8))
        } else {
            None
        }
    }

    /// Mirror the square across the river (a0 <-> a9).
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        let rank = RANKS - 1 - self.rank();
        Square((rank * FILES + self.file()) as u8)
    }

    /// Iterate over every square in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (self.file() as u8 + b'a') as char, self.rank())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        };
        let file = file_to_index(f).ok_or(SquareError::FileOutOfBounds { file: f })?;
        let rank = rank_to_index(r).ok_or(SquareError::RankOutOfBounds { rank: r })?;
        Square::new(file, rank).ok_or_else(|| SquareError::InvalidNotation {
            notation: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_notation_roundtrip() {
        let sq: Square = "e1".parse().unwrap();
        assert_eq!(sq.file(), 4);
        assert_eq!(sq.rank(), 1);
        assert_eq!(sq.index(), 13);
        assert_eq!(sq.to_string(), "e1");
    }

    #[test]
    fn square_rejects_off_board_notation() {
        assert!("j0".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!("a10".parse::<Square>().is_err());
    }

    #[test]
    fn offset_stays_on_board() {
        let a0 = Square::new(0, 0).unwrap();
        assert_eq!(a0.offset(-1, 0), None);
        assert_eq!(a0.offset(1, 2), Square::new(1, 2));
        let i9 = Square::new(8, 9).unwrap();
        assert_eq!(i9.offset(0, 1), None);
        assert_eq!(i9.flip_vertical(), Square::new(8, 0).unwrap());
    }
}
