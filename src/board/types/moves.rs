//! Move types and move list.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::square::Square;

const SQUARE_MASK: u16 = 0x7F;
const TO_SHIFT: u16 = 7;
const FLAG_CAPTURE: u16 = 1 << 14;

/// Compact 16-bit move representation.
///
/// Encoding:
/// - bits 0-6:   from square (0-89)
/// - bits 7-13:  to square (0-89)
/// - bit 14:     capture flag
///
/// A pass is encoded as a move whose source and destination coincide
/// (the general "moves" onto its own square).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// Create a null/empty move (used for initialization)
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(0)
    }

    /// Create a quiet move
    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move(from.index() as u16 | ((to.index() as u16) << TO_SHIFT))
    }

    /// Create a capture move
    #[inline]
    #[must_use]
    pub const fn capture(from: Square, to: Square) -> Self {
        Move(Move::quiet(from, to).0 | FLAG_CAPTURE)
    }

    /// Create a pass for the general standing on `general`
    #[inline]
    #[must_use]
    pub const fn pass(general: Square) -> Self {
        Move::quiet(general, general)
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & SQUARE_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> TO_SHIFT) & SQUARE_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.0 & FLAG_CAPTURE != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_pass(self) -> bool {
        !self.is_null() && (self.0 & SQUARE_MASK) == ((self.0 >> TO_SHIFT) & SQUARE_MASK)
    }

    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture()
    }

    /// Get the raw 16-bit value (for hashing/storage)
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Create from raw 16-bit value
    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        Move(value)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from(), self.to())?;
        if self.is_capture() {
            write!(f, " cap")?;
        }
        if self.is_pass() {
            write!(f, " pass")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub(crate) const MAX_PLY: usize = 128;
pub(crate) const EMPTY_MOVE: Move = Move::null();

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, mv: Move) {
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// Keep only moves matching the predicate, preserving order.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write;
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn move_encodes_squares_and_flags() {
        let mv = Move::capture(sq("b0"), sq("c2"));
        assert_eq!(mv.from(), sq("b0"));
        assert_eq!(mv.to(), sq("c2"));
        assert!(mv.is_capture());
        assert!(!mv.is_pass());
        assert_eq!(mv.to_string(), "b0c2");
        assert_eq!(Move::from_u16(mv.as_u16()), mv);
    }

    #[test]
    fn pass_is_general_to_own_square() {
        let mv = Move::pass(sq("e1"));
        assert!(mv.is_pass());
        assert_eq!(mv.to_string(), "e1e1");
        assert!(!Move::null().is_pass());
    }

    #[test]
    fn retain_preserves_order() {
        let mut list = MoveList::new();
        list.push(Move::quiet(sq("a0"), sq("a1")));
        list.push(Move::quiet(sq("a0"), sq("a2")));
        list.push(Move::quiet(sq("a0"), sq("a3")));
        list.retain(|m| m.to() != sq("a2"));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].to(), sq("a3"));
    }
}
