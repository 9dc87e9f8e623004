use std::str::FromStr;

use crate::variant::VariantRules;

use super::error::{FenError, MoveParseError};
use super::geometry::palace_of;
use super::types::{Color, Move, Piece, Square, FILES, RANKS};
use super::Board;

impl Board {
    /// Parse a position from FEN notation under the given rules.
    ///
    /// Only the placement field is mandatory. With `sfen` the side letter is
    /// read the other way round: `b` names the first player.
    pub fn try_from_fen_with(fen: &str, rules: VariantRules, sfen: bool) -> Result<Self, FenError> {
        let mut board = Board::empty(rules);
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let placement = parts.first().ok_or(FenError::Empty)?;

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != RANKS {
            return Err(FenError::WrongRankCount { found: rows.len() });
        }

        let mut general_count = [0usize; 2];
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = RANKS - 1 - row_idx;
            let mut file = 0;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|&d| d > 0) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= FILES {
                    return Err(FenError::TooManyFiles {
                        rank,
                        files: file + 1,
                    });
                }
                let sq = Square::from_index(rank * FILES + file);
                if piece == Piece::General {
                    if palace_of(sq) != Some(color) {
                        return Err(FenError::BadGeneral { color });
                    }
                    general_count[color.index()] += 1;
                }
                board.set_piece(sq, color, piece);
                file += 1;
            }
            if file > FILES {
                return Err(FenError::TooManyFiles { rank, files: file });
            }
            if file < FILES {
                return Err(FenError::ShortRank { rank, files: file });
            }
        }

        for color in [Color::White, Color::Black] {
            if general_count[color.index()] != 1 {
                return Err(FenError::BadGeneral { color });
            }
        }

        board.side_to_move = match (parts.get(1).copied(), sfen) {
            (None, _) | (Some("w"), false) | (Some("b"), true) => Color::White,
            (Some("b"), false) | (Some("w"), true) => Color::Black,
            (Some(other), _) => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // Fields 3 and 4 (castling, en passant) carry no meaning in Janggi.
        if let Some(half) = parts.get(4) {
            board.halfmove_clock = parse_counter(half)?;
        }
        if let Some(full) = parts.get(5) {
            board.fullmove_number = parse_counter(full)?.max(1);
        }

        board.hash = board.calculate_hash();
        Ok(board)
    }

    /// Parse a FEN under default Janggi rules.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        Board::try_from_fen_with(fen, VariantRules::default(), false)
    }

    /// Convert the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(RANKS);
        for rank in (0..RANKS).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..FILES {
                let sq = Square::from_index(rank * FILES + file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        format!(
            "{} {} - - {} {}",
            rows.join("/"),
            active,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in coordinate notation (e.g. "b0c2", or "e1e1" for a pass).
    ///
    /// Returns the matching legal move if found.
    pub fn parse_move(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        if notation.len() != 4 || !notation.is_ascii() {
            return Err(MoveParseError::InvalidLength {
                len: notation.chars().count(),
            });
        }

        let invalid = || MoveParseError::InvalidSquare {
            notation: notation.to_string(),
        };
        let from_sq: Square = notation[..2].parse().map_err(|_| invalid())?;
        let to_sq: Square = notation[2..].parse().map_err(|_| invalid())?;

        self.generate_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from_sq && mv.to() == to_sq)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: notation.to_string(),
            })
    }

    /// Parse a move and play it in one call.
    pub fn make_move_str(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(notation)?;
        self.make_move(mv);
        Ok(mv)
    }
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidCounter {
        found: field.to_string(),
    })
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
