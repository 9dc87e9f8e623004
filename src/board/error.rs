//! Error types for board operations.

use thiserror::Error;

use super::types::Color;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// FEN string has no piece placement field
    #[error("FEN is empty")]
    Empty,
    /// Wrong number of ranks in the placement field
    #[error("FEN must describe 10 ranks, found {found}")]
    WrongRankCount { found: usize },
    /// Invalid piece character in position string
    #[error("Invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    /// Too many files in a rank
    #[error("Too many files ({files}) in rank {rank}")]
    TooManyFiles { rank: usize, files: usize },
    /// A rank that does not add up to 9 files
    #[error("Rank {rank} has {files} files, expected 9")]
    ShortRank { rank: usize, files: usize },
    /// Invalid side to move (must be 'w' or 'b')
    #[error("Invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    /// Each side needs exactly one general inside its palace
    #[error("{color} must have exactly one general inside its palace")]
    BadGeneral { color: Color },
    /// Non-numeric move counter
    #[error("Invalid move counter '{found}' in FEN")]
    InvalidCounter { found: String },
}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4 characters)
    #[error("Move must be 4 characters, found {len}")]
    InvalidLength { len: usize },
    /// Invalid square notation in move
    #[error("Invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    /// Move is not legal in the current position
    #[error("Illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-9)
    #[error("Rank '{rank}' out of bounds (must be 0-9)")]
    RankOutOfBounds { rank: char },
    /// File out of bounds (must be a-i)
    #[error("File '{file}' out of bounds (must be a-i)")]
    FileOutOfBounds { file: char },
    /// Invalid coordinate notation
    #[error("Invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_rank_count() {
        let err = FenError::WrongRankCount { found: 8 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains('8'));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let err = FenError::InvalidPiece { char: 'q' };
        assert!(err.to_string().contains("'q'"));
    }

    #[test]
    fn test_fen_error_bad_general() {
        let err = FenError::BadGeneral {
            color: Color::Black,
        };
        assert!(err.to_string().starts_with("black"));
    }

    #[test]
    fn test_move_parse_error_display() {
        let err = MoveParseError::IllegalMove {
            notation: "a0a5".to_string(),
        };
        assert_eq!(err.to_string(), "Illegal move 'a0a5'");
    }

    #[test]
    fn test_square_error_display() {
        let err = SquareError::FileOutOfBounds { file: 'j' };
        assert!(err.to_string().contains("'j'"));
        assert!(err.to_string().contains("a-i"));
    }
}
