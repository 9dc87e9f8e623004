pub mod board;
pub mod bridge;
pub mod engine;
pub mod sync;
pub mod tt;
pub mod uci;
pub mod variant;
pub mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use bridge::ffi::{stockfish_analyze, stockfish_cleanup, stockfish_command, stockfish_init};
pub use bridge::{BridgeError, InitStatus, Session};
pub use engine::{Engine, EngineError, JanggiEngine};
pub use tt::TranspositionTable;
