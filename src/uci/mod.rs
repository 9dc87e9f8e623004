//! UCI-style command vocabulary spoken through the bridge.
//!
//! [`command`] turns a command line into a [`UciCommand`]; [`options`] holds
//! the engine's option registry.

pub mod command;
pub mod options;

pub use command::{parse_uci_command, GoCommand, PositionCommand, PositionSetup, UciCommand};
pub use options::{OptionChange, OptionError, OptionKind, OptionRegistry, UciOption};

/// Engine identification sent in reply to `uci`.
pub const ENGINE_NAME: &str = "Fairy-Stockfish (Janggi)";
pub const ENGINE_AUTHOR: &str = "Fairy-Stockfish developers";
