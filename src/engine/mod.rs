//! The engine collaborator the bridge drives.
//!
//! [`Engine`] is the seam between the session manager and a search engine:
//! lifecycle stages, option storage, variant lookup, position setup, move
//! notation and a blocking search. [`JanggiEngine`] is the built-in
//! implementation.

mod janggi;
mod limits;
mod position;
pub mod threads;
pub mod time;

use std::io::Write;
use std::sync::Arc;

use thiserror::Error;

use crate::board::{FenError, Move, SearchOutcome};
use crate::tt::HashAllocError;
use crate::uci::options::{OptionError, OptionRegistry};
use crate::variant::VariantDescriptor;

pub use janggi::JanggiEngine;
pub use limits::{SearchLimits, UNBOUNDED_DEPTH, UNBOUNDED_TIME_MS};
pub use position::{BoardState, Snapshot};
pub use threads::{ThreadPool, WorkerMessage};
pub use time::{TimeConfig, TimeControl};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid FEN: {0}")]
    Fen(#[from] FenError),
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error(transparent)]
    Hash(#[from] HashAllocError),
    #[error("Failed to spawn search thread: {0}")]
    ThreadSpawn(String),
    #[error("No search threads")]
    NoThreads,
    #[error("Search worker disconnected")]
    WorkerLost,
    #[error("Search failed: {0}")]
    SearchFailed(String),
    #[error("Engine stage not initialized: {0}")]
    NotReady(&'static str),
}

/// A UCI-style search engine as seen by the session manager.
///
/// Lifecycle stages run once, in declaration order, from
/// `Session::initialize`. Everything after them may be called repeatedly.
pub trait Engine: Send {
    /// Piece definition tables.
    fn init_pieces(&mut self) -> Result<(), EngineError>;

    /// Variant registry.
    fn init_variants(&mut self) -> Result<(), EngineError>;

    /// Option defaults. Resets `UCI_Variant` to its default.
    fn init_options(&mut self) -> Result<(), EngineError>;

    /// Board geometry and attack tables.
    fn init_geometry(&mut self) -> Result<(), EngineError>;

    /// Position-invariant data such as hash keys.
    fn init_position_tables(&mut self) -> Result<(), EngineError>;

    /// Piece-square tables for `variant`.
    fn init_psqt(&mut self, variant: &VariantDescriptor) -> Result<(), EngineError>;

    fn options(&self) -> &OptionRegistry;

    /// Raw option storage; writes through here notify nobody.
    fn options_mut(&mut self) -> &mut OptionRegistry;

    /// Validated option write that applies side effects (hash resize,
    /// thread count, variant tables). Invalid values surface as
    /// [`EngineError::Option`] and leave the option unchanged.
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError>;

    fn find_variant(&self, name: &str) -> Option<Arc<VariantDescriptor>>;

    /// Resize the worker pool; `0` joins every worker.
    fn set_threads(&mut self, count: usize) -> Result<(), EngineError>;

    /// Replace the hash table. On failure the old table stays in use.
    fn resize_hash(&mut self, size_mb: usize) -> Result<(), EngineError>;

    /// Forget everything learned by earlier searches.
    fn clear_search(&mut self);

    /// Build a fresh state from a FEN under `variant`'s rules.
    fn set_position(
        &self,
        variant: &Arc<VariantDescriptor>,
        fen: &str,
        chess960: bool,
        sfen: bool,
    ) -> Result<BoardState, EngineError>;

    /// Resolve a move token against the current position.
    fn parse_move(&self, state: &mut BoardState, token: &str) -> Option<Move>;

    fn format_move(&self, mv: Move) -> String;

    /// Search `state` within `limits`, blocking until done or stopped.
    /// Per-iteration `info` lines go to `diagnostics`.
    fn start_search(
        &mut self,
        state: &BoardState,
        limits: &SearchLimits,
        diagnostics: &mut dyn Write,
    ) -> Result<(), EngineError>;

    /// Result of the last search of `state`. `None` when that search had
    /// no root moves or `state` was never searched.
    fn best_line(&self, state: &BoardState) -> Option<SearchOutcome>;

    /// Ask a running search to stop.
    fn stop(&self);
}
