//! The session manager behind the C surface.
//!
//! A [`Session`] owns the engine, the game state, the reply buffer and the
//! diagnostic stream. Its four public operations mirror the exported C
//! functions; [`ffi`] wraps one process-wide session in a mutex.
//!
//! ```no_run
//! use janggi_bridge::bridge::Session;
//!
//! let mut session = Session::new();
//! session.initialize();
//! session.execute(Some("position startpos moves b0c2"));
//! let reply = session.execute(Some("go depth 3")).to_string();
//! assert!(reply.starts_with("bestmove "));
//! session.shutdown();
//! ```

mod error;
pub mod ffi;
mod output;
mod redirect;

use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};

use crate::board::format_score;
use crate::engine::{BoardState, Engine, EngineError, JanggiEngine, SearchLimits};
use crate::uci::command::{GoCommand, PositionCommand, PositionSetup};
use crate::uci::options::{HASH, THREADS, UCI_CHESS960, UCI_VARIANT};
use crate::uci::{parse_uci_command, UciCommand, ENGINE_AUTHOR, ENGINE_NAME};

pub use error::BridgeError;
pub use output::{OutputBuffer, OUTPUT_CAPACITY};
pub use redirect::{DiagnosticStream, RedirectGuard};

/// Variant every session plays, whatever `UCI_Variant` says at startup.
pub const SESSION_VARIANT: &str = "janggi";

/// Hash size forced during initialization, in MB.
const INIT_HASH_MB: usize = 16;

/// Outcome of [`Session::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    Initialized,
    /// Nothing done; the session was already up.
    AlreadyInitialized,
    /// A stage failed; the session stays uninitialized.
    Failed(String),
}

/// Public operations that provision threads independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Command,
    Analyze,
}

pub struct Session<E: Engine = JanggiEngine> {
    engine: E,
    initialized: bool,
    threads_ready_command: bool,
    threads_ready_analyze: bool,
    state: BoardState,
    /// Text produced by the command being executed.
    captured: String,
    output: OutputBuffer,
    diagnostics: DiagnosticStream,
    /// Stream in place before a host redirect, put back by `shutdown`.
    saved_diagnostics: Option<DiagnosticStream>,
}

impl Session<JanggiEngine> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(JanggiEngine::new())
    }
}

impl Default for Session<JanggiEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Session<E> {
    #[must_use]
    pub fn with_engine(engine: E) -> Self {
        Session {
            engine,
            initialized: false,
            threads_ready_command: false,
            threads_ready_analyze: false,
            state: BoardState::default(),
            captured: String::new(),
            output: OutputBuffer::new(),
            diagnostics: DiagnosticStream::default(),
            saved_diagnostics: None,
        }
    }

    /// Build the engine's static tables. Threads and the start position are
    /// provisioned later, on first use of each entry point.
    pub fn initialize(&mut self) -> InitStatus {
        if self.initialized {
            log::debug!("info string Engine already initialized");
            return InitStatus::AlreadyInitialized;
        }

        match contain(|| self.run_init_stages()) {
            Ok(()) => {
                self.threads_ready_command = false;
                self.threads_ready_analyze = false;
                self.state = BoardState::default();
                self.initialized = true;
                log::debug!("[INIT] All done");
                InitStatus::Initialized
            }
            Err(e) => {
                log::error!("Init exception: {e}");
                self.initialized = false;
                InitStatus::Failed(e.to_string())
            }
        }
    }

    fn run_init_stages(&mut self) -> Result<(), BridgeError> {
        log::debug!("[INIT] pieces");
        self.engine.init_pieces()?;
        log::debug!("[INIT] variants");
        self.engine.init_variants()?;
        log::debug!("[INIT] options");
        self.engine.init_options()?;

        // Option defaults select chess; the session is always Janggi
        let hash = INIT_HASH_MB.to_string();
        let options = self.engine.options_mut();
        for (name, value) in [(UCI_VARIANT, SESSION_VARIANT), (THREADS, "1"), (HASH, &hash)] {
            options.force(name, value).map_err(EngineError::from)?;
        }
        self.engine.resize_hash(INIT_HASH_MB)?;

        log::debug!("[INIT] geometry");
        self.engine.init_geometry()?;
        log::debug!("[INIT] position tables");
        self.engine.init_position_tables()?;

        let active = self.active_variant_name();
        if let Some(variant) = self.engine.find_variant(&active) {
            log::debug!("[INIT] psqt for {active}");
            self.engine.init_psqt(&variant)?;
        }
        Ok(())
    }

    /// Run one command line and return its reply (also kept in the output
    /// buffer). `None` stands for a null pointer from the host.
    pub fn execute(&mut self, command: Option<&str>) -> &str {
        let reply = self.try_execute(command).unwrap_or_else(|e| {
            log::error!("{e}");
            e.to_string()
        });
        self.output.set(&reply)
    }

    fn try_execute(&mut self, command: Option<&str>) -> Result<String, BridgeError> {
        if !self.initialized {
            return Err(BridgeError::NotInitialized);
        }
        self.provision(EntryPoint::Command)?;
        let command = command.ok_or(BridgeError::NullCommand)?;

        log::debug!("[CMD] Processing: '{command}'");
        self.captured.clear();
        contain(|| self.dispatch(command))?;
        Ok(std::mem::take(&mut self.captured))
    }

    /// Search `fen` to `depth` from a clean slate and report
    /// `<score> bestmove <move>`.
    pub fn analyze(&mut self, fen: Option<&str>, depth: i32) -> &str {
        let reply = self.try_analyze(fen, depth).unwrap_or_else(|e| {
            log::error!("[ANALYZE] {e}");
            e.to_string()
        });
        self.output.set(&reply)
    }

    fn try_analyze(&mut self, fen: Option<&str>, depth: i32) -> Result<String, BridgeError> {
        if !self.initialized {
            return Err(BridgeError::NotInitialized);
        }
        self.provision(EntryPoint::Analyze)?;
        let fen = fen.ok_or(BridgeError::NullFen)?;
        contain(|| self.run_analysis(fen, depth))
    }

    fn run_analysis(&mut self, fen: &str, depth: i32) -> Result<String, BridgeError> {
        self.engine.clear_search();
        let variant = self
            .engine
            .find_variant(SESSION_VARIANT)
            .ok_or(BridgeError::VariantNotFound)?;
        self.state = self.engine.set_position(&variant, fen, false, false)?;

        let limits = SearchLimits::depth(depth.max(1).unsigned_abs());
        {
            let mut silenced = RedirectGuard::new(&mut self.diagnostics, DiagnosticStream::Sink);
            self.engine
                .start_search(&self.state, &limits, &mut *silenced)?;
        }

        let outcome = self
            .engine
            .best_line(&self.state)
            .ok_or(BridgeError::NoRootMoves)?;
        let mut reply = format_score(outcome.score);
        if let Some(best) = outcome.best_move() {
            let _ = write!(reply, " bestmove {}", self.engine.format_move(best));
        }
        log::debug!("[ANALYZE] {reply}");
        Ok(reply)
    }

    /// Release threads and search state. A no-op when not initialized.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        let released = contain(|| {
            self.engine.clear_search();
            self.engine.set_threads(0)?;
            Ok(())
        });
        if let Err(e) = released {
            log::error!("cleanup failed: {e}");
        }

        self.restore_diagnostics();
        self.threads_ready_command = false;
        self.threads_ready_analyze = false;
        self.state = BoardState::default();
        self.initialized = false;
        log::debug!("[CLEANUP] done");
    }

    /// Send search diagnostics somewhere else until `restore_diagnostics`
    /// or `shutdown`.
    pub fn redirect_diagnostics(&mut self, stream: DiagnosticStream) {
        let previous = std::mem::replace(&mut self.diagnostics, stream);
        if self.saved_diagnostics.is_none() {
            self.saved_diagnostics = Some(previous);
        }
    }

    pub fn restore_diagnostics(&mut self) {
        if let Some(saved) = self.saved_diagnostics.take() {
            self.diagnostics = saved;
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn threads_ready(&self, entry: EntryPoint) -> bool {
        match entry {
            EntryPoint::Command => self.threads_ready_command,
            EntryPoint::Analyze => self.threads_ready_analyze,
        }
    }

    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// First use of an entry point: one search thread, clean search state,
    /// Janggi start position. Readiness stays false on failure so the next
    /// call retries.
    fn provision(&mut self, entry: EntryPoint) -> Result<(), BridgeError> {
        if self.threads_ready(entry) {
            return Ok(());
        }
        log::debug!("[LAZY] Initializing threads for {entry:?}");

        let result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<(), EngineError> {
            self.engine.set_threads(1)?;
            self.engine.clear_search();
            if let Some(variant) = self.engine.find_variant(SESSION_VARIANT) {
                self.state = self.engine.set_position(&variant, &variant.start_fen, false, false)?;
            }
            Ok(())
        }));
        let message = match result {
            Ok(Ok(())) => {
                match entry {
                    EntryPoint::Command => self.threads_ready_command = true,
                    EntryPoint::Analyze => self.threads_ready_analyze = true,
                }
                log::debug!("[LAZY] Thread initialization SUCCESS");
                return Ok(());
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => match BridgeError::from_panic(payload.as_ref()) {
                BridgeError::Panic(message) => message,
                _ => "unknown exception".to_string(),
            },
        };
        Err(BridgeError::Provisioning(message))
    }

    fn dispatch(&mut self, line: &str) -> Result<(), BridgeError> {
        match parse_uci_command(line) {
            UciCommand::Position(command) => {
                self.handle_position(command)?;
                log::debug!("[DEBUG] Internal FEN: {}", self.state.fen());
                self.reply("ok");
            }
            UciCommand::Go(command) => self.handle_go(command)?,
            UciCommand::SetOption { name, value } => {
                self.handle_setoption(&name, &value)?;
                self.reply("ok");
            }
            UciCommand::IsReady => self.reply("readyok"),
            UciCommand::Uci => {
                self.reply(&format!("id name {ENGINE_NAME}"));
                self.reply(&format!("id author {ENGINE_AUTHOR}"));
                self.reply("uciok");
            }
            UciCommand::UciNewGame => {
                self.engine.clear_search();
                self.state = match self.engine.find_variant(SESSION_VARIANT) {
                    Some(variant) => {
                        self.engine
                            .set_position(&variant, &variant.start_fen, false, false)?
                    }
                    None => BoardState::default(),
                };
                self.reply("ok");
            }
            UciCommand::Quit => {
                self.engine.stop();
                self.reply("ok");
            }
            UciCommand::Empty => {}
            UciCommand::Unknown(line) => {
                log::debug!("[CMD] Unknown command: {line}");
                self.reply(&format!("Unknown command: {line}"));
            }
        }
        Ok(())
    }

    fn reply(&mut self, line: &str) {
        self.captured.push_str(line);
        self.captured.push('\n');
    }

    /// Replace the game with the requested setup and play the move list,
    /// stopping at the first token that is not a legal move.
    fn handle_position(&mut self, command: PositionCommand) -> Result<(), BridgeError> {
        let active = self.active_variant_name();
        let (fen, sfen) = match command.setup {
            PositionSetup::StartPos => match self.engine.find_variant(&active) {
                Some(variant) => (variant.start_fen.clone(), false),
                None => {
                    log::error!("error: variant not found");
                    return Ok(());
                }
            },
            PositionSetup::Fen(fen) => (fen, false),
            PositionSetup::Sfen(fen) => (fen, true),
            PositionSetup::Unrecognised => return Ok(()),
        };
        let Some(variant) = self.engine.find_variant(&active) else {
            log::error!("error: variant not found");
            return Ok(());
        };
        let chess960 = self.engine.options().check(UCI_CHESS960).unwrap_or(false);
        self.state = self.engine.set_position(&variant, &fen, chess960, sfen)?;

        let mut applied = 0;
        for token in &command.moves {
            match self.engine.parse_move(&mut self.state, token) {
                Some(mv) => {
                    self.state.apply(mv);
                    applied += 1;
                }
                None => {
                    log::error!("[MOVE_PARSE] Invalid move, stopping: {token}");
                    break;
                }
            }
        }
        log::debug!(
            "[MOVE_PARSE] Applied {applied} moves. Side to move: {:?}",
            self.state.board().side_to_move()
        );
        Ok(())
    }

    fn handle_go(&mut self, command: GoCommand) -> Result<(), BridgeError> {
        let GoCommand {
            mut limits,
            searchmoves,
        } = command;
        for token in &searchmoves {
            if let Some(mv) = self.engine.parse_move(&mut self.state, token) {
                limits.searchmoves.push(mv);
            }
        }

        self.engine
            .start_search(&self.state, &limits, &mut self.diagnostics)?;

        let Some(outcome) = self.engine.best_line(&self.state) else {
            log::debug!("[CMD] No root moves found");
            return Ok(());
        };
        if let Some(best) = outcome.best_move() {
            let mut line = format!("bestmove {}", self.engine.format_move(best));
            if let Some(ponder) = outcome.ponder_move() {
                let _ = write!(line, " ponder {}", self.engine.format_move(ponder));
            }
            log::debug!("[CMD] Found {line}");
            self.reply(&line);
        }
        Ok(())
    }

    /// Unknown names and rejected values are ignored, as UCI engines do.
    fn handle_setoption(&mut self, name: &str, value: &str) -> Result<(), BridgeError> {
        if !self.engine.options().contains(name) {
            log::debug!("setoption ignored, no option named {name:?}");
            return Ok(());
        }
        match self.engine.set_option(name, value) {
            Ok(()) => Ok(()),
            Err(EngineError::Option(e)) => {
                log::debug!("setoption ignored: {e}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn active_variant_name(&self) -> String {
        self.engine.options().value(UCI_VARIANT).unwrap_or_default()
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Run `f`, turning a panic into a [`BridgeError`].
fn contain<T>(f: impl FnOnce() -> Result<T, BridgeError>) -> Result<T, BridgeError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(BridgeError::from_panic(payload.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> Session {
        let mut session = Session::new();
        assert_eq!(session.initialize(), InitStatus::Initialized);
        session.redirect_diagnostics(DiagnosticStream::Sink);
        session
    }

    #[test]
    fn uninitialized_session_refuses_work() {
        let mut session = Session::new();
        assert_eq!(session.execute(Some("isready")), "error: Engine not initialized");
        assert_eq!(
            session.analyze(Some(crate::variant::JANGGI_START_FEN), 1),
            "error: Engine not initialized"
        );
        assert!(!session.threads_ready(EntryPoint::Command));
    }

    #[test]
    fn second_initialize_is_informational() {
        let mut session = ready();
        assert_eq!(session.execute(Some("setoption name Hash value 8")), "ok\n");
        assert_eq!(session.initialize(), InitStatus::AlreadyInitialized);
        assert!(session.is_initialized());
        // Stages were skipped, so the forced Hash = 16 did not come back
        assert_eq!(session.engine().options().spin(HASH), Some(8));
        assert_eq!(session.engine().hash_size_mb(), 8);
    }

    #[test]
    fn init_forces_janggi_options() {
        let session = ready();
        let options = session.engine().options();
        assert_eq!(options.value(UCI_VARIANT).as_deref(), Some("janggi"));
        assert_eq!(options.spin(THREADS), Some(1));
        assert_eq!(options.spin(HASH), Some(16));
        assert_eq!(session.engine().psqt().variant(), "janggi");
        // Threads are provisioned lazily
        assert_eq!(session.engine().thread_count(), 0);
    }

    #[test]
    fn entry_points_provision_independently() {
        let mut session = ready();
        session.execute(Some("isready"));
        assert!(session.threads_ready(EntryPoint::Command));
        assert!(!session.threads_ready(EntryPoint::Analyze));
        assert_eq!(session.engine().thread_count(), 1);

        session.analyze(Some(crate::variant::JANGGI_START_FEN), 1);
        assert!(session.threads_ready(EntryPoint::Analyze));
    }

    #[test]
    fn null_inputs_are_reported() {
        let mut session = ready();
        assert_eq!(session.execute(None), "error: Null command");
        assert_eq!(session.analyze(None, 3), "error: Null FEN");
        // Provisioning still happened before the null check
        assert!(session.threads_ready(EntryPoint::Command));
    }

    #[test]
    fn empty_command_replies_nothing() {
        let mut session = ready();
        assert_eq!(session.execute(Some("   ")), "");
        assert_eq!(session.output().as_c_str().to_bytes(), b"");
    }

    #[test]
    fn setoption_ignores_unknown_and_invalid() {
        let mut session = ready();
        assert_eq!(session.execute(Some("setoption name Bogus value 1")), "ok\n");
        assert_eq!(session.execute(Some("setoption name Hash value lots")), "ok\n");
        assert_eq!(session.engine().options().spin(HASH), Some(16));

        assert_eq!(session.execute(Some("setoption name Move Overhead value 250")), "ok\n");
        assert_eq!(session.engine().time_config().move_overhead_ms, 250);
    }

    #[test]
    fn bad_fen_keeps_previous_position() {
        let mut session = ready();
        session.execute(Some("position startpos moves b0c2"));
        let before = session.state().fen();
        let reply = session.execute(Some("position fen 9/9 w")).to_string();
        assert!(reply.starts_with("error: Exception - Invalid FEN"), "{reply}");
        assert_eq!(session.state().fen(), before);
    }

    #[test]
    fn sfen_swaps_side_letters() {
        let mut session = ready();
        session.execute(Some("position sfen 4k4/9/9/9/9/9/9/9/9/4K4 b"));
        assert_eq!(
            session.state().board().side_to_move(),
            crate::board::Color::White
        );
    }

    #[test]
    fn ucinewgame_resets_to_start() {
        let mut session = ready();
        session.execute(Some("position startpos moves b0c2 b9c7"));
        assert_eq!(session.state().chain().len(), 3);
        assert_eq!(session.execute(Some("ucinewgame")), "ok\n");
        assert_eq!(session.state().chain().len(), 1);
        assert_eq!(session.state().fen(), crate::variant::JANGGI_START_FEN);
    }

    #[test]
    fn go_streams_info_to_diagnostics() {
        let mut session = ready();
        let (stream, captured) = DiagnosticStream::capture();
        session.redirect_diagnostics(stream);
        session.execute(Some("position startpos"));
        let reply = session.execute(Some("go depth 2")).to_string();
        assert!(reply.starts_with("bestmove "), "{reply}");

        let info = String::from_utf8(captured.lock().clone()).unwrap();
        assert_eq!(info.lines().count(), 2);
    }

    #[test]
    fn analyze_silences_diagnostics_and_restores_stream() {
        let mut session = ready();
        let (stream, captured) = DiagnosticStream::capture();
        session.redirect_diagnostics(stream);

        let reply = session
            .analyze(Some("4k4/8R/9/9/9/9/9/9/9/R2K5 w - - 0 1"), 2)
            .to_string();
        assert_eq!(reply, "mate 1 bestmove a0a9");
        assert!(captured.lock().is_empty());

        session.execute(Some("go depth 1"));
        assert!(!captured.lock().is_empty());
    }

    #[test]
    fn analyze_clamps_depth() {
        let mut session = ready();
        let reply = session
            .analyze(Some(crate::variant::JANGGI_START_FEN), -4)
            .to_string();
        assert!(reply.starts_with("cp "), "{reply}");
        assert!(reply.contains(" bestmove "), "{reply}");
    }

    #[test]
    fn shutdown_resets_everything() {
        let mut session = ready();
        session.execute(Some("position startpos moves b0c2"));
        session.analyze(Some(crate::variant::JANGGI_START_FEN), 1);
        session.shutdown();

        assert!(!session.is_initialized());
        assert!(!session.threads_ready(EntryPoint::Command));
        assert!(!session.threads_ready(EntryPoint::Analyze));
        assert_eq!(session.engine().thread_count(), 0);
        assert_eq!(session.state().chain().len(), 1);
        assert_eq!(session.execute(Some("isready")), "error: Engine not initialized");

        // Idempotent
        session.shutdown();
        assert_eq!(session.initialize(), InitStatus::Initialized);
        assert_eq!(session.execute(Some("isready")), "readyok\n");
    }
}
