//! Built-in Janggi engine.

use std::io::Write;
use std::sync::Arc;

use crate::board::{geometry, Board, Move, Psqt, SearchOutcome};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::uci::options::{self, OptionChange, OptionRegistry};
use crate::variant::{VariantDescriptor, VariantRegistry};
use crate::zobrist;

use super::threads::{SearchJob, ThreadPool, WorkerMessage};
use super::time::TimeConfig;
use super::{BoardState, Engine, EngineError, SearchLimits};

/// Workers the pool is allowed to hold.
const SEARCH_WORKERS: usize = 1;

/// Lifecycle stages that have completed.
#[derive(Debug, Default, Clone, Copy)]
struct Stages {
    pieces: bool,
    geometry: bool,
    position_tables: bool,
}

pub struct JanggiEngine {
    stages: Stages,
    variants: VariantRegistry,
    options: OptionRegistry,
    psqt: Arc<Psqt>,
    tt: Arc<TranspositionTable>,
    threads: ThreadPool,
    stop: StopFlag,
    time_config: TimeConfig,
    /// Position key and outcome of the most recent search.
    last: Option<(u64, SearchOutcome)>,
}

impl Default for JanggiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JanggiEngine {
    #[must_use]
    pub fn new() -> Self {
        JanggiEngine {
            stages: Stages::default(),
            variants: VariantRegistry::new(),
            options: OptionRegistry::new(),
            psqt: Arc::new(Psqt::material_only()),
            tt: Arc::new(TranspositionTable::new(options::DEFAULT_HASH_MB as usize)),
            threads: ThreadPool::new(),
            stop: StopFlag::new(),
            time_config: TimeConfig::default(),
            last: None,
        }
    }

    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.threads.size()
    }

    #[must_use]
    pub fn hash_size_mb(&self) -> usize {
        self.tt.size_mb()
    }

    #[must_use]
    pub fn psqt(&self) -> &Psqt {
        &self.psqt
    }

    #[must_use]
    pub fn time_config(&self) -> TimeConfig {
        self.time_config
    }

    fn apply_change(&mut self, change: OptionChange) -> Result<(), EngineError> {
        match change {
            OptionChange::Threads(count) => self.set_threads(count),
            OptionChange::Hash(size_mb) => self.resize_hash(size_mb),
            OptionChange::ClearHash => {
                self.clear_search();
                Ok(())
            }
            OptionChange::MoveOverhead(ms) => {
                self.time_config.move_overhead_ms = ms;
                Ok(())
            }
            OptionChange::Variant(name) => match self.find_variant(&name) {
                Some(variant) => self.init_psqt(&variant),
                None => {
                    log::debug!("variant {name} selected but not registered");
                    Ok(())
                }
            },
        }
    }
}

impl Engine for JanggiEngine {
    fn init_pieces(&mut self) -> Result<(), EngineError> {
        self.stages.pieces = true;
        Ok(())
    }

    fn init_variants(&mut self) -> Result<(), EngineError> {
        self.variants = VariantRegistry::with_builtins();
        log::debug!("variants registered: {:?}", self.variants.names());
        Ok(())
    }

    fn init_options(&mut self) -> Result<(), EngineError> {
        self.options = OptionRegistry::with_defaults(&self.variants.names());
        self.time_config = TimeConfig {
            move_overhead_ms: self
                .options
                .spin(options::MOVE_OVERHEAD)
                .map_or(self.time_config.move_overhead_ms, |ms| ms as u64),
            ..self.time_config
        };
        Ok(())
    }

    fn init_geometry(&mut self) -> Result<(), EngineError> {
        geometry::init();
        self.stages.geometry = true;
        Ok(())
    }

    fn init_position_tables(&mut self) -> Result<(), EngineError> {
        zobrist::init();
        self.stages.position_tables = true;
        Ok(())
    }

    fn init_psqt(&mut self, variant: &VariantDescriptor) -> Result<(), EngineError> {
        self.psqt = Arc::new(Psqt::new(variant));
        Ok(())
    }

    fn options(&self) -> &OptionRegistry {
        &self.options
    }

    fn options_mut(&mut self) -> &mut OptionRegistry {
        &mut self.options
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let previous = self.options.value(name);
        let Some(change) = self.options.set(name, value)? else {
            return Ok(());
        };
        let applied = self.apply_change(change);
        if applied.is_err() {
            if let Some(previous) = previous {
                self.options.force(name, &previous)?;
            }
        }
        applied
    }

    fn find_variant(&self, name: &str) -> Option<Arc<VariantDescriptor>> {
        self.variants.find(name)
    }

    /// The search runs on one worker; a larger `Threads` value is kept in
    /// the registry but does not grow the pool.
    fn set_threads(&mut self, count: usize) -> Result<(), EngineError> {
        self.threads.set(count.min(SEARCH_WORKERS))
    }

    fn resize_hash(&mut self, size_mb: usize) -> Result<(), EngineError> {
        if size_mb != self.tt.size_mb() {
            self.tt = Arc::new(TranspositionTable::try_new(size_mb)?);
            log::debug!("hash resized to {} MB", self.tt.size_mb());
        }
        Ok(())
    }

    fn clear_search(&mut self) {
        self.tt.clear();
        self.last = None;
    }

    fn set_position(
        &self,
        variant: &Arc<VariantDescriptor>,
        fen: &str,
        chess960: bool,
        sfen: bool,
    ) -> Result<BoardState, EngineError> {
        let board = Board::try_from_fen_with(fen, variant.rules, sfen)?;
        Ok(BoardState::new(Arc::clone(variant), board, chess960))
    }

    fn parse_move(&self, state: &mut BoardState, token: &str) -> Option<Move> {
        state.board_mut().parse_move(token).ok()
    }

    fn format_move(&self, mv: Move) -> String {
        mv.to_string()
    }

    fn start_search(
        &mut self,
        state: &BoardState,
        limits: &SearchLimits,
        diagnostics: &mut dyn Write,
    ) -> Result<(), EngineError> {
        if !(self.stages.pieces && self.stages.geometry && self.stages.position_tables) {
            return Err(EngineError::NotReady("static tables"));
        }

        self.last = None;
        self.stop.reset();
        let board = state.board().clone();
        let key = board.hash();
        let config = limits.to_search_config(board.side_to_move(), &self.time_config);

        let messages = self.threads.start(SearchJob {
            board,
            config,
            tt: Arc::clone(&self.tt),
            psqt: Arc::clone(&self.psqt),
            stop: self.stop.clone(),
        })?;

        // Info lines are advisory: a broken stream must not orphan the worker
        let mut reporting = true;
        for message in messages.iter() {
            match message {
                WorkerMessage::Info(line) => {
                    if reporting {
                        if let Err(e) = writeln!(diagnostics, "{line}") {
                            log::debug!("diagnostic stream failed, dropping info lines: {e}");
                            reporting = false;
                        }
                    }
                }
                WorkerMessage::Finished(outcome) => {
                    log::debug!(
                        "search finished: depth {} nodes {} line {:?}",
                        outcome.depth,
                        outcome.nodes,
                        outcome.best_line
                    );
                    self.last = Some((key, outcome));
                    if reporting {
                        if let Err(e) = diagnostics.flush() {
                            log::debug!("diagnostic flush failed: {e}");
                        }
                    }
                    return Ok(());
                }
                WorkerMessage::Failed(reason) => return Err(EngineError::SearchFailed(reason)),
            }
        }
        Err(EngineError::WorkerLost)
    }

    fn best_line(&self, state: &BoardState) -> Option<SearchOutcome> {
        match &self.last {
            Some((key, outcome)) if *key == state.board().hash() && !outcome.best_line.is_empty() => {
                Some(outcome.clone())
            }
            _ => None,
        }
    }

    fn stop(&self) {
        self.stop.stop();
    }
}
