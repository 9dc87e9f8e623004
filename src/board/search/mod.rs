//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with a triangular principal variation
//! - Principal variation search with transposition table cutoffs
//! - Check extension at the horizon
//! - Quiescence search over captures
//! - Move ordering (TT move, MVV-LVA, killers, history)
//! - Repetition and bikjang draws, mate distance pruning

mod alphabeta;
mod constants;

use std::sync::Arc;
use std::time::Duration;

use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

use super::eval::Psqt;
use super::types::{Move, EMPTY_MOVE, MAX_PLY, NUM_SQUARES};
use super::Board;

pub use constants::{DRAW, INFINITY, MATE, MATE_IN_MAX_PLY};

const HISTORY_MAX: i32 = 1 << 18;

pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[EMPTY_MOVE; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(EMPTY_MOVE, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(EMPTY_MOVE, |row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[EMPTY_MOVE; 2]; MAX_PLY];
    }
}

/// Quiet-move history indexed by from/to point.
pub struct HistoryTable {
    entries: Vec<i32>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: vec![0; NUM_SQUARES * NUM_SQUARES],
        }
    }

    fn index(mv: Move) -> usize {
        mv.from().index() * NUM_SQUARES + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, mv: Move) -> i32 {
        self.entries[Self::index(mv)]
    }

    /// Reward a quiet move that caused a beta cutoff.
    pub fn update(&mut self, mv: Move, depth: u32) {
        let bonus = (depth * depth) as i32;
        let entry = &mut self.entries[Self::index(mv)];
        *entry = (*entry + bonus).min(HISTORY_MAX);
        if *entry == HISTORY_MAX {
            self.decay();
        }
    }

    pub fn decay(&mut self) {
        for entry in &mut self.entries {
            *entry >>= 1;
        }
    }

    pub fn reset(&mut self) {
        self.entries.fill(0);
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub score: i32,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchIterationInfo {
    /// Render as a UCI `info` line.
    #[must_use]
    pub fn to_uci_line(&self) -> String {
        let pv: Vec<String> = self.pv.iter().map(ToString::to_string).collect();
        format!(
            "info depth {} seldepth {} score {} nodes {} nps {} hashfull {} time {} pv {}",
            self.depth,
            self.seldepth,
            format_score(self.score),
            self.nodes,
            self.nps,
            self.hashfull,
            self.time_ms,
            pv.join(" ")
        )
    }
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Configuration for a search operation.
#[derive(Clone, Default)]
pub struct SearchConfig {
    /// Maximum nominal depth (clamped to `1..MAX_PLY`)
    pub max_depth: u32,
    /// Node limit (0 = unlimited)
    pub node_limit: u64,
    /// Stop starting new iterations after this long
    pub soft_time: Option<Duration>,
    /// Abort the running iteration after this long
    pub hard_time: Option<Duration>,
    /// Restrict the root to these moves when non-empty
    pub searchmoves: Vec<Move>,
    /// Optional callback for iteration info
    pub info_callback: Option<SearchInfoCallback>,
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    #[must_use]
    pub fn with_time(mut self, soft: Duration, hard: Duration) -> Self {
        self.soft_time = Some(soft);
        self.hard_time = Some(hard.max(soft));
        self
    }

    #[must_use]
    pub fn with_searchmoves(mut self, moves: Vec<Move>) -> Self {
        self.searchmoves = moves;
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

/// Result of a finished search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Principal variation; empty when the root has no move to search.
    pub best_line: Vec<Move>,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
}

impl SearchOutcome {
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.best_line.first().copied()
    }

    #[must_use]
    pub fn ponder_move(&self) -> Option<Move> {
        self.best_line.get(1).copied()
    }
}

/// Format a score the way UCI reports it: `cp <n>` or `mate <moves>`.
///
/// Mate distances count full moves; negative values mean the side to move
/// is being mated.
#[must_use]
pub fn format_score(score: i32) -> String {
    if score >= MATE_IN_MAX_PLY {
        format!("mate {}", (MATE - score + 1) / 2)
    } else if score <= -MATE_IN_MAX_PLY {
        format!("mate {}", (-MATE - score) / 2)
    } else {
        format!("cp {score}")
    }
}

/// Run an iterative-deepening search from `board`.
///
/// The board is restored before returning. Killer and history tables live
/// for one call; the transposition table persists across calls.
pub fn search(
    board: &mut Board,
    tt: &TranspositionTable,
    psqt: &Psqt,
    config: &SearchConfig,
    stop: &StopFlag,
) -> SearchOutcome {
    tt.new_search();
    let mut ctx = alphabeta::SearchContext::new(board, tt, psqt, config, stop);
    ctx.iterative_deepening()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_score_reports_mates_in_moves() {
        assert_eq!(format_score(MATE - 1), "mate 1");
        assert_eq!(format_score(MATE - 3), "mate 2");
        assert_eq!(format_score(-MATE + 2), "mate -1");
        assert_eq!(format_score(-MATE + 4), "mate -2");
        assert_eq!(format_score(35), "cp 35");
        assert_eq!(format_score(-MATE_IN_MAX_PLY + 1), "cp -31871");
    }

    #[test]
    fn killer_update_shifts_previous() {
        let mut killers = KillerTable::new();
        let a = Move::from_u16(0x0081);
        let b = Move::from_u16(0x0102);
        killers.update(3, a);
        killers.update(3, b);
        assert_eq!(killers.primary(3), b);
        assert_eq!(killers.secondary(3), a);
        killers.update(3, b);
        assert_eq!(killers.secondary(3), a);
        assert_eq!(killers.primary(MAX_PLY + 5), EMPTY_MOVE);
    }

    #[test]
    fn history_saturates_by_halving() {
        let mut history = HistoryTable::new();
        let mv = Move::from_u16(0x0081);
        for _ in 0..10_000 {
            history.update(mv, 20);
        }
        assert!(history.score(mv) <= HISTORY_MAX);
        history.reset();
        assert_eq!(history.score(mv), 0);
    }
}
