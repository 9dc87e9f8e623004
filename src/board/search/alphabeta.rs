//! Core search implementation: PVS, quiescence, and iterative deepening.

use std::time::Instant;

use crate::sync::StopFlag;
use crate::tt::{score_from_tt, score_to_tt, BoundType, TranspositionTable};

use super::constants::{
    CAPTURE_SCORE, DRAW, INFINITY, KILLER1_SCORE, KILLER2_SCORE, MATE, MAX_QSEARCH_DEPTH,
    PASS_SCORE, TIME_CHECK_INTERVAL, TT_MOVE_SCORE,
};
use super::{HistoryTable, KillerTable, SearchConfig, SearchIterationInfo, SearchOutcome};
use crate::board::eval::Psqt;
use crate::board::types::{Move, MoveList, EMPTY_MOVE, MAX_PLY};
use crate::board::Board;

/// Triangular principal variation table.
struct PvTable {
    moves: [[Move; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    fn new() -> Box<Self> {
        Box::new(PvTable {
            moves: [[EMPTY_MOVE; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        })
    }

    fn clear_ply(&mut self, ply: usize) {
        self.len[ply] = 0;
    }

    /// Set `mv` as the head of the line at `ply`, followed by the child's line.
    fn update(&mut self, ply: usize, mv: Move) {
        self.moves[ply][0] = mv;
        let child_len = if ply + 1 < MAX_PLY { self.len[ply + 1] } else { 0 };
        for i in 0..child_len.min(MAX_PLY - 1) {
            self.moves[ply][i + 1] = self.moves[ply + 1][i];
        }
        self.len[ply] = child_len.min(MAX_PLY - 1) + 1;
    }

    fn line(&self, ply: usize) -> Vec<Move> {
        self.moves[ply][..self.len[ply]].to_vec()
    }
}

/// Search context for a single search
pub(crate) struct SearchContext<'a> {
    board: &'a mut Board,
    tt: &'a TranspositionTable,
    psqt: &'a Psqt,
    config: &'a SearchConfig,
    stop: &'a StopFlag,
    start_time: Instant,
    nodes: u64,
    seldepth: usize,
    aborted: bool,
    root_moves: Vec<Move>,
    killers: KillerTable,
    history: HistoryTable,
    pv: Box<PvTable>,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(
        board: &'a mut Board,
        tt: &'a TranspositionTable,
        psqt: &'a Psqt,
        config: &'a SearchConfig,
        stop: &'a StopFlag,
    ) -> Self {
        SearchContext {
            board,
            tt,
            psqt,
            config,
            stop,
            start_time: Instant::now(),
            nodes: 0,
            seldepth: 0,
            aborted: false,
            root_moves: Vec::new(),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            pv: PvTable::new(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Poll the stop conditions; sticky once tripped.
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.is_stopped() {
            self.aborted = true;
        } else if self.config.node_limit > 0 && self.nodes >= self.config.node_limit {
            self.aborted = true;
        } else if self.nodes % TIME_CHECK_INTERVAL == 0 {
            if let Some(hard) = self.config.hard_time {
                if self.start_time.elapsed() >= hard {
                    self.aborted = true;
                }
            }
        }
        self.aborted
    }

    /// Iterative deepening driver.
    pub(crate) fn iterative_deepening(&mut self) -> SearchOutcome {
        let legal = self.board.generate_moves();
        if legal.is_empty() {
            return SearchOutcome {
                best_line: Vec::new(),
                score: -MATE,
                depth: 0,
                nodes: 0,
            };
        }

        self.root_moves = legal
            .iter()
            .copied()
            .filter(|mv| self.config.searchmoves.is_empty() || self.config.searchmoves.contains(mv))
            .collect();
        if self.root_moves.is_empty() {
            return SearchOutcome::default();
        }

        let max_depth = self.config.max_depth.clamp(1, MAX_PLY as u32 - 1);
        let mut outcome = SearchOutcome {
            best_line: vec![self.root_moves[0]],
            score: -INFINITY,
            depth: 0,
            nodes: 0,
        };

        for depth in 1..=max_depth {
            self.seldepth = 0;
            let score = self.alphabeta(depth as i32, -INFINITY, INFINITY, 0);

            if self.aborted {
                // Keep a partial first iteration only if it produced a line
                if outcome.depth == 0 && self.pv.len[0] > 0 {
                    outcome.best_line = self.pv.line(0);
                }
                break;
            }

            outcome.best_line = self.pv.line(0);
            outcome.score = score;
            outcome.depth = depth;
            if let Some(&best) = outcome.best_line.first() {
                self.promote_root_move(best);
            }
            self.report(&outcome);

            if let Some(soft) = self.config.soft_time {
                if self.start_time.elapsed() >= soft {
                    break;
                }
            }
        }

        if outcome.score == -INFINITY {
            outcome.score = self.board.evaluate(self.psqt);
        }
        outcome.nodes = self.nodes;
        outcome
    }

    fn promote_root_move(&mut self, best: Move) {
        if let Some(pos) = self.root_moves.iter().position(|&m| m == best) {
            let mv = self.root_moves.remove(pos);
            self.root_moves.insert(0, mv);
        }
    }

    fn report(&self, outcome: &SearchOutcome) {
        let Some(callback) = &self.config.info_callback else {
            return;
        };
        let time_ms = self.elapsed_ms();
        let nps = if time_ms > 0 {
            self.nodes * 1000 / time_ms
        } else {
            0
        };
        callback(&SearchIterationInfo {
            depth: outcome.depth,
            seldepth: self.seldepth as u32,
            nodes: self.nodes,
            nps,
            time_ms,
            score: outcome.score,
            hashfull: self.tt.hashfull(),
            pv: outcome.best_line.clone(),
        });
    }

    fn order_score(&self, mv: Move, tt_move: Move, ply: usize) -> i32 {
        if mv == tt_move {
            return TT_MOVE_SCORE;
        }
        if mv.is_pass() {
            return PASS_SCORE;
        }
        if mv.is_capture() {
            let victim = self.board.piece_at(mv.to()).map_or(0, |(_, p)| p.value());
            let attacker = self.board.piece_at(mv.from()).map_or(0, |(_, p)| p.value());
            return CAPTURE_SCORE + victim * 16 - attacker / 16;
        }
        if mv == self.killers.primary(ply) {
            return KILLER1_SCORE;
        }
        if mv == self.killers.secondary(ply) {
            return KILLER2_SCORE;
        }
        self.history.score(mv)
    }

    fn ordered(&self, moves: &[Move], tt_move: Move, ply: usize) -> Vec<Move> {
        let mut scored: Vec<(i32, Move)> = moves
            .iter()
            .map(|&mv| (self.order_score(mv, tt_move, ply), mv))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, mv)| mv).collect()
    }

    /// Principal variation search.
    fn alphabeta(&mut self, mut depth: i32, mut alpha: i32, mut beta: i32, ply: usize) -> i32 {
        self.pv.clear_ply(ply);
        let is_root = ply == 0;
        let is_pv = beta - alpha > 1;

        if !is_root {
            if self.should_stop() {
                return 0;
            }
            if self.board.rules.bikjang && self.board.generals_facing() {
                return DRAW;
            }
            if self.board.is_repetition() {
                return DRAW;
            }
            if ply >= MAX_PLY - 1 {
                return self.board.evaluate(self.psqt);
            }

            // Mate distance pruning
            alpha = alpha.max(-MATE + ply as i32);
            beta = beta.min(MATE - ply as i32 - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        let us = self.board.side_to_move();
        let in_check = self.board.is_in_check(us);
        if in_check && depth <= 0 {
            depth = 1;
        }
        if depth <= 0 {
            return self.quiesce(alpha, beta, ply, 0);
        }

        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);

        let mut tt_move = EMPTY_MOVE;
        if let Some(entry) = self.tt.probe(self.board.hash()) {
            tt_move = entry.best_move.unwrap_or(EMPTY_MOVE);
            if !is_pv && !is_root && entry.depth >= depth as u32 {
                let score = score_from_tt(entry.score, ply);
                let cutoff = match entry.bound {
                    BoundType::Exact => true,
                    BoundType::LowerBound => score >= beta,
                    BoundType::UpperBound => score <= alpha,
                };
                if cutoff {
                    return score;
                }
            }
        }

        let moves = if is_root {
            // Root moves already carry the previous best first
            let mut list = self.root_moves.clone();
            if let Some(pos) = list.iter().position(|&m| m == tt_move) {
                let mv = list.remove(pos);
                list.insert(0, mv);
            }
            list
        } else {
            let generated: MoveList = self.board.generate_moves();
            if generated.is_empty() {
                return -MATE + ply as i32;
            }
            self.ordered(generated.as_slice(), tt_move, ply)
        };

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = EMPTY_MOVE;

        for (idx, &mv) in moves.iter().enumerate() {
            let info = self.board.make_move(mv);
            let mut score;
            if idx == 0 {
                score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1);
            } else {
                score = -self.alphabeta(depth - 1, -alpha - 1, -alpha, ply + 1);
                if score > alpha && score < beta && !self.aborted {
                    score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1);
                }
            }
            self.board.unmake_move(mv, info);

            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = mv;
                    alpha = score;
                    self.pv.update(ply, mv);
                }
                if score >= beta {
                    if mv.is_quiet() && !mv.is_pass() {
                        self.killers.update(ply, mv);
                        self.history.update(mv, depth as u32);
                    }
                    break;
                }
            }
        }

        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if alpha > original_alpha {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        let stored_move = (!best_move.is_null()).then_some(best_move);
        self.tt.store(
            self.board.hash(),
            depth as u32,
            score_to_tt(best_score, ply),
            bound,
            stored_move,
        );

        best_score
    }

    /// Quiescence search over captures; full evasions when in check.
    fn quiesce(&mut self, mut alpha: i32, beta: i32, ply: usize, qdepth: u32) -> i32 {
        self.pv.clear_ply(ply);
        if self.should_stop() {
            return 0;
        }
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);

        if ply > 0 && self.board.rules.bikjang && self.board.generals_facing() {
            return DRAW;
        }
        if ply >= MAX_PLY - 1 {
            return self.board.evaluate(self.psqt);
        }

        let us = self.board.side_to_move();
        let in_check = self.board.is_in_check(us);

        let (moves, mut best_score) = if in_check {
            let moves = self.board.generate_moves();
            if moves.is_empty() {
                return -MATE + ply as i32;
            }
            if qdepth >= MAX_QSEARCH_DEPTH {
                return self.board.evaluate(self.psqt);
            }
            (moves, -INFINITY)
        } else {
            let stand_pat = self.board.evaluate(self.psqt);
            if stand_pat >= beta || qdepth >= MAX_QSEARCH_DEPTH {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            (self.board.generate_captures(), stand_pat)
        };

        for mv in self.ordered(moves.as_slice(), EMPTY_MOVE, ply) {
            let info = self.board.make_move(mv);
            let score = -self.quiesce(-beta, -alpha, ply + 1, qdepth + 1);
            self.board.unmake_move(mv, info);

            if self.aborted {
                return 0;
            }
            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                }
                if score >= beta {
                    break;
                }
            }
        }

        best_score
    }
}
