//! Per-request search limits.

use std::time::{Duration, Instant};

use crate::board::{Color, Move, SearchConfig, MAX_PLY};

use super::time::{TimeConfig, TimeControl};

/// Depth used when a request sets no depth, node, or time bound (including
/// `infinite`). Nothing can deliver `stop` while a search holds the session,
/// so an open-ended search is capped here.
pub const UNBOUNDED_DEPTH: u32 = 8;

/// Wall-clock cap for the same open-ended requests, in milliseconds.
pub const UNBOUNDED_TIME_MS: u64 = 2_000;

/// Limits for one `go`/`analyze` request.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Remaining clock per side in milliseconds, indexed by `Color::index`.
    pub time: [Option<u64>; 2],
    pub inc: [u64; 2],
    pub movestogo: Option<u64>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub infinite: bool,
    pub searchmoves: Vec<Move>,
    pub start_time: Instant,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            time: [None; 2],
            inc: [0; 2],
            movestogo: None,
            depth: None,
            nodes: None,
            movetime: None,
            infinite: false,
            searchmoves: Vec::new(),
            start_time: Instant::now(),
        }
    }
}

impl SearchLimits {
    /// Depth-only limits, as used by position analysis.
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..Default::default()
        }
    }

    /// The clock that applies to `side`, if any.
    #[must_use]
    pub fn time_control(&self, side: Color) -> Option<TimeControl> {
        if self.infinite {
            return None;
        }
        if let Some(ms) = self.movetime {
            return Some(TimeControl::MoveTime { time_ms: ms });
        }
        self.time[side.index()].map(|time_left_ms| TimeControl::Incremental {
            time_left_ms,
            inc_ms: self.inc[side.index()],
            movestogo: self.movestogo,
        })
    }

    /// True when nothing would end the search short of the depth cap.
    #[must_use]
    pub fn is_unbounded(&self, side: Color) -> bool {
        self.depth.is_none() && self.nodes.is_none() && self.time_control(side).is_none()
    }

    /// Translate into a board-level search configuration for `side`.
    ///
    /// Time already spent since `start_time` is deducted from the budget.
    #[must_use]
    pub fn to_search_config(&self, side: Color, time_config: &TimeConfig) -> SearchConfig {
        let max_depth = match self.depth {
            Some(depth) => depth,
            None if self.is_unbounded(side) => UNBOUNDED_DEPTH,
            None => MAX_PLY as u32 - 1,
        };

        let mut config = SearchConfig::depth(max_depth)
            .with_nodes(self.nodes.unwrap_or(0))
            .with_searchmoves(self.searchmoves.clone());

        if let Some(tc) = self.time_control(side) {
            let (soft_ms, hard_ms) = tc.compute_limits(time_config);
            let spent = self.start_time.elapsed();
            let soft = Duration::from_millis(soft_ms).saturating_sub(spent);
            let hard = Duration::from_millis(hard_ms).saturating_sub(spent);
            config = config.with_time(soft, hard);
        } else if self.is_unbounded(side) {
            let cap = Duration::from_millis(UNBOUNDED_TIME_MS);
            config = config.with_time(cap, cap);
        }
        config
    }
}
