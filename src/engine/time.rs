//! Clock handling: turns a time control into soft and hard search budgets.

/// Moves-to-go floor so a short estimate never burns the clock.
const MIN_MOVES_TO_GO: u64 = 10;

/// Below this much usable time (ms) the budget shrinks aggressively.
const PANIC_THRESHOLD_MS: u64 = 5000;
const PANIC_TIME_FRACTION: f64 = 0.05;
const PANIC_MIN_FRACTION: u64 = 5;
const PANIC_HARD_FRACTION: u64 = 3;

/// Added to the overhead when deciding the clock is nearly gone.
const CRITICAL_TIME_MARGIN_MS: u64 = 50;

const LONG_TIME_CONTROL_MS: u64 = 300_000;
const MEDIUM_TIME_CONTROL_MS: u64 = 60_000;
const LONG_MOVES_ESTIMATE: u64 = 40;
const MEDIUM_MOVES_ESTIMATE: u64 = 30;
const SHORT_MOVES_ESTIMATE: u64 = 25;

/// Time management tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConfig {
    /// Reserved per move for host latency; follows the `Move Overhead` option.
    pub move_overhead_ms: u64,
    /// Share of the usable clock the soft limit may take, in percent.
    pub soft_time_percent: u64,
    /// Share of the usable clock the hard limit may take, in percent.
    pub hard_time_percent: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: 10,
            soft_time_percent: 70,
            hard_time_percent: 90,
        }
    }
}

/// A clock the search has to respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeControl {
    /// Fixed time for this move.
    MoveTime { time_ms: u64 },
    /// Remaining clock plus increment, optionally with moves until the next control.
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

impl TimeControl {
    /// Soft and hard budgets in milliseconds, both at least 1.
    #[must_use]
    pub fn compute_limits(&self, config: &TimeConfig) -> (u64, u64) {
        match *self {
            // An explicit movetime is honoured as given
            TimeControl::MoveTime { time_ms } => {
                let capped = time_ms.max(1);
                (capped, capped)
            }
            TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            } => compute_incremental_limits(time_left_ms, inc_ms, movestogo, config),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_incremental_limits(
    time_left_ms: u64,
    inc_ms: u64,
    movestogo: Option<u64>,
    config: &TimeConfig,
) -> (u64, u64) {
    if time_left_ms <= config.move_overhead_ms.saturating_add(CRITICAL_TIME_MARGIN_MS) {
        let fallback = (time_left_ms / 2).max(1);
        return (fallback, fallback);
    }

    let usable_ms = time_left_ms - config.move_overhead_ms;

    if usable_ms < PANIC_THRESHOLD_MS {
        let urgency = usable_ms as f64 / PANIC_THRESHOLD_MS as f64;
        let target = (usable_ms as f64 * PANIC_TIME_FRACTION * urgency) as u64 + inc_ms;
        let target = target.min(usable_ms / PANIC_MIN_FRACTION).max(1);
        let hard = (usable_ms / PANIC_HARD_FRACTION).max(target);
        return (target, hard);
    }

    let moves_to_go = movestogo
        .unwrap_or(if usable_ms > LONG_TIME_CONTROL_MS {
            LONG_MOVES_ESTIMATE
        } else if usable_ms > MEDIUM_TIME_CONTROL_MS {
            MEDIUM_MOVES_ESTIMATE
        } else {
            SHORT_MOVES_ESTIMATE
        })
        .max(MIN_MOVES_TO_GO);

    let base = usable_ms / moves_to_go + inc_ms;
    let soft_cap = usable_ms * config.soft_time_percent / 100;
    let hard_cap = usable_ms * config.hard_time_percent / 100;

    let soft_ms = base.min(soft_cap).max(1);
    let hard_ms = hard_cap.max(soft_ms);
    (soft_ms, hard_ms)
}
