//! Search constants.

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Score of giving mate at the root; a mate found at ply `n` scores `MATE - n`.
pub const MATE: i32 = 32000;

/// Bound wider than any reachable score.
pub const INFINITY: i32 = MATE + 1;

/// Scores at or above this are forced mates for the side to move.
pub const MATE_IN_MAX_PLY: i32 = MATE - MAX_PLY as i32;

/// Repetition and bikjang outcomes.
pub const DRAW: i32 = 0;

// ============================================================================
// LIMITS
// ============================================================================

/// Captures searched beyond the horizon before standing pat.
pub const MAX_QSEARCH_DEPTH: u32 = 8;

/// Nodes between clock reads.
pub const TIME_CHECK_INTERVAL: u64 = 1024;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================

pub const TT_MOVE_SCORE: i32 = 1 << 24;

/// Base for captures, ordered inside by MVV-LVA.
pub const CAPTURE_SCORE: i32 = 1 << 20;

pub const KILLER1_SCORE: i32 = 1 << 19;
pub const KILLER2_SCORE: i32 = KILLER1_SCORE - 1;

/// Passing is tried after every other move.
pub const PASS_SCORE: i32 = -(1 << 24);
