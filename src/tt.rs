//! Transposition table shared between the session and its search worker.
//!
//! Entries are stored as atomic u64 pairs using XOR verification, so the
//! worker thread can write while the owner keeps a handle for clearing
//! and resizing between searches.

use std::mem;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use thiserror::Error;

use crate::board::search::MATE_IN_MAX_PLY;
use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,
    LowerBound,
    UpperBound,
}

impl BoundType {
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 1,
            BoundType::LowerBound => 2,
            BoundType::UpperBound => 3,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0x3 {
            2 => BoundType::LowerBound,
            3 => BoundType::UpperBound,
            _ => BoundType::Exact,
        }
    }
}

/// Unpacked entry as returned by `probe`.
#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub depth: u32,
    /// Score with mate distances relative to the stored node.
    pub score: i32,
    pub bound: BoundType,
    pub best_move: Option<Move>,
}

/// Packed layout:
/// - bits 0-15:  move (0 = none)
/// - bits 16-31: score (i16)
/// - bits 32-39: depth
/// - bits 40-41: bound (never 0, so a used slot is never all zero)
/// - bits 42-47: generation
fn pack(depth: u32, score: i32, bound: BoundType, best_move: Option<Move>, generation: u8) -> u64 {
    let mv = u64::from(best_move.map_or(0, Move::as_u16));
    let score = u64::from(score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16 as u16);
    let depth = u64::from(depth.min(255));
    mv | (score << 16) | (depth << 32) | (bound.to_bits() << 40) | (u64::from(generation & 0x3F) << 42)
}

fn unpack(data: u64) -> TTEntry {
    let mv = (data & 0xFFFF) as u16;
    TTEntry {
        depth: ((data >> 32) & 0xFF) as u32,
        score: i32::from(((data >> 16) & 0xFFFF) as u16 as i16),
        bound: BoundType::from_bits(data >> 40),
        best_move: (mv != 0).then(|| Move::from_u16(mv)),
    }
}

fn generation_of(data: u64) -> u8 {
    ((data >> 42) & 0x3F) as u8
}

fn depth_of(data: u64) -> u8 {
    ((data >> 32) & 0xFF) as u8
}

/// Convert a search score to table form: mate scores become distances from
/// the stored node instead of from the root.
#[must_use]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_IN_MAX_PLY {
        score + ply as i32
    } else if score <= -MATE_IN_MAX_PLY {
        score - ply as i32
    } else {
        score
    }
}

#[must_use]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_IN_MAX_PLY {
        score - ply as i32
    } else if score <= -MATE_IN_MAX_PLY {
        score + ply as i32
    } else {
        score
    }
}

#[derive(Default)]
struct Slot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn load(&self, hash: u64) -> Option<u64> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (data != 0 && key_xor ^ data == hash).then_some(data)
    }

    fn store(&self, hash: u64, data: u64) {
        self.data.store(data, Ordering::Relaxed);
        self.key_xor.store(hash ^ data, Ordering::Relaxed);
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

const BUCKET_SIZE: usize = 2;

#[derive(Default)]
struct Bucket {
    slots: [Slot; BUCKET_SIZE],
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot allocate a {size_mb} MB hash table")]
pub struct HashAllocError {
    pub size_mb: usize,
}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes (at least one bucket).
    /// Falls back to a single bucket if the memory is not available.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        Self::try_new(size_mb).unwrap_or_else(|e| {
            log::error!("{e}, using a minimal table");
            Self::with_buckets(vec![Bucket::default()])
        })
    }

    /// Like [`TranspositionTable::new`], but reports allocation failure
    /// instead of aborting the process.
    pub fn try_new(size_mb: usize) -> Result<Self, HashAllocError> {
        let failed = HashAllocError { size_mb };
        let bytes = size_mb.max(1).checked_mul(1024 * 1024).ok_or(failed)?;
        let wanted = (bytes / mem::size_of::<Bucket>()).max(1);
        // Largest power of two not above the request
        let count = if wanted.is_power_of_two() {
            wanted
        } else {
            wanted.next_power_of_two() / 2
        };
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(count).map_err(|_| failed)?;
        buckets.resize_with(count, Bucket::default);
        Ok(Self::with_buckets(buckets))
    }

    fn with_buckets(buckets: Vec<Bucket>) -> Self {
        TranspositionTable {
            mask: buckets.len() - 1,
            buckets,
            generation: AtomicU8::new(0),
        }
    }

    #[must_use]
    pub fn size_mb(&self) -> usize {
        self.buckets.len() * mem::size_of::<Bucket>() / (1024 * 1024)
    }

    fn bucket(&self, hash: u64) -> &Bucket {
        &self.buckets[(hash as usize) & self.mask]
    }

    /// Advance the age used by the replacement policy.
    pub fn new_search(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.bucket(hash)
            .slots
            .iter()
            .find_map(|slot| slot.load(hash))
            .map(unpack)
    }

    /// Store an entry, replacing the same position, an empty slot, or the
    /// shallowest stale one.
    pub fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound: BoundType,
        best_move: Option<Move>,
    ) {
        let generation = self.generation.load(Ordering::Relaxed) & 0x3F;
        let bucket = self.bucket(hash);

        let existing = bucket.slots.iter().find_map(|slot| {
            slot.load(hash).map(|data| (slot, data))
        });
        // Keep a known move when the new result has none
        let best_move = best_move.or_else(|| existing.and_then(|(_, data)| unpack(data).best_move));
        let packed = pack(depth, score, bound, best_move, generation);

        if let Some((slot, _)) = existing {
            slot.store(hash, packed);
            return;
        }
        if let Some(slot) = bucket
            .slots
            .iter()
            .find(|slot| slot.data.load(Ordering::Relaxed) == 0)
        {
            slot.store(hash, packed);
            return;
        }

        let victim = bucket
            .slots
            .iter()
            .min_by_key(|slot| {
                let data = slot.data.load(Ordering::Relaxed);
                let age = generation.wrapping_sub(generation_of(data)) & 0x3F;
                i32::from(depth_of(data)) - 2 * i32::from(age)
            })
            .unwrap_or(&bucket.slots[0]);
        victim.store(hash, packed);
    }

    /// Occupancy in per mille, sampled over the first thousand buckets.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let sample = self.buckets.len().min(1000);
        let used = self
            .buckets
            .iter()
            .take(sample)
            .flat_map(|b| b.slots.iter())
            .filter(|slot| slot.data.load(Ordering::Relaxed) != 0)
            .count();
        (used * 1000 / (sample * BUCKET_SIZE)) as u32
    }

    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.clear();
            }
        }
        self.generation.store(0, Ordering::Relaxed);
    }
}
