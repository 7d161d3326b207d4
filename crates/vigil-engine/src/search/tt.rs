//! Fixed-size transposition table.
//!
//! One entry per slot, addressed by `key % capacity`. Colliding positions
//! overwrite each other subject to a depth-preferred replacement policy that
//! always yields to entries left over from an older search.

use tracing::trace;
use vigil_board::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// Bound type stored in a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Empty slot.
    None,
    /// The stored score is exact.
    Exact,
    /// The search failed high: the true score is at least the stored one.
    LowerBound,
    /// The search failed low: the true score is at most the stored one.
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
struct TtEntry {
    key: u64,
    best_move: Option<Move>,
    score: i32,
    depth: i32,
    bound: Bound,
    generation: u8,
}

impl TtEntry {
    const EMPTY: Self = Self {
        key: 0,
        best_move: None,
        score: 0,
        depth: 0,
        bound: Bound::None,
        generation: 0,
    };
}

/// Outcome of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TtProbe {
    /// Best move recorded for this position, used as an ordering hint.
    pub best_move: Option<Move>,
    /// Score the caller may return without searching, when the entry was
    /// deep enough and its bound fits the window.
    pub score: Option<i32>,
}

/// Counters reported after each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Probes that found the position.
    pub hits: u64,
    /// Probes whose score was returned without searching.
    pub cuts: u64,
    /// Stores into empty slots.
    pub new_writes: u64,
    /// Stores that replaced an existing entry.
    pub overwrites: u64,
}

/// Convert a search score to its stored form.
///
/// Mate scores are relative to the root; storing them relative to the node
/// keeps them valid when the position is reached at another ply.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Reverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Position-keyed cache of search results.
pub struct TranspositionTable {
    entries: Box<[TtEntry]>,
    generation: u8,
    stats: TableStats,
}

impl TranspositionTable {
    /// Create a table of roughly `mb` megabytes.
    pub fn new(mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TtEntry>();
        Self::with_capacity(mb * 1024 * 1024 / entry_size)
    }

    /// Create a table with exactly `capacity` slots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: vec![TtEntry::EMPTY; capacity.max(1)].into_boxed_slice(),
            generation: 0,
            stats: TableStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Empty every slot and reset the counters.
    pub fn clear(&mut self) {
        self.entries.fill(TtEntry::EMPTY);
        self.generation = 0;
        self.stats = TableStats::default();
        trace!(capacity = self.capacity(), "transposition table cleared");
    }

    /// Start a new search generation. Entries from older generations are
    /// replaced unconditionally.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear_stats(&mut self) {
        self.stats = TableStats::default();
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }

    /// Count a probe whose score the caller returned.
    pub fn record_cut(&mut self) {
        self.stats.cuts += 1;
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Look up `key` for a node searching `depth` with window `(alpha, beta)`.
    ///
    /// The score is only offered when the entry was searched at least as
    /// deep and its bound settles the window: exact scores as stored, lower
    /// bounds as `beta` when they reach it, upper bounds as `alpha` when they
    /// stay below it.
    pub fn probe(&mut self, key: u64, depth: i32, alpha: i32, beta: i32, ply: usize) -> TtProbe {
        let entry = self.entries[self.index(key)];
        if entry.bound == Bound::None || entry.key != key {
            return TtProbe::default();
        }
        self.stats.hits += 1;

        let mut probe = TtProbe {
            best_move: entry.best_move,
            score: None,
        };
        if entry.depth >= depth {
            let score = score_from_tt(entry.score, ply);
            probe.score = match entry.bound {
                Bound::Exact => Some(score),
                Bound::LowerBound if score >= beta => Some(beta),
                Bound::UpperBound if score <= alpha => Some(alpha),
                _ => None,
            };
        }
        probe
    }

    /// Best move stored for `key`, if the slot holds that position.
    pub fn best_move(&self, key: u64) -> Option<Move> {
        let entry = &self.entries[self.index(key)];
        if entry.bound != Bound::None && entry.key == key {
            entry.best_move
        } else {
            None
        }
    }

    /// Record a search result.
    ///
    /// Replaces the slot when it is empty, belongs to an older generation, or
    /// holds a result searched no deeper than `depth`.
    pub fn store(
        &mut self,
        key: u64,
        best_move: Option<Move>,
        score: i32,
        bound: Bound,
        depth: i32,
        ply: usize,
    ) {
        let generation = self.generation;
        let index = self.index(key);
        let slot = &mut self.entries[index];

        let empty = slot.bound == Bound::None;
        if !empty && slot.generation == generation && depth < slot.depth {
            return;
        }

        if empty {
            self.stats.new_writes += 1;
        } else {
            self.stats.overwrites += 1;
        }
        *slot = TtEntry {
            key,
            best_move,
            score: score_to_tt(score, ply),
            depth,
            bound,
            generation,
        };
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.len())
            .field("generation", &self.generation)
            .field("stats", &self.stats)
            .finish()
    }
}
