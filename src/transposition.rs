use std::collections::HashMap;

use tracing::trace;

/// A cached static evaluation. The evaluation depth is part of the key since
/// mate scores scale with it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub hash: u64,  // Zobrist hash of position
    pub check: u64, // Second fingerprint from independent keys
    pub depth: u32, // Depth the evaluation was made at
    pub value: i32, // Score of position
}

#[derive(Clone, Debug, Default)]
pub struct TranspositionTable {
    table: HashMap<(u64, u32), TranspositionEntry>,
    hits: u64,
    collisions: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable::default()
    }

    pub fn with_capacity(entries: usize) -> Self {
        TranspositionTable {
            table: HashMap::with_capacity(entries),
            ..TranspositionTable::default()
        }
    }

    /// Stores `value`, replacing any previous score for the same key.
    pub fn store(&mut self, hash: u64, check: u64, depth: u32, value: i32) {
        let entry = TranspositionEntry { hash, check, depth, value };
        self.table.insert((hash, depth), entry);
    }

    /// Looks up the score for a position. An entry under the same hash but
    /// with another check fingerprint belongs to a different position: it
    /// counts as a collision and the lookup misses.
    pub fn probe(&mut self, hash: u64, check: u64, depth: u32) -> Option<TranspositionEntry> {
        let entry = self.table.get(&(hash, depth)).copied()?;
        if entry.check != check {
            self.collisions += 1;
            trace!(hash, depth, stored = entry.check, probed = check, "fingerprint collision");
            return None;
        }
        self.hits += 1;
        Some(entry)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Zeroes the hit and collision counters, keeping the entries.
    pub fn new_search(&mut self) {
        self.hits = 0;
        self.collisions = 0;
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.new_search();
    }
}
