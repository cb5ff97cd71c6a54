//! Occurrence counts of positions on the line being searched.
//!
//! The counter only sees the current search path: positions are counted
//! when a node is entered and released when it is left. Game history
//! before the search root is not included.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RepetitionCounter {
    counts: HashMap<u64, u32>,
}

impl RepetitionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Records one more occurrence of `hash` and returns the new count.
    pub fn enter(&mut self, hash: u64) -> u32 {
        let count = self.counts.entry(hash).or_insert(0);
        *count += 1;
        *count
    }

    /// Releases one occurrence of `hash`.
    pub fn leave(&mut self, hash: u64) {
        if let Some(count) = self.counts.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&hash);
            }
        }
    }

    pub fn count(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
