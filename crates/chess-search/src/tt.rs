//! Transposition cache keyed by Zobrist hash.
//!
//! Entries record the depth they were searched to and whether the score is
//! exact or only a bound produced by a cutoff. A stored entry is replaced
//! only by a strictly deeper result.

use std::collections::HashMap;

/// What a cached score says about the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is the value of the node.
    Exact,
    /// The search failed high: the value is at least the score.
    Lower,
    /// The search failed low: the value is at most the score.
    Upper,
}

impl Bound {
    /// Classifies a fail-soft result against the window it was searched with.
    pub fn from_window(score: i32, original_alpha: i32, beta: i32) -> Self {
        if score <= original_alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
}

impl TtEntry {
    /// Returns the score if this entry answers a search of `depth` plies
    /// within `(alpha, beta)`.
    pub fn usable(&self, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        let answers = match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        };
        answers.then_some(self.score)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
    stats: TtStats,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = TtStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TtStats {
        self.stats
    }

    pub fn probe(&mut self, key: u64) -> Option<TtEntry> {
        self.stats.probes += 1;
        let hit = self.entries.get(&key).copied();
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Stores `entry` unless an entry at least as deep is already cached.
    pub fn store(&mut self, key: u64, entry: TtEntry) {
        match self.entries.get(&key) {
            Some(existing) if existing.depth >= entry.depth => {}
            _ => {
                self.stats.stores += 1;
                self.entries.insert(key, entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: u32, score: i32, bound: Bound) -> TtEntry {
        TtEntry {
            depth,
            score,
            bound,
        }
    }

    #[test]
    fn store_and_probe() {
        let mut tt = TranspositionTable::new();
        assert!(tt.is_empty());
        assert_eq!(tt.probe(123), None);
        tt.store(123, entry(5, 42, Bound::Exact));
        assert_eq!(tt.probe(123), Some(entry(5, 42, Bound::Exact)));
        assert_eq!(tt.len(), 1);
        assert_eq!(
            tt.stats(),
            TtStats {
                probes: 2,
                hits: 1,
                stores: 1
            }
        );
    }

    #[test]
    fn only_deeper_results_replace() {
        let mut tt = TranspositionTable::new();
        tt.store(7, entry(3, 10, Bound::Exact));
        tt.store(7, entry(3, 99, Bound::Exact));
        tt.store(7, entry(2, 99, Bound::Exact));
        assert_eq!(tt.probe(7).map(|e| e.score), Some(10));
        tt.store(7, entry(4, -5, Bound::Upper));
        assert_eq!(tt.probe(7), Some(entry(4, -5, Bound::Upper)));
    }

    #[test]
    fn clear_empties() {
        let mut tt = TranspositionTable::new();
        tt.store(1, entry(1, 0, Bound::Exact));
        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.stats(), TtStats::default());
    }

    #[test]
    fn bounds_from_window() {
        assert_eq!(Bound::from_window(-10, -10, 50), Bound::Upper);
        assert_eq!(Bound::from_window(50, -10, 50), Bound::Lower);
        assert_eq!(Bound::from_window(20, -10, 50), Bound::Exact);
    }

    #[test]
    fn usability_respects_depth_and_bound() {
        let exact = entry(3, 20, Bound::Exact);
        assert_eq!(exact.usable(3, -100, 100), Some(20));
        assert_eq!(exact.usable(2, -100, 100), Some(20));
        assert_eq!(exact.usable(4, -100, 100), None);

        let lower = entry(3, 60, Bound::Lower);
        assert_eq!(lower.usable(3, 0, 50), Some(60));
        assert_eq!(lower.usable(3, 0, 80), None);

        let upper = entry(3, -20, Bound::Upper);
        assert_eq!(upper.usable(3, -10, 50), Some(-20));
        assert_eq!(upper.usable(3, -30, 50), None);
    }
}
