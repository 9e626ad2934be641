//! Score ledger
//!
//! Tracks the running score for the current round and the all-time high
//! score. The high score is read once at startup and only ever goes up.

use crate::persistence::HighScoreStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    current: u64,
    high: u64,
}

impl ScoreLedger {
    /// Ledger with a known high score
    pub fn new(high: u64) -> Self {
        Self { current: 0, high }
    }

    /// Read the persisted high score (absent or malformed -> 0)
    pub fn load(store: &dyn HighScoreStore) -> Self {
        Self::new(store.load().unwrap_or(0))
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    /// Start a new round; the high score is kept
    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn award(&mut self, points: u64) {
        self.current = self.current.saturating_add(points);
    }

    /// Close out the round. Raises and persists the high score if beaten.
    ///
    /// Returns whether a new high score was set. A failed write is logged and
    /// otherwise ignored; the in-memory high score is raised regardless.
    pub fn finalize_round(&mut self, store: &mut dyn HighScoreStore) -> bool {
        if self.current <= self.high {
            return false;
        }

        self.high = self.current;
        log::info!("New high score: {}", self.high);
        if let Err(e) = store.save(self.high) {
            log::warn!("Failed to persist high score {}: {}", self.high, e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GameError, Result};
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Option<u64> {
            None
        }

        fn save(&mut self, _score: u64) -> Result<()> {
            Err(GameError::Storage(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_load_defaults_to_zero() {
        assert_eq!(ScoreLedger::load(&MemoryStore::new()).high(), 0);
        assert_eq!(ScoreLedger::load(&MemoryStore::with_raw("garbage")).high(), 0);
        assert_eq!(ScoreLedger::load(&MemoryStore::with_raw("250")).high(), 250);
    }

    #[test]
    fn test_reset_keeps_high() {
        let mut ledger = ScoreLedger::new(100);
        ledger.award(40);
        ledger.reset();
        assert_eq!(ledger.current(), 0);
        assert_eq!(ledger.high(), 100);
    }

    #[test]
    fn test_finalize_below_high() {
        let mut store = MemoryStore::with_raw("100");
        let mut ledger = ScoreLedger::load(&store);
        ledger.award(80);

        assert!(!ledger.finalize_round(&mut store));
        assert_eq!(ledger.high(), 100);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_finalize_equal_is_not_new_high() {
        let mut store = MemoryStore::new();
        let mut ledger = ScoreLedger::new(50);
        ledger.award(50);
        assert!(!ledger.finalize_round(&mut store));
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn test_finalize_new_high_persists() {
        let mut store = MemoryStore::with_raw("100");
        let mut ledger = ScoreLedger::load(&store);
        ledger.award(130);

        assert!(ledger.finalize_round(&mut store));
        assert_eq!(ledger.high(), 130);
        assert_eq!(store.raw(), Some("130"));
    }

    #[test]
    fn test_failed_write_still_raises_high() {
        let mut ledger = ScoreLedger::new(10);
        ledger.award(20);
        assert!(ledger.finalize_round(&mut BrokenStore));
        assert_eq!(ledger.high(), 20);
    }

    proptest! {
        #[test]
        fn prop_high_never_decreases(rounds in prop::collection::vec(0u64..500, 1..20)) {
            let mut store = MemoryStore::new();
            let mut ledger = ScoreLedger::load(&store);
            let mut best = 0;
            for score in rounds {
                let before = ledger.high();
                ledger.reset();
                ledger.award(score);
                let new_high = ledger.finalize_round(&mut store);
                prop_assert!(ledger.high() >= before);
                prop_assert_eq!(new_high, score > before);
                best = best.max(score);
            }
            prop_assert_eq!(ledger.high(), best);
        }
    }
}
