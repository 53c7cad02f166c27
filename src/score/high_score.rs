use tracing::{debug, info, warn};

use super::store::ScoreStore;

/// Best score seen so far, backed by a [`ScoreStore`]
pub struct HighScore {
    value: u32,
    store: Box<dyn ScoreStore>,
}

impl HighScore {
    /// Read the stored value, treating absence or corruption as zero
    pub fn load(store: impl ScoreStore + 'static) -> Self {
        let value = match store.load() {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("No stored high score, starting from 0");
                0
            }
            Err(e) => {
                warn!("Ignoring unreadable high score: {:#}", e);
                0
            }
        };

        Self {
            value,
            store: Box::new(store),
        }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    /// Raise the high score to `score` if it beats it, writing through to storage
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        info!("New high score: {}", score);
        self.persist();
        true
    }

    /// End-of-run check: record `final_score` and make sure storage holds the current value
    pub fn settle(&mut self, final_score: u32) {
        if !self.record(final_score) {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(self.value) {
            warn!("Failed to save high score {}: {:#}", self.value, e);
        }
    }
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("value", &self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{FileScoreStore, MemoryScoreStore};
    use tempfile::TempDir;

    #[test]
    fn test_load_existing_value() {
        let high = HighScore::load(MemoryScoreStore::with_value(12));
        assert_eq!(high.get(), 12);
    }

    #[test]
    fn test_load_missing_is_zero() {
        let high = HighScore::load(MemoryScoreStore::new());
        assert_eq!(high.get(), 0);
    }

    #[test]
    fn test_load_corrupt_file_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("highscore.txt");
        std::fs::write(&path, "not a number").unwrap();

        let high = HighScore::load(FileScoreStore::new(&path));
        assert_eq!(high.get(), 0);
    }

    #[test]
    fn test_record_is_monotonic_and_writes_through() {
        let store = MemoryScoreStore::with_value(3);
        let mut high = HighScore::load(store.clone());

        assert!(!high.record(2));
        assert!(!high.record(3));
        assert_eq!(store.saves(), 0);

        assert!(high.record(4));
        assert_eq!(high.get(), 4);
        assert_eq!(store.value(), Some(4));
        assert_eq!(store.saves(), 1);

        assert!(!high.record(1));
        assert_eq!(high.get(), 4);
    }

    #[test]
    fn test_write_failure_keeps_memory_value() {
        let store = MemoryScoreStore::new().failing_writes();
        let mut high = HighScore::load(store.clone());

        assert!(high.record(8));
        assert_eq!(high.get(), 8);
        assert_eq!(store.value(), None);
    }

    #[test]
    fn test_settle_flushes_once() {
        let store = MemoryScoreStore::with_value(10);
        let mut high = HighScore::load(store.clone());

        high.settle(4);
        assert_eq!(store.saves(), 1);
        assert_eq!(store.value(), Some(10));

        high.settle(11);
        assert_eq!(store.saves(), 2);
        assert_eq!(store.value(), Some(11));
    }

    #[test]
    fn test_file_round_trip_across_loads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("highscore.txt");

        let mut high = HighScore::load(FileScoreStore::new(&path));
        high.record(6);

        let reloaded = HighScore::load(FileScoreStore::new(&path));
        assert_eq!(reloaded.get(), 6);
    }
}
