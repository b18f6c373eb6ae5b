//! Best score persistence
//!
//! A single integer stored as a decimal string. Storage failures never reach
//! the game: reads fall back to 0 and writes report `false`, both logged.

use crate::persistence::{KeyValueStore, StorageError};

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "platformer_best_score";

/// Gateway for the persisted best score
#[derive(Debug)]
pub struct BestScoreStore<S> {
    store: S,
}

impl<S: KeyValueStore> BestScoreStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> Result<u64, StorageError> {
        match self.store.get_item(BEST_SCORE_KEY)? {
            Some(raw) => Ok(raw.trim().parse::<u64>()?),
            None => Ok(0),
        }
    }

    /// Stored best score, or 0 when absent or unreadable
    pub fn get_best_score(&self) -> u64 {
        self.read().unwrap_or_else(|e| {
            log::warn!("Failed to read best score: {e}");
            0
        })
    }

    /// Overwrite the stored best score. Returns whether the write succeeded.
    pub fn set_best_score(&self, score: u64) -> bool {
        match self.store.set_item(BEST_SCORE_KEY, &score.to_string()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to save best score: {e}");
                false
            }
        }
    }

    /// Store `candidate` if it beats the stored value. True only when it did
    /// and the write succeeded.
    pub fn update_best_score_if_higher(&self, candidate: u64) -> bool {
        let best = self.get_best_score();
        if candidate <= best {
            return false;
        }
        let stored = self.set_best_score(candidate);
        if stored {
            log::info!("New best score: {candidate} (was {best})");
        }
        stored
    }
}
