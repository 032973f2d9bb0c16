//! Persisted best score
//!
//! A single decimal number under one fixed key. Anything unreadable counts
//! as "no previous high score".

use crate::persistence::KeyValueStore;

/// Best floored score across sessions, backed by a key-value store
pub struct HighScoreStore<S> {
    store: S,
    best: u64,
}

impl<S: KeyValueStore> HighScoreStore<S> {
    /// Storage key shared with earlier versions of the page
    pub const STORAGE_KEY: &'static str = "megaman-runner-highscore";

    /// Read the stored value once; failures default to 0
    pub fn load(store: S) -> Self {
        let best = match store.get(Self::STORAGE_KEY) {
            Ok(Some(text)) => parse_score(&text).unwrap_or_else(|| {
                log::warn!("Ignoring malformed high score {:?}", text);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                0
            }
        };
        if best > 0 {
            log::info!("Loaded high score {}", best);
        }
        Self { store, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Commit a finished run. Writes only when `score` beats the best;
    /// returns whether it did.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match self.store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score {}", score),
            Err(e) => log::warn!("Failed to save high score {}: {}", score, e),
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Leading-integer parse, so "137.9" and " 42 " still read
fn parse_score(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    let digits: &str = {
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().ok()
}
