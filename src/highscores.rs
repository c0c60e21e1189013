//! High score persistence
//!
//! The session loads the best score once at construction and saves it each time
//! a run beats it. Stores never fail the caller: problems are logged and the
//! game carries on with what it has.

use serde::{Deserialize, Serialize};

/// Narrow persistence interface used by the session
pub trait HighScoreStore {
    /// Best score so far, 0 if nothing was stored
    fn load_high_score(&mut self) -> u64;
    fn save_high_score(&mut self, score: u64);
}

/// In-memory store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryHighScores {
    pub high_score: u64,
    /// Number of saves received
    pub saves: u32,
}

impl MemoryHighScores {
    pub fn new(high_score: u64) -> Self {
        Self {
            high_score,
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load_high_score(&mut self) -> u64 {
        self.high_score
    }

    fn save_high_score(&mut self, score: u64) {
        self.high_score = score;
        self.saves += 1;
    }
}

/// On-disk record for the file store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileHighScores;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{HighScoreRecord, HighScoreStore};
    use crate::error::PersistError;

    /// JSON file store, `{ "high_score": N }`
    #[derive(Debug, Clone)]
    pub struct JsonFileHighScores {
        path: PathBuf,
    }

    impl JsonFileHighScores {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Read the stored record; a missing file is an empty record
        pub fn read(&self) -> Result<HighScoreRecord, PersistError> {
            match fs::read_to_string(&self.path) {
                Ok(json) => Ok(serde_json::from_str(&json)?),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(HighScoreRecord::default()),
                Err(e) => Err(e.into()),
            }
        }

        pub fn write(&self, record: &HighScoreRecord) -> Result<(), PersistError> {
            let json = serde_json::to_string_pretty(record)?;
            fs::write(&self.path, json)?;
            Ok(())
        }
    }

    impl HighScoreStore for JsonFileHighScores {
        fn load_high_score(&mut self) -> u64 {
            match self.read() {
                Ok(record) => {
                    log::info!(
                        "Loaded high score {} from {}",
                        record.high_score,
                        self.path.display()
                    );
                    record.high_score
                }
                Err(e) => {
                    log::warn!("Could not read {}: {}", self.path.display(), e);
                    0
                }
            }
        }

        fn save_high_score(&mut self, score: u64) {
            if let Err(e) = self.write(&HighScoreRecord { high_score: score }) {
                log::warn!("Could not save high score to {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageHighScores;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::HighScoreStore;

    /// Browser LocalStorage store holding a plain integer
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageHighScores;

    impl LocalStorageHighScores {
        const STORAGE_KEY: &'static str = "highScore";

        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl HighScoreStore for LocalStorageHighScores {
        fn load_high_score(&mut self) -> u64 {
            let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
            match stored.map(|v| v.trim().parse::<u64>()) {
                Some(Ok(score)) => {
                    log::info!("Loaded high score {}", score);
                    score
                }
                Some(Err(e)) => {
                    log::warn!("Ignoring unreadable high score: {}", e);
                    0
                }
                None => 0,
            }
        }

        fn save_high_score(&mut self, score: u64) {
            let Some(storage) = Self::storage() else {
                log::warn!("LocalStorage unavailable, high score not saved");
                return;
            };
            if storage
                .set_item(Self::STORAGE_KEY, &score.to_string())
                .is_err()
            {
                log::warn!("Failed to save high score");
            }
        }
    }
}
