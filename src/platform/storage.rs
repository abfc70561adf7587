//! LocalStorage high score

use web_sys::Storage;

use crate::highscores::{HighScoreStore, parse_high_score};

/// LocalStorage key; the value is a plain integer string
pub const HIGH_SCORE_KEY: &str = "nitro_lane_high_score";

/// High score kept in the browser's LocalStorage.
///
/// Storage may be missing (private mode, sandboxed frames); the store then
/// reads 0 and drops writes.
pub struct LocalStorageHighScore {
    storage: Option<Storage>,
}

impl Default for LocalStorageHighScore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorageHighScore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - high score will not persist");
        }
        Self { storage }
    }
}

impl HighScoreStore for LocalStorageHighScore {
    fn high_score(&self) -> u32 {
        let Some(storage) = &self.storage else {
            return 0;
        };
        match storage.get_item(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => parse_high_score(&raw),
            _ => 0,
        }
    }

    fn set_high_score(&mut self, score: u32) {
        if let Some(storage) = &self.storage {
            if storage
                .set_item(HIGH_SCORE_KEY, &score.to_string())
                .is_err()
            {
                log::warn!("Could not save high score");
            }
        }
    }
}
