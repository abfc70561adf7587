//! High score persistence
//!
//! Only a single best score is kept. It is stored as a plain integer string
//! (LocalStorage on web) and read once when a run starts.

/// Persistent best-score storage
pub trait HighScoreStore {
    /// Stored best score, 0 if nothing (valid) is stored
    fn high_score(&self) -> u32;
    /// Overwrite the stored best score. Failures are the store's problem.
    fn set_high_score(&mut self, score: u32);
}

/// Parse a stored high score; anything that is not a non-negative integer reads as 0
pub fn parse_high_score(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(score) => score,
        Err(_) => {
            log::warn!("Ignoring unreadable stored high score {:?}", raw);
            0
        }
    }
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    score: u32,
    /// Number of writes, for tests
    writes: usize,
}

impl MemoryHighScore {
    pub fn new(score: u32) -> Self {
        Self { score, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryHighScore {
    fn high_score(&self) -> u32 {
        self.score
    }

    fn set_high_score(&mut self, score: u32) {
        self.score = score;
        self.writes += 1;
    }
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for &mut T {
    fn high_score(&self) -> u32 {
        (**self).high_score()
    }

    fn set_high_score(&mut self, score: u32) {
        (**self).set_high_score(score)
    }
}
