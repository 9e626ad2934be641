//! High score persistence
//!
//! Only one value ever survives a restart: the high score, stored as a
//! decimal string. Anything unreadable is treated as "no high score yet".

pub mod file;

pub use file::FileStore;

use crate::error::Result;

/// Key-value backend for the persisted high score
pub trait HighScoreStore {
    /// Stored high score, or `None` if absent or unparsable
    fn load(&self) -> Option<u64>;

    /// Overwrite the stored high score
    fn save(&mut self, score: u64) -> Result<()>;
}

/// Parse a stored high score; malformed values count as absent
pub fn parse_high_score(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(score) => Some(score),
        Err(_) => {
            log::warn!("Ignoring malformed stored high score {raw:?}");
            None
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Raw stored text, exactly as a key-value store would hold it
    raw: Option<String>,
    /// Number of successful writes
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw text (may be malformed)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            writes: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Option<u64> {
        self.raw.as_deref().and_then(parse_high_score)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        self.raw = Some(score.to_string());
        self.writes += 1;
        Ok(())
    }
}
