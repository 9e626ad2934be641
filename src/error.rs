//! Crate error type

use thiserror::Error;

/// Failures surfaced by the rules engine and its storage/config layers.
///
/// Ordinary game events (collisions, game over, resets) are state
/// transitions and never appear here.
#[derive(Debug, Error)]
pub enum GameError {
    /// Tier index outside the tier table. Unreachable while invariants hold.
    #[error("tier index {index} out of range (table has {count} tiers)")]
    TierOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Storage(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
