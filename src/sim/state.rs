//! Round phase, events and HUD snapshot
//!
//! Everything a presentation layer reads from the engine lives here.

use glam::Vec2;
use serde::Serialize;

use super::physics::ObjectHandle;
use super::tiers::TierSpec;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RoundPhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Round ended; only a restart leaves this phase
    GameOver,
}

/// Something that happened during a drop or tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// Board cleared and a new round started
    Reset,
    /// Player released an object
    Dropped {
        handle: ObjectHandle,
        tier: usize,
        x: f32,
    },
    /// Two equal tiers fused into the next one
    Merged {
        created: ObjectHandle,
        tier: usize,
        pos: Vec2,
        points: u64,
    },
    /// Round ended
    GameOver { score: u64, new_high_score: bool },
}

/// Everything the HUD needs to draw a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub phase: RoundPhase,
    /// Tier offered for the next drop
    pub next_tier: usize,
    /// Name, radius and color of `next_tier`
    pub next_spec: TierSpec,
    /// Preview circle center; hidden once the round is over
    pub indicator: Option<Vec2>,
    /// Last finished round beat the previous high score
    pub new_high_score: bool,
}
