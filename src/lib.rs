//! Merge Drop - A gravity merge puzzle rules engine
//!
//! Core modules:
//! - `sim`: Rules engine (tiers, spawning, fusion, game-over, round state)
//! - `persistence`: High score storage backends
//! - `settings`: Container geometry and timing configuration
//! - `highscores`: Current/high score ledger

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use highscores::ScoreLedger;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Fixed frame time used by the headless runner (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Container walls (screen coordinates, y grows downward)
    pub const CONTAINER_LEFT: f32 = 50.0;
    pub const CONTAINER_RIGHT: f32 = 550.0;
    pub const CONTAINER_TOP: f32 = 50.0;
    pub const CONTAINER_BOTTOM: f32 = 800.0;
    pub const WALL_THICKNESS: f32 = 32.0;

    /// Ceiling line; an object whose top edge is above it is in violation
    pub const CEILING_Y: f32 = 100.0;
    /// Height of the next-object preview circle
    pub const PREVIEW_Y: f32 = 50.0;
    /// Height new objects are dropped from
    pub const DROP_Y: f32 = 100.0;

    /// Sustained violation time before the round ends
    pub const GAME_OVER_DELAY_MS: f32 = 2000.0;

    /// Downward acceleration for the reference physics world (pixels/s²)
    pub const GRAVITY: f32 = 900.0;
    /// Bounciness for circle and wall contacts
    pub const RESTITUTION: f32 = 0.5;

    /// Only the smallest tiers are ever offered for dropping
    pub const SPAWNABLE_TIERS: usize = 3;
}

/// Arithmetic midpoint of two positions
#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}
