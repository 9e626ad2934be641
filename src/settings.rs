//! Game settings
//!
//! Container geometry, timing and physics knobs. Loaded from an optional JSON
//! file; every field falls back to the defaults in [`crate::consts`].

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::physics::Bounds;
use crate::sim::tiers;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Container ===
    pub container_left: f32,
    pub container_right: f32,
    pub container_top: f32,
    pub container_bottom: f32,
    pub wall_thickness: f32,

    // === Lines ===
    /// Ceiling line; sustained violation ends the round
    pub ceiling_y: f32,
    /// Preview circle height
    pub preview_y: f32,
    /// Spawn height for dropped objects
    pub drop_y: f32,

    // === Timing ===
    pub game_over_delay_ms: f32,

    // === Reference physics ===
    pub gravity: f32,
    pub restitution: f32,

    /// Spawn RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_left: CONTAINER_LEFT,
            container_right: CONTAINER_RIGHT,
            container_top: CONTAINER_TOP,
            container_bottom: CONTAINER_BOTTOM,
            wall_thickness: WALL_THICKNESS,

            ceiling_y: CEILING_Y,
            preview_y: PREVIEW_Y,
            drop_y: DROP_Y,

            game_over_delay_ms: GAME_OVER_DELAY_MS,

            gravity: GRAVITY,
            restitution: RESTITUTION,

            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject geometry the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        let width = self.bounds().width();
        let needed = tiers::max_radius() * 2.0;
        if width < needed {
            return Err(GameError::InvalidSettings(format!(
                "container width {width} cannot hold the largest tier (diameter {needed})"
            )));
        }
        if self.container_bottom <= self.container_top {
            return Err(GameError::InvalidSettings(
                "container bottom must be below its top".to_string(),
            ));
        }
        if !(self.container_top..self.container_bottom).contains(&self.drop_y) {
            return Err(GameError::InvalidSettings(format!(
                "drop height {} must lie inside the container ({}..{})",
                self.drop_y, self.container_top, self.container_bottom
            )));
        }
        if self.preview_y >= self.ceiling_y {
            return Err(GameError::InvalidSettings(format!(
                "preview height {} must be above the ceiling line {}",
                self.preview_y, self.ceiling_y
            )));
        }
        if self.game_over_delay_ms < 0.0 {
            return Err(GameError::InvalidSettings(
                "game over delay must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            left: self.container_left,
            right: self.container_right,
            top: self.container_top,
            bottom: self.container_bottom,
            wall_thickness: self.wall_thickness,
        }
    }

    /// Configured seed, or a fresh one from the OS
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
