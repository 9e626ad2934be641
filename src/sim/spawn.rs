//! Spawn controller
//!
//! Holds the next droppable tier and the drop/preview geometry.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::tiers::spec_of;
use crate::consts::SPAWNABLE_TIERS;
use crate::error::Result;

/// Clamp `x` so a circle of `radius` stays inside `[left, right]`.
///
/// If the circle is wider than the container it is centered instead.
pub fn clamp_to_bounds(x: f32, left: f32, right: f32, radius: f32) -> f32 {
    let lo = left + radius;
    let hi = right - radius;
    if lo > hi {
        return (left + right) * 0.5;
    }
    x.clamp(lo, hi)
}

#[derive(Debug, Clone)]
pub struct SpawnController {
    current_tier: usize,
    rng: Pcg32,
    left: f32,
    right: f32,
    preview_y: f32,
}

impl SpawnController {
    /// Create a controller for a container spanning `[left, right]`
    pub fn new(seed: u64, left: f32, right: f32, preview_y: f32) -> Self {
        let mut spawn = Self {
            current_tier: 0,
            rng: Pcg32::seed_from_u64(seed),
            left,
            right,
            preview_y,
        };
        spawn.pick_next();
        spawn
    }

    /// Tier that the next drop will use
    pub fn current_tier(&self) -> usize {
        self.current_tier
    }

    /// Draw a new tier uniformly from the spawnable ones
    pub fn pick_next(&mut self) -> usize {
        self.current_tier = self.rng.random_range(0..SPAWNABLE_TIERS);
        self.current_tier
    }

    /// Drop x for the current tier, kept inside the container
    pub fn clamped_x(&self, pointer_x: f32) -> Result<f32> {
        let radius = spec_of(self.current_tier)?.radius_f32();
        Ok(clamp_to_bounds(pointer_x, self.left, self.right, radius))
    }

    /// Where the preview circle of the current tier is drawn
    pub fn indicator_position(&self, pointer_x: f32) -> Result<Vec2> {
        Ok(Vec2::new(self.clamped_x(pointer_x)?, self.preview_y))
    }
}
