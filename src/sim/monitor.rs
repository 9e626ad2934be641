//! Game-over monitor
//!
//! Accumulates how long any object has been poking above the ceiling line.
//! The round ends once that dwell time exceeds the configured delay.

use super::tiers::spec_of;
use crate::error::Result;

/// Outcome of one monitor check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    /// Nothing above the line; timer cleared
    Clear,
    /// Something above the line, still within the grace period
    Violating,
    /// Dwell time exceeded; end the round
    Expired,
}

#[derive(Debug, Clone)]
pub struct GameOverMonitor {
    ceiling_y: f32,
    delay_ms: f32,
    accumulated_ms: f32,
}

impl GameOverMonitor {
    pub fn new(ceiling_y: f32, delay_ms: f32) -> Self {
        Self {
            ceiling_y,
            delay_ms,
            accumulated_ms: 0.0,
        }
    }

    pub fn accumulated_ms(&self) -> f32 {
        self.accumulated_ms
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }

    /// Whether an object of `tier_index` centered at `y` is above the line
    pub fn violates(&self, tier_index: usize, y: f32) -> Result<bool> {
        let radius = spec_of(tier_index)?.radius_f32();
        Ok(y - radius < self.ceiling_y)
    }

    /// Advance by `delta_ms` given `(tier_index, y)` for every active object
    pub fn check<I>(&mut self, delta_ms: f32, objects: I) -> Result<Watch>
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        let mut in_violation = false;
        for (tier_index, y) in objects {
            if self.violates(tier_index, y)? {
                in_violation = true;
                break;
            }
        }

        if !in_violation {
            self.accumulated_ms = 0.0;
            return Ok(Watch::Clear);
        }

        // max() also maps NaN to 0
        self.accumulated_ms += delta_ms.max(0.0);
        if self.accumulated_ms > self.delay_ms {
            Ok(Watch::Expired)
        } else {
            Ok(Watch::Violating)
        }
    }
}
