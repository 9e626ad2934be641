//! Tier table
//!
//! Static ranking of droppable kinds. Index is the canonical rank: radius and
//! reward grow strictly with it, and the last tier never fuses further.

use serde::Serialize;

use crate::error::{GameError, Result};

/// One rank in the merge progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierSpec {
    pub name: &'static str,
    /// Circle radius in pixels
    pub radius: u32,
    /// 0xRRGGBB fill color
    pub color: u32,
    /// Points awarded when a fusion produces this tier
    pub score_reward: u64,
}

impl TierSpec {
    /// Radius as a float for geometry
    #[inline]
    pub fn radius_f32(&self) -> f32 {
        self.radius as f32
    }
}

/// Number of tiers
pub const COUNT: usize = 9;

/// Terminal tier; never fuses
pub const TOP_INDEX: usize = COUNT - 1;

/// The full table, smallest first
pub static TIERS: [TierSpec; COUNT] = [
    TierSpec { name: "mouse", radius: 20, color: 0x80_80_80, score_reward: 10 },
    TierSpec { name: "rabbit", radius: 25, color: 0xff_ff_ff, score_reward: 20 },
    TierSpec { name: "cat", radius: 30, color: 0xff_a5_00, score_reward: 30 },
    TierSpec { name: "dog", radius: 35, color: 0x8b_45_13, score_reward: 40 },
    TierSpec { name: "fox", radius: 40, color: 0xff_8c_00, score_reward: 50 },
    TierSpec { name: "horse", radius: 50, color: 0xa0_52_2d, score_reward: 60 },
    TierSpec { name: "giraffe", radius: 60, color: 0xff_d7_00, score_reward: 70 },
    TierSpec { name: "lion", radius: 70, color: 0xda_a5_20, score_reward: 80 },
    TierSpec { name: "elephant", radius: 80, color: 0xc0_c0_c0, score_reward: 90 },
];

/// Look up a tier by rank
pub fn spec_of(index: usize) -> Result<&'static TierSpec> {
    TIERS.get(index).ok_or(GameError::TierOutOfRange {
        index,
        count: COUNT,
    })
}

/// Whether a tier can still fuse into a successor
#[inline]
pub fn has_successor(index: usize) -> bool {
    index < TOP_INDEX
}

/// Largest radius in the table (used to validate container width)
pub fn max_radius() -> f32 {
    TIERS[TOP_INDEX].radius_f32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_strictly_increasing() {
        for i in 0..TOP_INDEX {
            let a = spec_of(i).unwrap();
            let b = spec_of(i + 1).unwrap();
            assert!(a.radius < b.radius, "radius not increasing at {i}");
            assert!(a.score_reward < b.score_reward, "reward not increasing at {i}");
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(COUNT, 9);
        assert!(spec_of(TOP_INDEX).is_ok());
        match spec_of(COUNT) {
            Err(GameError::TierOutOfRange { index, count }) => {
                assert_eq!(index, 9);
                assert_eq!(count, 9);
            }
            other => panic!("expected out of range, got {other:?}"),
        }
    }

    #[test]
    fn test_terminal_tier() {
        assert!(has_successor(0));
        assert!(has_successor(TOP_INDEX - 1));
        assert!(!has_successor(TOP_INDEX));
        assert_eq!(max_radius(), 80.0);
    }
}
