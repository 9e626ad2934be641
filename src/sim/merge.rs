//! Merge engine
//!
//! Turns contact pairs into fusions. Qualifying pairs are only queued while
//! the physics backend is reporting contacts; [`MergeEngine::flush`] performs
//! the destroy/create afterwards, once the backend has finished its step.
//! A queued pair whose objects were consumed by an earlier fusion in the same
//! flush is dropped silently.

use std::collections::VecDeque;

use glam::Vec2;

use super::physics::{CollisionPair, ObjectHandle, PhysicsAdapter};
use super::tags::TierTags;
use super::tiers::{has_successor, spec_of};
use crate::error::Result;
use crate::highscores::ScoreLedger;
use crate::midpoint;

/// A completed fusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fusion {
    pub consumed: [ObjectHandle; 2],
    pub created: ObjectHandle,
    pub from_tier: usize,
    pub to_tier: usize,
    pub pos: Vec2,
    pub points: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    /// Pending fusion transactions, in arrival order
    pending: VecDeque<CollisionPair>,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fusion if the pair qualifies. Returns whether it was queued.
    pub fn on_collision(&mut self, pair: CollisionPair, tags: &TierTags) -> bool {
        if pair.a == pair.b {
            return false;
        }
        let (Some(tier_a), Some(tier_b)) = (tags.tier_of(pair.a), tags.tier_of(pair.b)) else {
            return false;
        };
        if tier_a != tier_b || !has_successor(tier_a) {
            return false;
        }
        if self.pending.iter().any(|p| p.key() == pair.key()) {
            return false;
        }

        log::debug!("Queued fusion {:?} + {:?} (tier {})", pair.a, pair.b, tier_a);
        self.pending.push_back(pair);
        true
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every queued fusion (round reset)
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Execute queued fusions in arrival order
    pub fn flush(
        &mut self,
        tags: &mut TierTags,
        physics: &mut dyn PhysicsAdapter,
        ledger: &mut ScoreLedger,
    ) -> Result<Vec<Fusion>> {
        let mut fusions = Vec::new();
        while let Some(pair) = self.pending.pop_front() {
            if let Some(fusion) = execute(pair, tags, physics, ledger)? {
                fusions.push(fusion);
            }
        }
        Ok(fusions)
    }
}

fn execute(
    pair: CollisionPair,
    tags: &mut TierTags,
    physics: &mut dyn PhysicsAdapter,
    ledger: &mut ScoreLedger,
) -> Result<Option<Fusion>> {
    // Either side may have been consumed by an earlier fusion this flush
    if !tags.is_active(pair.a) || !tags.is_active(pair.b) {
        return Ok(None);
    }
    let (Some(tier), Some(pos_a), Some(pos_b)) = (
        tags.tier_of(pair.a),
        physics.position(pair.a),
        physics.position(pair.b),
    ) else {
        return Ok(None);
    };

    let to_tier = tier + 1;
    let points = spec_of(to_tier)?.score_reward;
    let pos = midpoint(pos_a, pos_b);

    tags.despawn(physics, pair.a);
    tags.despawn(physics, pair.b);
    let created = tags.spawn(physics, pos, to_tier)?;
    ledger.award(points);

    log::debug!(
        "Fused {:?} + {:?} -> {:?} (tier {} -> {}, +{})",
        pair.a,
        pair.b,
        created,
        tier,
        to_tier,
        points
    );

    Ok(Some(Fusion {
        consumed: [pair.a, pair.b],
        created,
        from_tier: tier,
        to_tier,
        pos,
        points,
    }))
}
