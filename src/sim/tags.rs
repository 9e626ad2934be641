//! Core-owned handle → tier mapping
//!
//! The physics backend hands out opaque handles. Which tier a handle belongs
//! to is recorded here, never on the physics body, and an object counts as
//! active exactly while it has an entry.

use std::collections::BTreeMap;

use glam::Vec2;

use super::physics::{ObjectHandle, PhysicsAdapter};
use super::tiers::spec_of;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct TierTags {
    /// Ordered by handle for deterministic iteration
    tags: BTreeMap<ObjectHandle, usize>,
}

impl TierTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body for `tier_index` at `pos` and tag it
    pub fn spawn(
        &mut self,
        physics: &mut dyn PhysicsAdapter,
        pos: Vec2,
        tier_index: usize,
    ) -> Result<ObjectHandle> {
        let spec = spec_of(tier_index)?;
        let handle = physics.create_object(pos, spec.radius_f32(), tier_index);
        self.tags.insert(handle, tier_index);
        Ok(handle)
    }

    /// Destroy a tagged body. Returns false if it was not active.
    pub fn despawn(&mut self, physics: &mut dyn PhysicsAdapter, handle: ObjectHandle) -> bool {
        if self.tags.remove(&handle).is_none() {
            return false;
        }
        physics.destroy_object(handle);
        true
    }

    /// Destroy every live body the physics backend knows about
    pub fn clear(&mut self, physics: &mut dyn PhysicsAdapter) {
        for obj in physics.active_objects() {
            physics.destroy_object(obj.handle);
        }
        self.tags.clear();
    }

    pub fn tier_of(&self, handle: ObjectHandle) -> Option<usize> {
        self.tags.get(&handle).copied()
    }

    pub fn is_active(&self, handle: ObjectHandle) -> bool {
        self.tags.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, usize)> + '_ {
        self.tags.iter().map(|(&h, &t)| (h, t))
    }
}
