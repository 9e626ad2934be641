//! Physics seam
//!
//! The rules engine never simulates anything itself. Bodies, gravity and
//! contact resolution live behind [`PhysicsAdapter`]; the engine only creates
//! and destroys circles, reads positions, and consumes contact pairs.

use glam::Vec2;
use serde::Serialize;

/// Opaque reference to a body owned by the physics adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectHandle(pub u32);

/// One body as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSnapshot {
    pub handle: ObjectHandle,
    pub tier_index: usize,
    pub pos: Vec2,
}

/// Two bodies that started touching during the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub a: ObjectHandle,
    pub b: ObjectHandle,
}

impl CollisionPair {
    pub fn new(a: ObjectHandle, b: ObjectHandle) -> Self {
        Self { a, b }
    }

    /// Order-independent key so (a, b) and (b, a) compare equal
    pub fn key(&self) -> (ObjectHandle, ObjectHandle) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// Container walls. The top is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub wall_thickness: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// Services the engine needs from a physics backend
pub trait PhysicsAdapter {
    /// Install the container walls. Called on every round reset.
    fn configure_bounds(&mut self, bounds: &Bounds);

    /// Add a circle body; `tier_index` is carried only as an opaque tag
    fn create_object(&mut self, pos: Vec2, radius: f32, tier_index: usize) -> ObjectHandle;

    /// Remove a body. Returns false if it was already gone.
    fn destroy_object(&mut self, handle: ObjectHandle) -> bool;

    /// Current center of a body
    fn position(&self, handle: ObjectHandle) -> Option<Vec2>;

    /// Every live body
    fn active_objects(&self) -> Vec<ObjectSnapshot>;

    /// Advance the simulation
    fn step(&mut self, delta_ms: f32);

    /// Contact pairs reported by the last step(s); clears the buffer
    fn drain_collisions(&mut self) -> Vec<CollisionPair>;
}
