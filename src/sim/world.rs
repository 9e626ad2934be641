//! Reference physics backend
//!
//! A small circle-only world: gravity, equal-mass circle contacts, and an
//! open-topped box. It reports "contact started" pairs the same way a full
//! engine would, which is all the rules engine needs. Accuracy is not a goal.

use std::collections::HashSet;

use glam::Vec2;

use super::physics::{Bounds, CollisionPair, ObjectHandle, ObjectSnapshot, PhysicsAdapter};
use crate::consts::{GRAVITY, RESTITUTION};

/// Internal integration step (240 Hz)
const SUBSTEP_SECS: f32 = 1.0 / 240.0;
/// Maximum substeps per call to prevent spiral of death
const MAX_SUBSTEPS: u32 = 16;
/// Bodies this close count as touching
const CONTACT_SLOP: f32 = 0.5;
/// Per-substep velocity retention (stands in for friction)
const DAMPING: f32 = 0.998;

/// A circle body
#[derive(Debug, Clone)]
pub struct Body {
    pub handle: ObjectHandle,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub tier_index: usize,
}

/// Circle-only physics world
#[derive(Debug, Clone)]
pub struct CircleWorld {
    /// Live bodies (sorted by handle for deterministic iteration)
    bodies: Vec<Body>,
    bounds: Option<Bounds>,
    gravity: f32,
    restitution: f32,
    /// Pairs touching at the end of the previous step
    contacts: HashSet<(ObjectHandle, ObjectHandle)>,
    /// Pairs that started touching since the last drain
    collisions: Vec<CollisionPair>,
    next_id: u32,
}

impl Default for CircleWorld {
    fn default() -> Self {
        Self::new(GRAVITY, RESTITUTION)
    }
}

impl CircleWorld {
    pub fn new(gravity: f32, restitution: f32) -> Self {
        Self {
            bodies: Vec::new(),
            bounds: None,
            gravity,
            restitution,
            contacts: HashSet::new(),
            collisions: Vec::new(),
            next_id: 1,
        }
    }

    pub fn body(&self, handle: ObjectHandle) -> Option<&Body> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn substep(&mut self, h: f32) {
        for body in &mut self.bodies {
            body.vel.y += self.gravity * h;
            body.vel *= DAMPING;
            body.pos += body.vel * h;
        }

        self.resolve_contacts();

        if let Some(bounds) = self.bounds {
            for body in &mut self.bodies {
                resolve_walls(body, &bounds, self.restitution);
            }
        }
    }

    fn resolve_contacts(&mut self) {
        let e = self.restitution;
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                let delta = b.pos - a.pos;
                let dist = delta.length();
                let min_dist = a.radius + b.radius;
                if dist >= min_dist {
                    continue;
                }

                // Coincident centers: push apart sideways
                let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
                let correction = normal * ((min_dist - dist) * 0.5);
                a.pos -= correction;
                b.pos += correction;

                // Equal masses: split the impulse evenly
                let closing = (b.vel - a.vel).dot(normal);
                if closing < 0.0 {
                    let impulse = normal * (-(1.0 + e) * closing * 0.5);
                    a.vel -= impulse;
                    b.vel += impulse;
                }
            }
        }
    }

    fn touching_pairs(&self) -> HashSet<(ObjectHandle, ObjectHandle)> {
        let mut touching = HashSet::new();
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                if a.pos.distance(b.pos) <= a.radius + b.radius + CONTACT_SLOP {
                    touching.insert(CollisionPair::new(a.handle, b.handle).key());
                }
            }
        }
        touching
    }
}

fn resolve_walls(body: &mut Body, bounds: &Bounds, restitution: f32) {
    let r = body.radius;
    if body.pos.x - r < bounds.left {
        body.pos.x = bounds.left + r;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * restitution;
        }
    }
    if body.pos.x + r > bounds.right {
        body.pos.x = bounds.right - r;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * restitution;
        }
    }
    if body.pos.y + r > bounds.bottom {
        body.pos.y = bounds.bottom - r;
        if body.vel.y > 0.0 {
            body.vel.y = -body.vel.y * restitution;
        }
    }
}

impl PhysicsAdapter for CircleWorld {
    fn configure_bounds(&mut self, bounds: &Bounds) {
        self.bounds = Some(*bounds);
    }

    fn create_object(&mut self, pos: Vec2, radius: f32, tier_index: usize) -> ObjectHandle {
        let handle = ObjectHandle(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            handle,
            pos,
            vel: Vec2::ZERO,
            radius,
            tier_index,
        });
        handle
    }

    fn destroy_object(&mut self, handle: ObjectHandle) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.handle != handle);
        self.contacts.retain(|&(a, b)| a != handle && b != handle);
        self.bodies.len() != before
    }

    fn position(&self, handle: ObjectHandle) -> Option<Vec2> {
        self.body(handle).map(|b| b.pos)
    }

    fn active_objects(&self) -> Vec<ObjectSnapshot> {
        self.bodies
            .iter()
            .map(|b| ObjectSnapshot {
                handle: b.handle,
                tier_index: b.tier_index,
                pos: b.pos,
            })
            .collect()
    }

    fn step(&mut self, delta_ms: f32) {
        if !delta_ms.is_finite() {
            return;
        }
        let secs = (delta_ms / 1000.0).clamp(0.0, 0.1);
        let substeps = ((secs / SUBSTEP_SECS).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let h = secs / substeps as f32;
        for _ in 0..substeps {
            self.substep(h);
        }

        let touching = self.touching_pairs();
        let mut started: Vec<_> = touching.difference(&self.contacts).copied().collect();
        // HashSet order is arbitrary; report in handle order
        started.sort();
        self.collisions
            .extend(started.into_iter().map(|(a, b)| CollisionPair::new(a, b)));
        self.contacts = touching;
    }

    fn drain_collisions(&mut self) -> Vec<CollisionPair> {
        std::mem::take(&mut self.collisions)
    }
}
