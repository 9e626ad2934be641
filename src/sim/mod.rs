//! Rules engine
//!
//! All gameplay decisions live here:
//! - Tier table and spawn selection (seeded RNG only)
//! - Fusion of equal tiers, deferred until the physics step is done
//! - Ceiling dwell timer and the round state machine
//!
//! Physics is consumed through [`PhysicsAdapter`]; nothing in this module
//! renders or touches a platform API.

pub mod merge;
pub mod monitor;
pub mod physics;
pub mod round;
pub mod spawn;
pub mod state;
pub mod tags;
pub mod tiers;
pub mod world;

pub use merge::{Fusion, MergeEngine};
pub use monitor::{GameOverMonitor, Watch};
pub use physics::{Bounds, CollisionPair, ObjectHandle, ObjectSnapshot, PhysicsAdapter};
pub use round::Round;
pub use spawn::{SpawnController, clamp_to_bounds};
pub use state::{GameEvent, Hud, RoundPhase};
pub use tags::TierTags;
pub use tiers::{COUNT, TIERS, TOP_INDEX, TierSpec, spec_of};
pub use world::CircleWorld;
