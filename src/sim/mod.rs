//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per frame, fixed intra-tick order
//! - Seeded RNG only
//! - Fixed-capacity pools iterated in slot order
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod pool;
pub mod ship;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{
    BoundingSphere, BulletHit, CollisionRadii, CollisionReport, resolve, resolve_bullet_hits,
    resolve_ship_hit,
};
pub use entity::{MovableEntity, WrapResult, wrap_axis};
pub use pool::{EntityPool, reset_asteroid_field};
pub use ship::Ship;
pub use state::{EntityView, GameState, ShipView, Snapshot};
pub use tick::{
    Cause, Destroyed, InputEdges, ScoreChange, ScoreReason, Spawned, TickEvents, TickInput, tick,
};
