//! Asteroid Field - a wrapping asteroid field arcade simulation
//!
//! Core modules:
//! - `sim`: Simulation and collision resolution (entity pools, ship, scoring)
//! - `config`: Data-driven tuning loaded once at startup
//!
//! Rendering, audio and input polling live outside this crate. They feed a
//! [`sim::TickInput`] in and read [`sim::TickEvents`] plus snapshots out.

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig, ShotAccounting};

use glam::{Quat, Vec3};

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep (one tick per rendered frame at 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta a runner should feed a single tick
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield half extents (X and Z; Y is the camera axis)
    pub const PLAYFIELD_HALF_X: f32 = 16000.0;
    pub const PLAYFIELD_HALF_Z: f32 = 12500.0;

    /// Asteroid defaults
    pub const NUM_ASTEROIDS: usize = 10;
    pub const ASTEROID_MIN_SPEED: f32 = 100.0;
    pub const ASTEROID_MAX_SPEED: f32 = 300.0;
    pub const ASTEROID_SPEED_SCALE: f32 = 5.0;
    pub const ASTEROID_MESH_RADIUS: f32 = 650.0;
    /// 95% of the mesh bounding sphere
    pub const ASTEROID_SPHERE_SCALE: f32 = 0.95;

    /// Bullet defaults
    pub const NUM_BULLETS: usize = 30;
    pub const BULLET_SPEED: f32 = 100.0;
    pub const BULLET_SPEED_SCALE: f32 = 100.0;
    /// Distance ahead of the ship a bullet appears
    pub const BULLET_SPAWN_OFFSET: f32 = 200.0;
    pub const BULLET_MESH_RADIUS: f32 = 60.0;
    pub const BULLET_SPHERE_SCALE: f32 = 1.0;

    /// Ship defaults
    pub const SHIP_MESH_RADIUS: f32 = 600.0;
    /// 50% of the mesh bounding sphere
    pub const SHIP_SPHERE_SCALE: f32 = 0.5;
    /// Radians per tick at full stick deflection
    pub const SHIP_ROTATION_RATE: f32 = 0.10;
    pub const SHIP_THRUST: f32 = 2.0;
    /// Per-tick velocity bleed (not scaled by dt)
    pub const SHIP_DAMPING: f32 = 0.95;

    /// Scoring
    pub const SHOT_PENALTY: i64 = 1;
    pub const KILL_BONUS: i64 = 25;
    pub const DEATH_PENALTY: i64 = 100;
    pub const WARP_PENALTY: i64 = 50;
}

/// Normalize angle to [0, 2π)
///
/// Repeated add/subtract so any finite input lands in range. Non-finite
/// input collapses to 0.
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    if !angle.is_finite() {
        return 0.0;
    }
    // Huge magnitudes would take forever one turn at a time
    if angle.abs() > TAU * 1024.0 {
        angle %= TAU;
    }
    while angle >= TAU {
        angle -= TAU;
    }
    while angle < 0.0 {
        angle += TAU;
    }
    // -tiny + TAU can round up to exactly TAU
    if angle >= TAU { 0.0 } else { angle }
}

/// Forward unit vector for a rotation about the vertical (Y) axis.
///
/// Rotation 0 faces -Z.
#[inline]
pub fn forward_from_rotation(rotation: f32) -> Vec3 {
    Quat::from_rotation_y(rotation) * Vec3::NEG_Z
}

/// Unit heading on the playfield plane for an arbitrary angle
#[inline]
pub fn heading_from_angle(angle: f32) -> Vec3 {
    Vec3::new(-angle.sin(), 0.0, angle.cos())
}
