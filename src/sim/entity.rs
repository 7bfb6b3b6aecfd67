//! Movable entities: the shared slot type for asteroids and bullets

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::BoundingSphere;
use crate::config::Playfield;

/// Which edges an entity crossed during a wrap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapResult {
    pub x: bool,
    pub z: bool,
}

impl WrapResult {
    pub fn any(&self) -> bool {
        self.x || self.z
    }
}

/// Single-correction toroidal wrap on one axis.
///
/// Past `+half` subtract the full width, past `-half` add it. Exactly one
/// correction at most; an overshoot larger than the playfield is not folded
/// again.
#[inline]
pub fn wrap_axis(value: f32, half_extent: f32) -> f32 {
    if value > half_extent {
        value - 2.0 * half_extent
    } else if value < -half_extent {
        value + 2.0 * half_extent
    } else {
        value
    }
}

/// A pooled entity moving at constant speed along a fixed heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovableEntity {
    pub position: Vec3,
    /// Unit heading
    pub direction: Vec3,
    /// Non-negative
    pub speed: f32,
    pub active: bool,
    /// Seconds since the last spawn
    #[serde(default)]
    pub age: f32,
}

impl Default for MovableEntity {
    fn default() -> Self {
        Self::new_inactive()
    }
}

impl MovableEntity {
    pub fn new_inactive() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            speed: 0.0,
            active: false,
            age: 0.0,
        }
    }

    /// Activate the slot with a fresh position and heading
    pub fn spawn(&mut self, position: Vec3, direction: Vec3, speed: f32) {
        self.position = position;
        self.direction = direction.normalize_or_zero();
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        self.age = 0.0;
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Translate along the heading. Inactive entities stay frozen.
    pub fn advance(&mut self, dt: f32, speed_scale: f32) {
        if !self.active {
            return;
        }
        self.position += self.direction * self.speed * speed_scale * dt;
        self.age += dt;
    }

    /// Fold the position back onto the playfield (X and Z only)
    pub fn wrap(&mut self, field: &Playfield) -> WrapResult {
        let x = wrap_axis(self.position.x, field.half_extent_x);
        let z = wrap_axis(self.position.z, field.half_extent_z);
        let result = WrapResult {
            x: x != self.position.x,
            z: z != self.position.z,
        };
        self.position.x = x;
        self.position.z = z;
        result
    }

    pub fn bounding_sphere(&self, radius: f32) -> BoundingSphere {
        BoundingSphere::new(self.position, radius)
    }
}
