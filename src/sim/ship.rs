//! The player's ship
//!
//! Unlike pooled entities the ship drifts: thrust accumulates into a
//! velocity that bleeds off a fixed fraction every tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::BoundingSphere;
use crate::config::ShipConfig;
use crate::{forward_from_rotation, normalize_angle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Radians about +Y, always in [0, 2π)
    rotation: f32,
    pub active: bool,
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

impl Ship {
    /// Parked at the origin, facing -Z, active
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: 0.0,
            active: true,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, angle: f32) {
        self.rotation = normalize_angle(angle);
    }

    pub fn rotate_by(&mut self, delta: f32) {
        self.set_rotation(self.rotation + delta);
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_rotation(self.rotation)
    }

    /// Apply one tick of stick/trigger input.
    ///
    /// Positive `rotate` turns right (decreasing angle). Negative `thrust`
    /// pushes backwards. Both are clamped to [-1, 1].
    pub fn apply_controls(&mut self, rotate: f32, thrust: f32, config: &ShipConfig) {
        let rotate = clamp_axis(rotate);
        let thrust = clamp_axis(thrust);

        if rotate != 0.0 {
            self.rotate_by(-rotate * config.rotation_rate);
        }
        if thrust != 0.0 {
            self.velocity += self.forward() * config.thrust * thrust;
        }
    }

    /// Per-tick drift. Not scaled by dt: the bleed is a fixed fraction per tick.
    pub fn integrate(&mut self, damping: f32) {
        self.position += self.velocity;
        self.velocity *= damping;
    }

    /// Back to the origin, stopped, facing forward and alive
    pub fn warp_home(&mut self) {
        self.position = Vec3::ZERO;
        self.velocity = Vec3::ZERO;
        self.set_rotation(0.0);
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn bounding_sphere(&self, radius: f32) -> BoundingSphere {
        BoundingSphere::new(self.position, radius)
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
