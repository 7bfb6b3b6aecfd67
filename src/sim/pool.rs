//! Fixed-capacity entity pools
//!
//! Slots are never allocated or freed after construction; spawning reuses
//! the first inactive slot in index order.

use glam::Vec3;
use rand::Rng;

use super::entity::MovableEntity;
use crate::config::{AsteroidConfig, Playfield};
use crate::heading_from_angle;

/// Fixed-size arena of movable entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPool {
    slots: Vec<MovableEntity>,
}

impl EntityPool {
    /// All slots start inactive
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![MovableEntity::new_inactive(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot count, active or not (same as `capacity`)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MovableEntity> {
        self.slots.get(index)
    }

    /// Mutable slot access (fixed length, so capacity can't change)
    pub fn slots_mut(&mut self) -> &mut [MovableEntity] {
        &mut self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovableEntity> {
        self.slots.iter()
    }

    /// Active slots with their indices
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &MovableEntity)> {
        self.slots.iter().enumerate().filter(|(_, e)| e.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.active).count()
    }

    /// Deterministic first fit
    pub fn first_inactive(&self) -> Option<usize> {
        self.slots.iter().position(|e| !e.active)
    }

    /// Activate the first free slot. `None` when the pool is full.
    pub fn spawn(&mut self, position: Vec3, direction: Vec3, speed: f32) -> Option<usize> {
        let index = self.first_inactive()?;
        self.slots[index].spawn(position, direction, speed);
        Some(index)
    }

    pub fn deactivate(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.deactivate();
        }
    }

    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }

    /// Advance active slots, wrapping when a playfield is given
    pub fn advance_active(&mut self, dt: f32, speed_scale: f32, wrap: Option<&Playfield>) {
        for slot in self.slots.iter_mut().filter(|e| e.active) {
            slot.advance(dt, speed_scale);
            if let Some(field) = wrap {
                slot.wrap(field);
            }
        }
    }

    /// Deactivate active slots at or past `max_age`; returns their indices
    pub fn expire_older_than(&mut self, max_age: f32) -> Vec<usize> {
        let mut expired = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.active && slot.age >= max_age {
                slot.deactivate();
                expired.push(i);
            }
        }
        expired
    }
}

/// Re-roll every asteroid slot onto the left or right edge of the field.
///
/// X is a coin flip between the two edges, Z falls in `[0, half_extent_z)`,
/// heading is a uniform angle and speed is uniform in the configured range.
/// All slots end up active.
///
/// Never panics on an unvalidated range: an empty, inverted or non-finite
/// speed span spawns every asteroid at `min_speed` (clamped to zero by spawn).
pub fn reset_asteroid_field<R: Rng>(
    pool: &mut EntityPool,
    config: &AsteroidConfig,
    field: &Playfield,
    rng: &mut R,
) {
    for slot in pool.slots_mut() {
        let x = if rng.random_bool(0.5) {
            -field.half_extent_x
        } else {
            field.half_extent_x
        };
        let z = rng.random::<f32>() * field.half_extent_z;
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let span = config.max_speed - config.min_speed;
        let speed = if span > 0.0 && span.is_finite() {
            rng.random_range(config.min_speed..=config.max_speed)
        } else {
            config.min_speed
        };

        slot.spawn(Vec3::new(x, 0.0, z), heading_from_angle(angle), speed);
    }
}
