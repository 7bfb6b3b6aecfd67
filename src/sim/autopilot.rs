//! Attract-mode autopilot
//!
//! Produces the same `TickInput` a player would: steer toward the nearest
//! asteroid (leading it slightly), tap fire when lined up, tap warp when dead.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::state::GameState;
use super::tick::TickInput;

/// Seconds of asteroid motion to lead the aim by
const LEAD_SECS: f32 = 0.4;
/// Fire when the heading error is below this (radians)
const FIRE_CONE: f32 = 0.12;
/// Close the gap when the target is further than this
const CRUISE_DISTANCE: f32 = 7000.0;
/// Back off when the target is closer than this
const PANIC_DISTANCE: f32 = 1800.0;

/// Signed shortest turn from `from` to `to`, in [-π, π)
fn shortest_arc(from: f32, to: f32) -> f32 {
    let mut delta = (to - from) % TAU;
    if delta >= PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    delta
}

/// Ship rotation that faces along `dir` on the playfield plane
fn rotation_facing(dir: Vec3) -> f32 {
    // forward = (-sin a, 0, -cos a)
    (-dir.x).atan2(-dir.z)
}

/// Nearest active asteroid's predicted position
fn nearest_target(state: &GameState) -> Option<Vec3> {
    let ship_pos = state.ship().position;
    let scale = state.config().asteroids.speed_scale;

    state
        .asteroids()
        .iter_active()
        .map(|(_, a)| a.position + a.direction * a.speed * scale * LEAD_SECS)
        .min_by(|a, b| {
            a.distance_squared(ship_pos)
                .partial_cmp(&b.distance_squared(ship_pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Next input for the demo pilot. Buttons are tapped, so a press is always
/// followed by a release tick.
pub fn autopilot_input(state: &GameState, previous: &TickInput) -> TickInput {
    let ship = state.ship();

    if !ship.active {
        return TickInput {
            warp: !previous.warp,
            ..Default::default()
        };
    }

    let Some(target) = nearest_target(state) else {
        return TickInput::default();
    };

    let to_target = Vec3::new(target.x - ship.position.x, 0.0, target.z - ship.position.z);
    let distance = to_target.length();
    if distance < f32::EPSILON {
        return TickInput::default();
    }

    let error = shortest_arc(ship.rotation(), rotation_facing(to_target));
    let rate = state.config().ship.rotation_rate.max(f32::EPSILON);
    // rotation -= rotate * rate
    let rotate = (-error / rate).clamp(-1.0, 1.0);

    let thrust = if distance > CRUISE_DISTANCE {
        0.25
    } else if distance < PANIC_DISTANCE {
        -0.5
    } else {
        0.0
    };

    TickInput {
        connected: true,
        rotate,
        thrust,
        fire: error.abs() < FIRE_CONE && !previous.fire,
        warp: false,
    }
}
