//! Game tuning and configuration
//!
//! Loaded once at startup (JSON on disk), immutable for the rest of the session.
//! Every field defaults to the reference tuning so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Value out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the shot penalty is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShotAccounting {
    /// Every fire press costs the penalty, even when the bullet pool is full
    #[default]
    PerPress,
    /// Only bullets that actually spawn cost the penalty
    PerBullet,
}

impl ShotAccounting {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotAccounting::PerPress => "per_press",
            ShotAccounting::PerBullet => "per_bullet",
        }
    }
}

/// Playfield bounds (toroidal on X and Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub half_extent_x: f32,
    pub half_extent_z: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            half_extent_x: PLAYFIELD_HALF_X,
            half_extent_z: PLAYFIELD_HALF_Z,
        }
    }
}

/// Asteroid pool tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    pub count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Multiplier applied on top of per-entity speed
    pub speed_scale: f32,
    /// Nominal mesh bounding-sphere radius
    pub mesh_radius: f32,
    pub sphere_scale: f32,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            count: NUM_ASTEROIDS,
            min_speed: ASTEROID_MIN_SPEED,
            max_speed: ASTEROID_MAX_SPEED,
            speed_scale: ASTEROID_SPEED_SCALE,
            mesh_radius: ASTEROID_MESH_RADIUS,
            sphere_scale: ASTEROID_SPHERE_SCALE,
        }
    }
}

/// Bullet pool tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub count: usize,
    pub speed: f32,
    pub speed_scale: f32,
    pub spawn_offset: f32,
    pub mesh_radius: f32,
    pub sphere_scale: f32,
    /// Seconds before an unspent bullet is reclaimed (None = flies forever)
    pub lifetime_secs: Option<f32>,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            count: NUM_BULLETS,
            speed: BULLET_SPEED,
            speed_scale: BULLET_SPEED_SCALE,
            spawn_offset: BULLET_SPAWN_OFFSET,
            mesh_radius: BULLET_MESH_RADIUS,
            sphere_scale: BULLET_SPHERE_SCALE,
            lifetime_secs: None,
        }
    }
}

/// Ship handling tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub mesh_radius: f32,
    pub sphere_scale: f32,
    /// Radians per tick at full rotate input
    pub rotation_rate: f32,
    /// Velocity added per tick at full thrust
    pub thrust: f32,
    /// Velocity multiplier applied once per tick
    pub damping: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            mesh_radius: SHIP_MESH_RADIUS,
            sphere_scale: SHIP_SPHERE_SCALE,
            rotation_rate: SHIP_ROTATION_RATE,
            thrust: SHIP_THRUST,
            damping: SHIP_DAMPING,
        }
    }
}

/// Score deltas (penalties are stored positive and subtracted).
///
/// Every value must fall in `[0, MAX_SCORE_VALUE]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub shot_penalty: i64,
    pub kill_bonus: i64,
    pub death_penalty: i64,
    pub warp_penalty: i64,
    pub shot_accounting: ShotAccounting,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            shot_penalty: SHOT_PENALTY,
            kill_bonus: KILL_BONUS,
            death_penalty: DEATH_PENALTY,
            warp_penalty: WARP_PENALTY,
            shot_accounting: ShotAccounting::PerPress,
        }
    }
}

/// Upper bound for any single scoring value
pub const MAX_SCORE_VALUE: i64 = i32::MAX as i64;

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: Playfield,
    pub asteroids: AsteroidConfig,
    pub bullets: BulletConfig,
    pub ship: ShipConfig,
    pub scoring: ScoringConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Playfield {
            half_extent_x,
            half_extent_z,
        } = self.playfield;
        positive("playfield.half_extent_x", half_extent_x)?;
        positive("playfield.half_extent_z", half_extent_z)?;

        let a = &self.asteroids;
        if a.count == 0 {
            return Err(invalid("asteroids.count must be at least 1"));
        }
        non_negative("asteroids.min_speed", a.min_speed)?;
        non_negative("asteroids.max_speed", a.max_speed)?;
        if a.min_speed > a.max_speed {
            return Err(invalid(format!(
                "asteroids.min_speed ({}) exceeds asteroids.max_speed ({})",
                a.min_speed, a.max_speed
            )));
        }
        non_negative("asteroids.speed_scale", a.speed_scale)?;
        non_negative("asteroids.mesh_radius", a.mesh_radius)?;
        non_negative("asteroids.sphere_scale", a.sphere_scale)?;

        let b = &self.bullets;
        if b.count == 0 {
            return Err(invalid("bullets.count must be at least 1"));
        }
        non_negative("bullets.speed", b.speed)?;
        non_negative("bullets.speed_scale", b.speed_scale)?;
        non_negative("bullets.spawn_offset", b.spawn_offset)?;
        non_negative("bullets.mesh_radius", b.mesh_radius)?;
        non_negative("bullets.sphere_scale", b.sphere_scale)?;
        if let Some(lifetime) = b.lifetime_secs {
            positive("bullets.lifetime_secs", lifetime)?;
        }

        let s = &self.ship;
        non_negative("ship.mesh_radius", s.mesh_radius)?;
        non_negative("ship.sphere_scale", s.sphere_scale)?;
        finite("ship.rotation_rate", s.rotation_rate)?;
        finite("ship.thrust", s.thrust)?;
        if !(0.0..=1.0).contains(&s.damping) {
            return Err(invalid(format!(
                "ship.damping must be within [0, 1], got {}",
                s.damping
            )));
        }

        let sc = &self.scoring;
        score_value("scoring.shot_penalty", sc.shot_penalty)?;
        score_value("scoring.kill_bonus", sc.kill_bonus)?;
        score_value("scoring.death_penalty", sc.death_penalty)?;
        score_value("scoring.warp_penalty", sc.warp_penalty)?;

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn finite(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(invalid(format!("{name} must not be negative, got {value}")));
    }
    Ok(())
}

fn score_value(name: &str, value: i64) -> Result<(), ConfigError> {
    if !(0..=MAX_SCORE_VALUE).contains(&value) {
        return Err(invalid(format!(
            "{name} must be within [0, {MAX_SCORE_VALUE}], got {value}"
        )));
    }
    Ok(())
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(invalid(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}
