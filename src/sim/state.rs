//! Game state and read-only snapshots
//!
//! `GameState` is the single owner of the ship, both pools and the score.
//! The presentation layer only ever sees `&GameState` accessors or an owned
//! `Snapshot`.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionRadii;
use super::pool::{EntityPool, reset_asteroid_field};
use super::ship::Ship;
use super::tick::TickInput;
use crate::config::GameConfig;

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    seed: u64,
    rng: Pcg32,
    pub(crate) config: GameConfig,
    /// Derived once from config
    pub(crate) radii: CollisionRadii,
    pub(crate) ship: Ship,
    pub(crate) asteroids: EntityPool,
    pub(crate) bullets: EntityPool,
    /// Session score; only reset by creating a new state
    pub(crate) score: i64,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    /// Last tick's input, for edge detection
    pub(crate) last_input: TickInput,
}

impl GameState {
    /// Fresh session: ship parked at the origin, asteroid field rolled from
    /// `seed`, every bullet slot free, score zero.
    ///
    /// `config` is taken as is. Run it through `GameConfig::validate` first
    /// (`from_json_str` and `load` already do); an unvalidated config never
    /// panics here or in `tick`, but may produce degenerate play such as
    /// motionless asteroids.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            radii: CollisionRadii::from_config(&config),
            ship: Ship::new(),
            asteroids: EntityPool::with_capacity(config.asteroids.count),
            bullets: EntityPool::with_capacity(config.bullets.count),
            score: 0,
            time_ticks: 0,
            last_input: TickInput::default(),
            config,
        };
        state.reset_asteroids();

        log::info!(
            "Game state created: seed={}, asteroids={}, bullets={}",
            seed,
            state.asteroids.capacity(),
            state.bullets.capacity()
        );
        state
    }

    /// Re-roll the whole asteroid field. Score is untouched.
    pub fn reset_asteroids(&mut self) {
        reset_asteroid_field(
            &mut self.asteroids,
            &self.config.asteroids,
            &self.config.playfield,
            &mut self.rng,
        );
        log::info!("Asteroid field reset ({} asteroids)", self.asteroids.capacity());
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn asteroids(&self) -> &EntityPool {
        &self.asteroids
    }

    pub fn bullets(&self) -> &EntityPool {
        &self.bullets
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn radii(&self) -> &CollisionRadii {
        &self.radii
    }

    /// Owned copy of everything a renderer draws
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            score: self.score,
            ship: ShipView {
                position: self.ship.position,
                velocity: self.ship.velocity,
                rotation: self.ship.rotation(),
                forward: self.ship.forward(),
                active: self.ship.active,
            },
            asteroids: entity_views(&self.asteroids),
            bullets: entity_views(&self.bullets),
        }
    }
}

/// Ship as seen by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: f32,
    pub forward: Vec3,
    pub active: bool,
}

/// One active pooled entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub slot: usize,
    pub position: Vec3,
    pub direction: Vec3,
}

/// Frame snapshot (active entities only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: i64,
    pub ship: ShipView,
    pub asteroids: Vec<EntityView>,
    pub bullets: Vec<EntityView>,
}

fn entity_views(pool: &EntityPool) -> Vec<EntityView> {
    pool.iter_active()
        .map(|(slot, e)| EntityView {
            slot,
            position: e.position,
            direction: e.direction,
        })
        .collect()
}
