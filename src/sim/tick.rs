//! Per-frame simulation step
//!
//! Fixed order every tick:
//! 1. controls, then warp and fire edges
//! 2. ship drift and damping
//! 3. asteroids (wrapping)
//! 4. bullets (no wrap, optional expiry)
//! 5. collisions: bullets vs asteroids, then ship vs asteroids
//! 6. score

use serde::{Deserialize, Serialize};

use super::collision;
use super::state::GameState;
use crate::config::ShotAccounting;

/// Held input state for a single tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Controller present. Steering, thrust and warp need it.
    pub connected: bool,
    /// Turn axis in [-1, 1], positive turns right
    pub rotate: f32,
    /// Thrust axis in [-1, 1], negative pushes backwards
    pub thrust: f32,
    /// Fire button held
    pub fire: bool,
    /// Warp button held
    pub warp: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            connected: true,
            rotate: 0.0,
            thrust: 0.0,
            fire: false,
            warp: false,
        }
    }
}

/// Released → pressed transitions between two consecutive inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEdges {
    pub fire_pressed: bool,
    pub warp_pressed: bool,
}

impl InputEdges {
    pub fn between(previous: &TickInput, current: &TickInput) -> Self {
        Self {
            fire_pressed: current.fire && !previous.fire,
            warp_pressed: current.warp && !previous.warp,
        }
    }
}

/// Something that entered play this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spawned {
    Bullet { slot: usize },
    /// Ship warped back to the origin
    Ship,
}

/// Why a pooled entity left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    /// Asteroid shot by this bullet slot
    ShotBy { bullet: usize },
    /// Bullet spent on this asteroid slot
    Hit { asteroid: usize },
    /// Asteroid collided with the ship
    RammedShip,
    /// Bullet outlived its lifetime
    Expired,
}

/// Something that left play this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destroyed {
    Asteroid { slot: usize, cause: Cause },
    Bullet { slot: usize, cause: Cause },
    Ship { asteroid: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreReason {
    Shot,
    Kill,
    Death,
    Warp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub reason: ScoreReason,
    pub delta: i64,
}

/// Everything a tick did, for audio/HUD consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickEvents {
    pub spawned: Vec<Spawned>,
    pub destroyed: Vec<Destroyed>,
    pub score_changes: Vec<ScoreChange>,
    /// Fire presses with no free bullet slot
    pub shots_dropped: u32,
    /// Sum of `score_changes`, already applied to the state
    pub score_delta: i64,
}

impl TickEvents {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
            && self.destroyed.is_empty()
            && self.score_changes.is_empty()
            && self.shots_dropped == 0
    }

    fn charge(&mut self, reason: ScoreReason, delta: i64) {
        self.score_changes.push(ScoreChange { reason, delta });
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickEvents {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let edges = InputEdges::between(&state.last_input, input);
    let mut events = TickEvents::default();

    state.time_ticks += 1;

    // 1. Controls
    if input.connected {
        if state.ship.active {
            state
                .ship
                .apply_controls(input.rotate, input.thrust, &state.config.ship);
        }
        if edges.warp_pressed {
            warp(state, &mut events);
        }
    }
    if edges.fire_pressed && state.ship.active {
        fire(state, &mut events);
    }
    state.last_input = input.clone();

    // 2. Ship drift
    if state.ship.active {
        state.ship.integrate(state.config.ship.damping);
    }

    // 3. Asteroids
    state.asteroids.advance_active(
        dt,
        state.config.asteroids.speed_scale,
        Some(&state.config.playfield),
    );

    // 4. Bullets
    state
        .bullets
        .advance_active(dt, state.config.bullets.speed_scale, None);
    if let Some(lifetime) = state.config.bullets.lifetime_secs {
        for slot in state.bullets.expire_older_than(lifetime) {
            log::debug!("Bullet {} expired", slot);
            events.destroyed.push(Destroyed::Bullet {
                slot,
                cause: Cause::Expired,
            });
        }
    }

    // 5. Collisions
    let report = collision::resolve(
        &mut state.ship,
        &mut state.asteroids,
        &mut state.bullets,
        &state.radii,
    );
    for hit in &report.bullet_hits {
        log::debug!("Asteroid {} destroyed by bullet {}", hit.asteroid, hit.bullet);
        events.destroyed.push(Destroyed::Asteroid {
            slot: hit.asteroid,
            cause: Cause::ShotBy { bullet: hit.bullet },
        });
        events.destroyed.push(Destroyed::Bullet {
            slot: hit.bullet,
            cause: Cause::Hit {
                asteroid: hit.asteroid,
            },
        });
        events.charge(ScoreReason::Kill, state.config.scoring.kill_bonus);
    }
    if let Some(asteroid) = report.ship_hit {
        log::info!("Ship destroyed by asteroid {}", asteroid);
        events.destroyed.push(Destroyed::Ship { asteroid });
        events.destroyed.push(Destroyed::Asteroid {
            slot: asteroid,
            cause: Cause::RammedShip,
        });
        events.charge(ScoreReason::Death, state.config.scoring.death_penalty.saturating_neg());
    }

    // 6. Score
    events.score_delta = events
        .score_changes
        .iter()
        .fold(0i64, |acc, c| acc.saturating_add(c.delta));
    state.score = state.score.saturating_add(events.score_delta);

    log::trace!(
        "Tick {}: asteroids={}, bullets={}, score={} ({:+})",
        state.time_ticks,
        state.asteroids.active_count(),
        state.bullets.active_count(),
        state.score,
        events.score_delta
    );

    events
}

fn warp(state: &mut GameState, events: &mut TickEvents) {
    state.ship.warp_home();
    events.spawned.push(Spawned::Ship);
    events.charge(ScoreReason::Warp, state.config.scoring.warp_penalty.saturating_neg());
    log::info!("Ship warped home");
}

fn fire(state: &mut GameState, events: &mut TickEvents) {
    let bullets = &state.config.bullets;
    let direction = state.ship.forward();
    let position = state.ship.position + direction * bullets.spawn_offset;
    let slot = state.bullets.spawn(position, direction, bullets.speed);

    let charged = match state.config.scoring.shot_accounting {
        ShotAccounting::PerPress => true,
        ShotAccounting::PerBullet => slot.is_some(),
    };
    if charged {
        events.charge(ScoreReason::Shot, state.config.scoring.shot_penalty.saturating_neg());
    }

    match slot {
        Some(slot) => {
            log::debug!("Bullet {} fired", slot);
            events.spawned.push(Spawned::Bullet { slot });
        }
        None => {
            log::debug!("Fire dropped: all {} bullet slots busy", state.bullets.capacity());
            events.shots_dropped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, MAX_SCORE_VALUE};
    use crate::consts::FRAME_DT;
    use glam::Vec3;

    /// State with the asteroid field cleared
    fn quiet_state(config: GameConfig) -> GameState {
        let mut state = GameState::new(config, 12345);
        state.asteroids.deactivate_all();
        state
    }

    fn press_fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    fn press_warp() -> TickInput {
        TickInput {
            warp: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_edges_only_on_press() {
        let up = TickInput::default();
        let down = press_fire();
        assert!(InputEdges::between(&up, &down).fire_pressed);
        assert!(!InputEdges::between(&down, &down).fire_pressed);
        assert!(!InputEdges::between(&down, &up).fire_pressed);
    }

    #[test]
    fn test_asteroid_wraps_to_opposite_edge() {
        let mut state = quiet_state(GameConfig::default());
        // 600 * 5 * (1/60) = 50 units this tick
        state.asteroids.slots_mut()[0].spawn(Vec3::new(16000.0, 0.0, 0.0), Vec3::X, 600.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);

        let x = state.asteroids().get(0).unwrap().position.x;
        assert!((x + 15950.0).abs() < 0.01, "x = {x}");
    }

    #[test]
    fn test_asteroid_moving_inward_does_not_wrap() {
        let mut state = quiet_state(GameConfig::default());
        state.asteroids.slots_mut()[0].spawn(Vec3::new(16000.0, 0.0, 0.0), Vec3::NEG_X, 600.0);

        tick(&mut state, &TickInput::default(), FRAME_DT);

        let x = state.asteroids().get(0).unwrap().position.x;
        assert!((x - 15950.0).abs() < 0.01, "x = {x}");
    }

    #[test]
    fn test_thrust_and_damping_scenario() {
        let mut state = quiet_state(GameConfig::default());
        let input = TickInput {
            thrust: 1.0,
            ..Default::default()
        };

        tick(&mut state, &input, FRAME_DT);

        let ship = state.ship();
        assert!((ship.position - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        assert!((ship.velocity - Vec3::new(0.0, 0.0, -1.9)).length() < 1e-5);
    }

    #[test]
    fn test_disconnected_ignores_controls_and_warp() {
        let mut state = quiet_state(GameConfig::default());
        let input = TickInput {
            connected: false,
            rotate: 1.0,
            thrust: 1.0,
            warp: true,
            ..Default::default()
        };

        let events = tick(&mut state, &input, FRAME_DT);

        assert_eq!(state.ship().velocity, Vec3::ZERO);
        assert_eq!(state.ship().rotation(), 0.0);
        assert!(events.is_empty());
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_fire_spawns_ahead_of_ship() {
        let mut state = quiet_state(GameConfig::default());

        let events = tick(&mut state, &press_fire(), 0.0);

        assert_eq!(events.spawned, vec![Spawned::Bullet { slot: 0 }]);
        let bullet = state.bullets().get(0).unwrap();
        assert!(bullet.active);
        assert!((bullet.position - Vec3::new(0.0, 0.0, -200.0)).length() < 1e-4);
        assert!((bullet.direction - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(bullet.speed, 100.0);
        assert_eq!(state.score(), -1);
    }

    #[test]
    fn test_holding_fire_shoots_once() {
        let mut state = quiet_state(GameConfig::default());
        for _ in 0..5 {
            tick(&mut state, &press_fire(), FRAME_DT);
        }
        assert_eq!(state.bullets().active_count(), 1);
        assert_eq!(state.score(), -1);
    }

    #[test]
    fn test_bullets_travel_without_wrapping() {
        let mut state = quiet_state(GameConfig::default());
        tick(&mut state, &press_fire(), 0.0);
        tick(&mut state, &TickInput::default(), 1.0);
        tick(&mut state, &TickInput::default(), 1.0);

        // 100 * 100 * 2s = 20000 units beyond the spawn point, past the z edge
        let bullet = state.bullets().get(0).unwrap();
        assert!(bullet.active);
        assert!((bullet.position.z + 20200.0).abs() < 0.1);
    }

    #[test]
    fn test_full_pool_still_charges_per_press() {
        let mut config = GameConfig::default();
        config.bullets.count = 3;
        let mut state = quiet_state(config);

        for _ in 0..5 {
            tick(&mut state, &press_fire(), 0.0);
            tick(&mut state, &TickInput::default(), 0.0);
        }

        assert_eq!(state.bullets().active_count(), 3);
        assert_eq!(state.score(), -5);
    }

    #[test]
    fn test_full_pool_reports_dropped_shot() {
        let mut config = GameConfig::default();
        config.bullets.count = 1;
        let mut state = quiet_state(config);
        tick(&mut state, &press_fire(), 0.0);
        tick(&mut state, &TickInput::default(), 0.0);

        let events = tick(&mut state, &press_fire(), 0.0);

        assert!(events.spawned.is_empty());
        assert_eq!(events.shots_dropped, 1);
        assert_eq!(events.score_delta, -1);
    }

    #[test]
    fn test_per_bullet_accounting_skips_dry_fire() {
        let mut config = GameConfig::default();
        config.bullets.count = 2;
        config.scoring.shot_accounting = ShotAccounting::PerBullet;
        let mut state = quiet_state(config);

        for _ in 0..4 {
            tick(&mut state, &press_fire(), 0.0);
            tick(&mut state, &TickInput::default(), 0.0);
        }

        assert_eq!(state.score(), -2);
    }

    #[test]
    fn test_kill_bonus_and_single_bullet_spent() {
        let mut state = quiet_state(GameConfig::default());
        let target = Vec3::new(3000.0, 0.0, 3000.0);
        state.asteroids.slots_mut()[0].spawn(target, Vec3::X, 0.0);
        for _ in 0..4 {
            state.bullets.spawn(target, Vec3::X, 0.0);
        }

        let events = tick(&mut state, &TickInput::default(), FRAME_DT);

        assert_eq!(state.asteroids().active_count(), 0);
        assert_eq!(state.bullets().active_count(), 3);
        assert!(!state.bullets().get(0).unwrap().active);
        assert_eq!(
            events.score_changes,
            vec![ScoreChange {
                reason: ScoreReason::Kill,
                delta: 25
            }]
        );
        assert_eq!(state.score(), 25);
    }

    #[test]
    fn test_ship_death_penalty_and_halt() {
        let mut state = quiet_state(GameConfig::default());
        state.asteroids.slots_mut()[2].spawn(Vec3::new(100.0, 0.0, 0.0), Vec3::X, 0.0);
        state.ship.velocity = Vec3::new(0.0, 0.0, 5.0);

        let events = tick(&mut state, &TickInput::default(), FRAME_DT);

        assert!(!state.ship().active);
        assert!(events.destroyed.contains(&Destroyed::Ship { asteroid: 2 }));
        assert_eq!(state.score(), -100);

        // Dead ship neither drifts nor fires
        let frozen = state.ship().position;
        let events = tick(&mut state, &press_fire(), FRAME_DT);
        assert_eq!(state.ship().position, frozen);
        assert!(events.spawned.is_empty());
        assert_eq!(state.score(), -100);
    }

    #[test]
    fn test_warp_revives_and_costs() {
        let mut state = quiet_state(GameConfig::default());
        state.ship.position = Vec3::new(4000.0, 0.0, 100.0);
        state.ship.velocity = Vec3::new(1.0, 0.0, 0.0);
        state.ship.set_rotation(1.0);
        state.ship.deactivate();

        let events = tick(&mut state, &press_warp(), FRAME_DT);

        assert_eq!(events.spawned, vec![Spawned::Ship]);
        assert!(state.ship().active);
        assert_eq!(state.ship().position, Vec3::ZERO);
        assert_eq!(state.ship().rotation(), 0.0);
        assert_eq!(state.score(), -50);

        // Held warp doesn't repeat
        tick(&mut state, &press_warp(), FRAME_DT);
        assert_eq!(state.score(), -50);
    }

    #[test]
    fn test_shot_asteroid_spares_ship() {
        let mut state = quiet_state(GameConfig::default());
        // Overlaps both the ship and a parked bullet
        state.asteroids.slots_mut()[0].spawn(Vec3::new(0.0, 0.0, -300.0), Vec3::X, 0.0);
        state.bullets.spawn(Vec3::new(0.0, 0.0, -300.0), Vec3::X, 0.0);

        let events = tick(&mut state, &TickInput::default(), FRAME_DT);

        assert!(state.ship().active);
        assert_eq!(state.score(), 25);
        assert!(!events.destroyed.iter().any(|d| matches!(d, Destroyed::Ship { .. })));
    }

    #[test]
    fn test_bullet_lifetime_expiry() {
        let mut config = GameConfig::default();
        config.bullets.lifetime_secs = Some(0.5);
        let mut state = quiet_state(config);
        tick(&mut state, &press_fire(), 0.0);

        let events = tick(&mut state, &TickInput::default(), 0.25);
        assert!(events.destroyed.is_empty());

        let events = tick(&mut state, &TickInput::default(), 0.25);
        assert_eq!(
            events.destroyed,
            vec![Destroyed::Bullet {
                slot: 0,
                cause: Cause::Expired
            }]
        );
        assert_eq!(state.bullets().active_count(), 0);
    }

    #[test]
    fn test_bad_dt_is_treated_as_zero() {
        let mut state = GameState::new(GameConfig::default(), 3);
        let before = state.asteroids().clone();
        tick(&mut state, &TickInput::default(), f32::NAN);
        tick(&mut state, &TickInput::default(), -1.0);
        assert_eq!(state.asteroids(), &before);
        assert_eq!(state.time_ticks(), 2);
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let mut config = GameConfig::default();
        config.scoring.warp_penalty = MAX_SCORE_VALUE;
        let mut state = quiet_state(config);
        state.score = i64::MIN + 10;

        let events = tick(&mut state, &press_warp(), FRAME_DT);
        assert_eq!(events.score_delta, -MAX_SCORE_VALUE);
        assert_eq!(state.score(), i64::MIN);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        tick(&mut state, &press_fire(), FRAME_DT);
        assert_eq!(state.score(), i64::MIN);
    }

    #[test]
    fn test_unvalidated_extreme_penalty_does_not_panic() {
        let mut config = GameConfig::default();
        config.scoring.warp_penalty = i64::MIN;
        config.scoring.shot_penalty = i64::MIN;
        let mut state = quiet_state(config);
        state.ship.deactivate();

        let events = tick(&mut state, &press_warp(), FRAME_DT);
        assert!(state.ship().active);
        assert_eq!(events.score_changes.len(), 1);

        tick(&mut state, &TickInput::default(), FRAME_DT);
        tick(&mut state, &press_fire(), FRAME_DT);
        assert_eq!(state.bullets().active_count(), 1);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                rotate: 0.5,
                thrust: 1.0,
                ..Default::default()
            },
            press_fire(),
            TickInput::default(),
            press_fire(),
            press_warp(),
        ];
        let mut a = GameState::new(GameConfig::default(), 99999);
        let mut b = GameState::new(GameConfig::default(), 99999);
        for _ in 0..40 {
            for input in &inputs {
                let ea = tick(&mut a, input, FRAME_DT);
                let eb = tick(&mut b, input, FRAME_DT);
                assert_eq!(ea, eb);
            }
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
