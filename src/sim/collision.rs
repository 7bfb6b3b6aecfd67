//! Collision detection between the entity pools
//!
//! Everything is a bounding sphere: the nominal mesh radius shrunk by a
//! per-type scale so the hit volume hugs the silhouette. Resolution mutates
//! active flags in place, so later passes see earlier kills.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pool::EntityPool;
use super::ship::Ship;
use crate::config::GameConfig;

/// Sphere used for every hit test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Touching counts as a hit
    #[inline]
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

/// Effective collision radii per entity type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRadii {
    pub asteroid: f32,
    pub bullet: f32,
    pub ship: f32,
}

impl CollisionRadii {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            asteroid: config.asteroids.mesh_radius * config.asteroids.sphere_scale,
            bullet: config.bullets.mesh_radius * config.bullets.sphere_scale,
            ship: config.ship.mesh_radius * config.ship.sphere_scale,
        }
    }
}

/// A bullet destroyed an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletHit {
    pub asteroid: usize,
    pub bullet: usize,
}

/// Everything the resolver changed this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// In asteroid index order
    pub bullet_hits: Vec<BulletHit>,
    /// Asteroid slot that killed the ship, if any
    pub ship_hit: Option<usize>,
}

/// Bullet vs asteroid pass.
///
/// Each active asteroid takes the first active bullet (by slot order) that
/// touches it; both are deactivated and the scan moves to the next asteroid.
/// Other overlapping bullets survive for later asteroids.
pub fn resolve_bullet_hits(
    asteroids: &mut EntityPool,
    bullets: &mut EntityPool,
    radii: &CollisionRadii,
) -> Vec<BulletHit> {
    let mut hits = Vec::new();

    for (ai, asteroid) in asteroids.slots_mut().iter_mut().enumerate() {
        if !asteroid.active {
            continue;
        }
        let asteroid_sphere = asteroid.bounding_sphere(radii.asteroid);

        for (bi, bullet) in bullets.slots_mut().iter_mut().enumerate() {
            if !bullet.active {
                continue;
            }
            if asteroid_sphere.intersects(&bullet.bounding_sphere(radii.bullet)) {
                asteroid.deactivate();
                bullet.deactivate();
                hits.push(BulletHit {
                    asteroid: ai,
                    bullet: bi,
                });
                break;
            }
        }
    }

    hits
}

/// Ship vs asteroid pass. Returns the asteroid that killed the ship.
///
/// Reads live active flags, so an asteroid already shot this tick can't
/// also take the ship down.
pub fn resolve_ship_hit(
    ship: &mut Ship,
    asteroids: &mut EntityPool,
    radii: &CollisionRadii,
) -> Option<usize> {
    if !ship.active {
        return None;
    }
    let ship_sphere = ship.bounding_sphere(radii.ship);

    for (ai, asteroid) in asteroids.slots_mut().iter_mut().enumerate() {
        if !asteroid.active {
            continue;
        }
        if asteroid.bounding_sphere(radii.asteroid).intersects(&ship_sphere) {
            ship.deactivate();
            asteroid.deactivate();
            return Some(ai);
        }
    }

    None
}

/// Run both passes in their fixed order
pub fn resolve(
    ship: &mut Ship,
    asteroids: &mut EntityPool,
    bullets: &mut EntityPool,
    radii: &CollisionRadii,
) -> CollisionReport {
    let bullet_hits = resolve_bullet_hits(asteroids, bullets, radii);
    let ship_hit = resolve_ship_hit(ship, asteroids, radii);
    CollisionReport {
        bullet_hits,
        ship_hit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADII: CollisionRadii = CollisionRadii {
        asteroid: 100.0,
        bullet: 10.0,
        ship: 50.0,
    };

    fn pool_at(positions: &[Vec3]) -> EntityPool {
        let mut pool = EntityPool::with_capacity(positions.len());
        for &p in positions {
            pool.spawn(p, Vec3::X, 0.0);
        }
        pool
    }

    #[test]
    fn test_sphere_touching_counts() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        let b = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 2.0);
        let c = BoundingSphere::new(Vec3::new(3.01, 0.0, 0.0), 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_radii_apply_shrink_factors() {
        let radii = CollisionRadii::from_config(&GameConfig::default());
        assert!((radii.asteroid - 650.0 * 0.95).abs() < 1e-3);
        assert!((radii.bullet - 60.0).abs() < 1e-3);
        assert!((radii.ship - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_one_bullet_per_asteroid() {
        let mut asteroids = pool_at(&[Vec3::ZERO]);
        let mut bullets = pool_at(&[
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -5.0),
        ]);

        let hits = resolve_bullet_hits(&mut asteroids, &mut bullets, &RADII);

        assert_eq!(hits, vec![BulletHit { asteroid: 0, bullet: 0 }]);
        assert_eq!(asteroids.active_count(), 0);
        assert_eq!(bullets.active_count(), 3);
        assert!(!bullets.get(0).unwrap().active);
    }

    #[test]
    fn test_spare_bullets_serve_later_asteroids() {
        // Both bullets overlap both asteroids
        let mut asteroids = pool_at(&[Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0)]);
        let mut bullets = pool_at(&[Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 1.0)]);

        let hits = resolve_bullet_hits(&mut asteroids, &mut bullets, &RADII);

        assert_eq!(
            hits,
            vec![
                BulletHit { asteroid: 0, bullet: 0 },
                BulletHit { asteroid: 1, bullet: 1 },
            ]
        );
        assert_eq!(bullets.active_count(), 0);
    }

    #[test]
    fn test_inactive_entities_never_collide() {
        let mut asteroids = pool_at(&[Vec3::ZERO]);
        let mut bullets = pool_at(&[Vec3::ZERO]);
        bullets.deactivate(0);

        assert!(resolve_bullet_hits(&mut asteroids, &mut bullets, &RADII).is_empty());
        assert_eq!(asteroids.active_count(), 1);

        let mut ship = Ship::new();
        ship.deactivate();
        assert_eq!(resolve_ship_hit(&mut ship, &mut asteroids, &RADII), None);
        assert_eq!(asteroids.active_count(), 1);
    }

    #[test]
    fn test_ship_dies_once_and_takes_first_asteroid() {
        let mut asteroids = pool_at(&[Vec3::new(5000.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO]);
        let mut ship = Ship::new();

        let hit = resolve_ship_hit(&mut ship, &mut asteroids, &RADII);

        assert_eq!(hit, Some(1));
        assert!(!ship.active);
        assert_eq!(asteroids.active_count(), 2);
        assert!(asteroids.get(2).unwrap().active);
    }

    #[test]
    fn test_shot_asteroid_cannot_kill_ship_same_tick() {
        let mut asteroids = pool_at(&[Vec3::ZERO]);
        let mut bullets = pool_at(&[Vec3::new(0.0, 0.0, -20.0)]);
        let mut ship = Ship::new();

        let report = resolve(&mut ship, &mut asteroids, &mut bullets, &RADII);

        assert_eq!(report.bullet_hits.len(), 1);
        assert_eq!(report.ship_hit, None);
        assert!(ship.active);
    }
}
