//! Distance-threshold collision queries
//!
//! Everything in the arena is treated as a sphere around its position. At the
//! entity counts this game runs (tens of enemies, a few dozen projectiles) a
//! plain pairwise scan is enough: projectiles against enemies is O(n·m) per
//! frame and the player against enemies is O(n). There is no broad phase.
//!
//! Absent entities never fault. A `None` position collides with nothing and is
//! infinitely far from everything.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::player::Player;
use super::projectile::Projectile;
use crate::consts::*;

/// Anything with a position in the arena
pub trait Positioned {
    fn position(&self) -> Vec3;
}

impl Positioned for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }
}

/// Distance between two optional positions
///
/// Returns `f32::INFINITY` (unreachable) if either side is missing.
#[inline]
pub fn distance(a: Option<Vec3>, b: Option<Vec3>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => a.distance(b),
        _ => f32::INFINITY,
    }
}

/// Sphere overlap: `distance(a, b) <= radius_a + radius_b`
pub fn overlap(a: Option<Vec3>, b: Option<Vec3>, radius_a: f32, radius_b: f32) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    a.distance(b) <= radius_a + radius_b
}

/// Whether `b` lies within `range` of `a` (unreachable is never in range)
pub fn within_range(a: Option<Vec3>, b: Option<Vec3>, range: f32) -> bool {
    distance(a, b) <= range
}

/// Whether a bare point lies inside a sphere around `target`
pub fn point_within(point: Vec3, target: Option<Vec3>, radius: f32) -> bool {
    within_range(Some(point), target, radius)
}

/// Projectile against enemy, using the fixed {0.1, 0.5} radii
#[inline]
pub fn projectile_hits_enemy(projectile: &Projectile, enemy: &Enemy) -> bool {
    overlap(
        Some(projectile.position),
        Some(enemy.position),
        PROJECTILE_RADIUS,
        ENEMY_RADIUS,
    )
}

/// Player against enemy, using the fixed {0.5, 0.5} radii
#[inline]
pub fn player_touches_enemy(player: &Player, enemy: &Enemy) -> bool {
    overlap(
        Some(player.position),
        Some(enemy.position),
        PLAYER_RADIUS,
        ENEMY_RADIUS,
    )
}

/// Closest candidate to `reference` by linear scan
///
/// Empty input or a missing reference yields `None`. On equal distances the
/// earlier candidate wins.
pub fn nearest<T: Positioned>(reference: Option<Vec3>, candidates: &[T]) -> Option<&T> {
    let reference = reference?;
    let mut best: Option<(&T, f32)> = None;
    for candidate in candidates {
        let d = reference.distance(candidate.position());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((candidate, d)),
        }
    }
    best.map(|(c, _)| c)
}

/// First point where a ray enters a sphere, within `max_distance`
///
/// The direction need not be normalized; a zero direction never hits. An
/// origin already inside the sphere hits at the origin.
pub fn ray_hit_point(
    origin: Vec3,
    direction: Vec3,
    target: Option<Vec3>,
    radius: f32,
    max_distance: f32,
) -> Option<Vec3> {
    let center = target?;
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let to_center = center - origin;
    if to_center.length_squared() <= radius * radius {
        return Some(origin);
    }

    let along = to_center.dot(dir);
    if along < 0.0 {
        return None;
    }
    let miss_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if miss_sq > radius_sq {
        return None;
    }

    let t = along - (radius_sq - miss_sq).sqrt();
    (t <= max_distance).then(|| origin + dir * t)
}

/// Whether a ray reaches a sphere within `max_distance`
pub fn ray_hits(
    origin: Vec3,
    direction: Vec3,
    target: Option<Vec3>,
    radius: f32,
    max_distance: f32,
) -> bool {
    ray_hit_point(origin, direction, target, radius, max_distance).is_some()
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on a point
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Inclusive overlap test on all three axes
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.cmple(b.max).all() && a.max.cmpge(b.min).all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ray_hits_sphere_ahead() {
        let center = Vec3::new(0.0, 0.0, -10.0);
        let point = ray_hit_point(Vec3::ZERO, Vec3::NEG_Z * 3.0, Some(center), 0.5, 100.0)
            .expect("hit");
        assert!((point - Vec3::new(0.0, 0.0, -9.5)).length() < 1e-5);

        assert!(ray_hits(Vec3::ZERO, Vec3::NEG_Z, Some(center), 0.5, 9.6));
        assert!(!ray_hits(Vec3::ZERO, Vec3::NEG_Z, Some(center), 0.5, 9.0));
    }

    #[test]
    fn test_ray_misses() {
        let center = Vec3::new(0.0, 0.0, -10.0);
        // behind, beside, degenerate direction, absent target
        assert!(!ray_hits(Vec3::ZERO, Vec3::Z, Some(center), 0.5, 100.0));
        assert!(!ray_hits(Vec3::X, Vec3::NEG_Z, Some(center), 0.5, 100.0));
        assert!(!ray_hits(Vec3::ZERO, Vec3::ZERO, Some(center), 0.5, 100.0));
        assert!(!ray_hits(Vec3::ZERO, Vec3::NEG_Z, None, 0.5, 100.0));
    }

    #[test]
    fn test_ray_from_inside_hits_at_origin() {
        let origin = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(
            ray_hit_point(origin, Vec3::X, Some(Vec3::ZERO), 0.5, 0.0),
            Some(origin)
        );
    }

    #[test]
    fn test_overlap_touching_counts() {
        let a = Vec3::ZERO;
        let b = Vec3::new(1.0, 0.0, 0.0);
        assert!(overlap(Some(a), Some(b), 0.5, 0.5));
        assert!(!overlap(Some(a), Some(b), 0.4, 0.5));
    }

    #[test]
    fn test_missing_entities_never_collide() {
        assert!(!overlap(None, Some(Vec3::ZERO), 10.0, 10.0));
        assert!(!overlap(Some(Vec3::ZERO), None, 10.0, 10.0));
        assert_eq!(distance(None, Some(Vec3::ZERO)), f32::INFINITY);
        assert!(!within_range(Some(Vec3::ZERO), None, f32::MAX));
        assert!(!point_within(Vec3::ZERO, None, 1.0));
    }

    #[test]
    fn test_nearest_picks_minimum() {
        let candidates = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(-10.0, 0.0, 0.0),
        ];
        let found = nearest(Some(Vec3::ZERO), &candidates);
        assert_eq!(found, Some(&candidates[1]));
    }

    #[test]
    fn test_nearest_empty_or_missing_reference() {
        let empty: [Vec3; 0] = [];
        assert!(nearest(Some(Vec3::ZERO), &empty).is_none());
        assert!(nearest(None, &[Vec3::ONE]).is_none());
    }

    #[test]
    fn test_projectile_and_player_radii() {
        let enemy = Enemy::new(1, None).at(Vec3::new(0.0, 1.0, 0.6));

        // 0.55 apart: inside 0.1 + 0.5
        let projectile = Projectile::new(Vec3::new(0.0, 1.0, 0.05), Vec3::Z);
        assert!(projectile_hits_enemy(&projectile, &enemy));

        // 0.7 apart: outside 0.1 + 0.5, inside 0.5 + 0.5
        let far = Projectile::new(Vec3::new(0.0, 1.0, -0.1), Vec3::Z);
        assert!(!projectile_hits_enemy(&far, &enemy));

        let mut player = Player::default();
        player.position = Vec3::new(0.0, 1.0, -0.1);
        assert!(player_touches_enemy(&player, &enemy));
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_center(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(2.0));
        let c = Aabb::from_center(Vec3::new(2.5, 0.0, 0.0), Vec3::splat(2.0));
        assert!(aabb_overlap(&a, &b)); // faces touch
        assert!(!aabb_overlap(&a, &c));
    }

    fn coord() -> impl Strategy<Value = f32> {
        -100.0f32..100.0
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in coord(), ay in coord(), az in coord(),
            bx in coord(), by in coord(), bz in coord(),
            r1 in 0.0f32..20.0, r2 in 0.0f32..20.0,
        ) {
            let a = Vec3::new(ax, ay, az);
            let b = Vec3::new(bx, by, bz);
            prop_assert_eq!(
                overlap(Some(a), Some(b), r1, r2),
                overlap(Some(b), Some(a), r2, r1)
            );
        }
    }
}
