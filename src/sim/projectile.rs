//! Projectiles fired by the player

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Positioned;
use crate::consts::*;

/// A self-propelled projectile with a fixed lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
    /// Unit direction, or zero for a degenerate (stationary) shot
    pub direction: Vec3,
    pub speed: f32,
    /// Seconds since spawn
    pub age: f32,
    pub lifetime: f32,
    pub damage: i32,
}

impl Projectile {
    pub fn new(start: Vec3, direction: Vec3) -> Self {
        Self {
            id: 0,
            position: start,
            direction: direction.normalize_or_zero(),
            speed: PROJECTILE_SPEED,
            age: 0.0,
            lifetime: PROJECTILE_LIFETIME,
            damage: PROJECTILE_DAMAGE,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Advance age and position. Negative `dt` runs both backward.
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        self.position += self.direction * self.speed * dt;
    }

    pub fn should_remove(&self) -> bool {
        self.age >= self.lifetime
    }
}

impl Positioned for Projectile {
    fn position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_direction_is_normalized() {
        let p = Projectile::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!((p.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_direction_is_stationary() {
        let mut p = Projectile::new(Vec3::ONE, Vec3::ZERO);
        p.update(0.5);
        assert_eq!(p.position, Vec3::ONE);
        assert_eq!(p.age, 0.5);
    }

    #[test]
    fn test_moves_along_direction() {
        let mut p = Projectile::new(Vec3::ZERO, Vec3::X);
        p.update(0.1);
        assert!((p.position.x - PROJECTILE_SPEED * 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_removal_at_lifetime_boundary() {
        let mut p = Projectile::new(Vec3::ZERO, Vec3::X);
        p.age = p.lifetime;
        assert!(p.should_remove());

        p.age = p.lifetime - 1e-4;
        assert!(!p.should_remove());
    }

    #[test]
    fn test_negative_dt_runs_backward() {
        let mut p = Projectile::new(Vec3::ZERO, Vec3::X);
        p.update(0.2);
        p.update(-0.2);
        assert!(p.age.abs() < 1e-6);
        assert!(p.position.length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_age_accumulates_dt_exactly(start in 0.0f32..10.0, dt in 0.0f32..1.0) {
            let mut p = Projectile::new(Vec3::ZERO, Vec3::Z);
            p.age = start;
            p.update(dt);
            prop_assert_eq!(p.age, start + dt);
        }
    }
}
