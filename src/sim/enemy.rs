//! Enemy actors and their Patrol/Chase/Attack behavior
//!
//! The behavior state is re-derived from scratch every update from the
//! distance to the player. There is no hysteresis, so an enemy can swap
//! between any two states across a single frame boundary.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::collision::{Positioned, distance};
use super::progression::LevelDescriptor;
use crate::consts::GROUND_HEIGHT;
use crate::horizontal;

/// Within this distance the enemy stops and attacks
pub const ATTACK_RANGE: f32 = 2.0;
/// Within this distance the enemy chases the player
pub const DETECTION_RANGE: f32 = 15.0;
/// Seconds between patrol direction changes
pub const PATROL_RETARGET_SECS: f32 = 3.0;
/// Patrol speed as a fraction of nominal speed
pub const PATROL_SPEED_FACTOR: f32 = 0.5;
/// Patrolling enemies are kept within this horizontal radius of the origin
pub const PATROL_LEASH_RADIUS: f32 = 50.0;
/// How long the damage flash lasts before reverting
pub const DAMAGE_FLASH_SECS: f32 = 0.1;
/// Tint shown while flashing
pub const DAMAGE_FLASH_COLOR: u32 = 0xff6666;

/// Stats used when no level descriptor is supplied
pub const BASE_SPEED: f32 = 3.0;
pub const BASE_HEALTH: i32 = 80;
pub const BASE_DAMAGE: i32 = 25;
pub const BASE_COLOR: u32 = 0xff0000;

/// Enemy decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Wander in a random horizontal direction
    #[default]
    Patrol,
    /// Move straight at the player
    Chase,
    /// Hold position; contact damage is applied by collision handling
    Attack,
}

impl BehaviorState {
    /// Pick the state for a given distance to the player
    pub fn for_distance(distance: f32) -> Self {
        if distance <= ATTACK_RANGE {
            BehaviorState::Attack
        } else if distance <= DETECTION_RANGE {
            BehaviorState::Chase
        } else {
            BehaviorState::Patrol
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec3,
    /// Unit facing direction
    pub facing: Vec3,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub damage: i32,
    /// Base tint (0xRRGGBB)
    pub color: u32,
    pub behavior: BehaviorState,
    pub patrol_direction: Option<Vec3>,
    pub patrol_timer: f32,
    /// Damage flash active (cleared by a deferred task)
    pub flashing: bool,
}

impl Enemy {
    /// Create an enemy, scaled by `level` when given
    pub fn new(id: u32, level: Option<&LevelDescriptor>) -> Self {
        let (speed, health, damage, color) = match level {
            Some(level) => (
                level.enemy_speed,
                level.enemy_health,
                level.enemy_damage,
                level.color,
            ),
            None => (BASE_SPEED, BASE_HEALTH, BASE_DAMAGE, BASE_COLOR),
        };
        Self {
            id,
            position: Vec3::new(0.0, GROUND_HEIGHT, 0.0),
            facing: Vec3::Z,
            health,
            max_health: health,
            speed,
            damage,
            color,
            behavior: BehaviorState::Patrol,
            patrol_direction: None,
            patrol_timer: 0.0,
            flashing: false,
        }
    }

    /// Place the enemy (builder style)
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Run one frame of behavior against the player's position
    ///
    /// A missing target is treated as out of range, so the enemy patrols.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, target: Option<Vec3>, rng: &mut R) {
        let to_target = distance(Some(self.position), target);
        self.behavior = BehaviorState::for_distance(to_target);

        match (self.behavior, target) {
            (BehaviorState::Attack, _) => {}
            (BehaviorState::Chase, Some(target)) => self.chase(dt, target),
            _ => self.patrol(dt, rng),
        }
    }

    fn chase(&mut self, dt: f32, target: Vec3) {
        let direction = (target - self.position).normalize_or_zero();
        self.position += direction * self.speed * dt;
        self.pin_to_ground();
        self.face(target);
    }

    fn patrol<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        if self.patrol_direction.is_none() {
            self.patrol_direction = Some(random_horizontal_direction(rng));
            self.patrol_timer = 0.0;
        }

        self.patrol_timer += dt;
        if self.patrol_timer > PATROL_RETARGET_SECS {
            self.patrol_direction = Some(random_horizontal_direction(rng));
            self.patrol_timer = 0.0;
        }

        let direction = self.patrol_direction.unwrap_or(Vec3::ZERO);
        self.position += direction * self.speed * PATROL_SPEED_FACTOR * dt;
        self.pin_to_ground();
        if direction != Vec3::ZERO {
            self.facing = direction;
        }

        // Arena leash: rescale the horizontal offset back onto the circle
        let flat = horizontal(self.position);
        let reach = flat.length();
        if reach > PATROL_LEASH_RADIUS {
            let clamped = flat * (PATROL_LEASH_RADIUS / reach);
            self.position.x = clamped.x;
            self.position.z = clamped.z;
        }
    }

    /// Turn to face a point on the ground plane
    pub fn face(&mut self, target: Vec3) {
        let flat = horizontal(target - self.position).normalize_or_zero();
        if flat != Vec3::ZERO {
            self.facing = flat;
        }
    }

    /// Subtract health (no floor) and start the damage flash
    ///
    /// Returns whether the enemy is now dead.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.flashing = true;
        self.is_dead()
    }

    /// End the damage flash
    pub fn clear_flash(&mut self) {
        self.flashing = false;
    }

    /// Tint to draw this frame
    pub fn display_color(&self) -> u32 {
        if self.flashing {
            DAMAGE_FLASH_COLOR
        } else {
            self.color
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Uniform random unit vector in the horizontal plane
fn random_horizontal_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = rng.random_range(0.0..TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

impl Positioned for Enemy {
    fn position(&self) -> Vec3 {
        self.position
    }
}

impl Actor for Enemy {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn facing(&self) -> Vec3 {
        self.facing
    }

    fn speed(&self) -> f32 {
        self.speed
    }
}
