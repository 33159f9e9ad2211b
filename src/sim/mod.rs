//! Frame simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Seeded RNG only (same seed + same inputs = same session)
//! - Stable iteration order (by entity ID)
//! - Deferred effects go through the scheduler, never through wall-clock timers

pub mod actor;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use actor::Actor;
pub use collision::{
    Aabb, Positioned, aabb_overlap, distance, nearest, overlap, player_touches_enemy,
    point_within, projectile_hits_enemy, ray_hit_point, ray_hits, within_range,
};
pub use enemy::{ATTACK_RANGE, BehaviorState, DETECTION_RANGE, Enemy};
pub use player::{MoveInput, Player};
pub use progression::{LevelDescriptor, Progression, generate_fibonacci, generate_levels};
pub use projectile::Projectile;
pub use scheduler::{DeferredTask, Scheduler};
pub use state::{GameEvent, GameState, MAX_PENDING_EVENTS, SessionPhase};
pub use tick::{TickInput, tick};
