//! Arena Shooter - simulation core for a first-person arena shooter
//!
//! Core modules:
//! - `sim`: Frame simulation (entities, collisions, enemy AI, progression)
//! - `session`: Binds a simulation to its input/audio/UI collaborators
//! - `platform`: Input source abstraction
//! - `audio` / `ui`: Event sinks for the excluded presentation layers
//! - `settings` / `tuning`: Player preferences and data-driven game balance

pub mod audio;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use session::Session;
pub use settings::{ConfigError, Settings};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation will integrate (30 FPS floor)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Height actors are pinned to
    pub const GROUND_HEIGHT: f32 = 1.0;
    /// Camera/muzzle height above the player's position
    pub const EYE_HEIGHT: f32 = 1.7;

    /// Half extent of the square playable map (map is 160x160)
    pub const MAP_HALF_EXTENT: f32 = 80.0;
    /// Distance from the map edge where the proximity warning turns on
    pub const BOUNDARY_WARNING_MARGIN: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 15.0;
    pub const PLAYER_START_HEALTH: i32 = 100;
    pub const MOUSE_SENSITIVITY: f32 = 0.005;
    pub const MIN_MOUSE_SENSITIVITY: f32 = 0.001;
    pub const MAX_MOUSE_SENSITIVITY: f32 = 0.01;
    /// Pitch limit (radians, ~81.8 degrees)
    pub const MAX_PITCH: f32 = std::f32::consts::PI / 2.2;

    /// Ammo
    pub const MAX_AMMO: u32 = 30;
    pub const RELOAD_DELAY: f32 = 1.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 50.0;
    pub const PROJECTILE_LIFETIME: f32 = 3.0;
    pub const PROJECTILE_DAMAGE: i32 = 50;

    /// Collision radii (fixed policy, not configurable per call)
    pub const DEFAULT_RADIUS: f32 = 0.5;
    pub const PROJECTILE_RADIUS: f32 = 0.1;
    pub const ENEMY_RADIUS: f32 = 0.5;
    pub const PLAYER_RADIUS: f32 = 0.5;

    /// Points awarded per enemy destroyed by a projectile
    pub const KILL_SCORE: u64 = 10;

    /// Enemy spawn ring around the arena center
    pub const SPAWN_MIN_RADIUS: f32 = 20.0;
    pub const SPAWN_MAX_RADIUS: f32 = 50.0;
}

/// Horizontal (XZ-plane) component of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw of a direction around +Y, measured from +Z toward +X
#[inline]
pub fn yaw_of(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Unit direction from yaw (see [`yaw_of`]) and pitch (positive looks up)
#[inline]
pub fn direction_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
    let horizontal_len = pitch.cos();
    Vec3::new(
        yaw.sin() * horizontal_len,
        pitch.sin(),
        yaw.cos() * horizontal_len,
    )
    .normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_yaw_round_trip() {
        let dir = direction_from_yaw_pitch(FRAC_PI_2, 0.0);
        assert!((dir - Vec3::X).length() < 1e-5);
        assert!((yaw_of(dir) - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_drops_height() {
        assert_eq!(horizontal(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
    }
}
