//! Data-driven game balance
//!
//! Everything a designer might want to tweak without touching simulation code.
//! Defaults reproduce the stock game; a JSON file can override any subset.
//! Collision radii and the enemy behavior ranges are deliberately not here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::ConfigError;

/// Session balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Frame deltas are clamped to [0, max_frame_dt]
    pub max_frame_dt: f32,

    // === Player ===
    pub player_speed: f32,
    pub start_health: i32,
    /// Cap diagonal movement to nominal speed
    pub normalize_diagonal: bool,

    // === Weapon ===
    pub max_ammo: u32,
    /// Seconds from emptying the magazine to a full refill
    pub reload_delay: f32,
    /// Remove an enemy on any projectile hit, regardless of its health
    pub one_hit_kills: bool,
    pub kill_score: u64,

    // === Spawning ===
    /// Spawns scheduled at session start, ignoring the enemy cap
    pub initial_enemies: u32,
    /// Seconds between the opening spawns
    pub initial_spawn_spacing: f32,
    /// Seconds before the regular spawner first runs
    pub first_regular_spawn: f32,
    /// Seconds to wait when the enemy cap is reached
    pub spawn_retry_delay: f32,
    /// Random extra delay added to each regular spawn (0..jitter)
    pub spawn_jitter: f32,
    pub spawn_min_radius: f32,
    pub spawn_max_radius: f32,

    // === Arena ===
    pub map_half_extent: f32,
    pub boundary_warning_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,
            player_speed: PLAYER_SPEED,
            start_health: PLAYER_START_HEALTH,
            normalize_diagonal: false,
            max_ammo: MAX_AMMO,
            reload_delay: RELOAD_DELAY,
            one_hit_kills: true,
            kill_score: KILL_SCORE,
            initial_enemies: 3,
            initial_spawn_spacing: 0.5,
            first_regular_spawn: 2.0,
            spawn_retry_delay: 1.0,
            spawn_jitter: 0.5,
            spawn_min_radius: SPAWN_MIN_RADIUS,
            spawn_max_radius: SPAWN_MAX_RADIUS,
            map_half_extent: MAP_HALF_EXTENT,
            boundary_warning_margin: BOUNDARY_WARNING_MARGIN,
        }
    }
}

/// Shortest delay a self-rescheduling task may use
const MIN_RETRY_DELAY: f32 = 0.05;

/// Finite and non-negative, else `fallback`
fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

impl Tuning {
    /// Force every field into a range the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let stock = Self::default();

        self.max_frame_dt = non_negative(self.max_frame_dt, stock.max_frame_dt);
        self.player_speed = non_negative(self.player_speed, stock.player_speed);
        self.reload_delay = non_negative(self.reload_delay, stock.reload_delay);

        self.initial_spawn_spacing =
            non_negative(self.initial_spawn_spacing, stock.initial_spawn_spacing);
        self.first_regular_spawn =
            non_negative(self.first_regular_spawn, stock.first_regular_spawn);
        self.spawn_retry_delay = non_negative(self.spawn_retry_delay, stock.spawn_retry_delay)
            .max(MIN_RETRY_DELAY);
        self.spawn_jitter = non_negative(self.spawn_jitter, stock.spawn_jitter);

        let min_r = non_negative(self.spawn_min_radius, stock.spawn_min_radius);
        let max_r = non_negative(self.spawn_max_radius, stock.spawn_max_radius);
        self.spawn_min_radius = min_r.min(max_r);
        self.spawn_max_radius = min_r.max(max_r);

        self.map_half_extent = non_negative(self.map_half_extent, stock.map_half_extent);
        self.boundary_warning_margin =
            non_negative(self.boundary_warning_margin, stock.boundary_warning_margin)
                .min(self.map_half_extent);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning, falling back to the stock balance on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({})", e);
                Self::default()
            }
        }
    }
}
