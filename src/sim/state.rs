//! Session state and the effects the orchestrator applies to it
//!
//! `GameState` owns every mutable collection in a session: the enemy list,
//! the projectile list, ammo, health and progression. Entities only ever
//! mutate their own fields; anything that crosses entities goes through here.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{DAMAGE_FLASH_SECS, Enemy};
use super::player::Player;
use super::progression::Progression;
use super::projectile::Projectile;
use super::scheduler::{DeferredTask, Scheduler};
use crate::audio::SoundCue;
use crate::consts::GROUND_HEIGHT;
use crate::tuning::Tuning;
use crate::ui::{UiEvent, sky_color};

/// Undrained events kept before the oldest are discarded
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Running,
    /// Player health hit zero; terminal until restart
    Ended,
}

/// Output of a frame for the presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    Ui(UiEvent),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this session was started from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: SessionPhase,
    /// Session clock (seconds of simulated time)
    pub time: f64,
    pub health: i32,
    pub ammo: u32,
    pub player: Player,
    /// Live enemies (ascending id)
    pub enemies: Vec<Enemy>,
    /// Live projectiles (ascending id)
    pub projectiles: Vec<Projectile>,
    pub progression: Progression,
    pub scheduler: Scheduler,
    pub tuning: Tuning,
    /// Player was clamped to the map edge last frame
    pub boundary_clamped: bool,
    /// Proximity warning currently shown
    pub boundary_warning: bool,
    /// Fire was held last frame (shots trigger on press)
    pub(crate) fire_held: bool,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the stock balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut player = Player::default();
        player.speed = tuning.player_speed;
        player.normalize_diagonal = tuning.normalize_diagonal;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Running,
            time: 0.0,
            health: tuning.start_health,
            ammo: tuning.max_ammo,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            progression: Progression::new(),
            scheduler: Scheduler::new(),
            tuning,
            boundary_clamped: false,
            boundary_warning: false,
            fire_held: false,
            events: Vec::new(),
            next_id: 1,
        };

        state.schedule_opening_spawns();
        state.publish_hud();
        log::info!("Session started with seed {}", seed);
        state
    }

    /// Start over with a fresh session, keeping the tuning
    ///
    /// The new seed is drawn from this session's RNG, so a chain of restarts
    /// is still reproducible from the first seed.
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        let tuning = self.tuning.clone();
        let sensitivity = self.player.mouse_sensitivity();
        *self = Self::with_tuning(seed, tuning);
        self.player.set_mouse_sensitivity(sensitivity);
    }

    fn schedule_opening_spawns(&mut self) {
        for i in 0..self.tuning.initial_enemies {
            let delay = i as f32 * self.tuning.initial_spawn_spacing;
            self.scheduler.schedule(self.time, delay, DeferredTask::InitialSpawn);
        }
        self.scheduler
            .schedule(self.time, self.tuning.first_regular_spawn, DeferredTask::Spawn);
    }

    /// Push the full HUD state (session start)
    fn publish_hud(&mut self) {
        self.ui(UiEvent::ScoreChanged(self.progression.score()));
        self.ui(UiEvent::HealthChanged(self.health));
        self.ui(UiEvent::AmmoChanged(self.ammo));
        self.publish_level();
    }

    fn publish_level(&mut self) {
        self.ui(UiEvent::LevelChanged {
            level: self.progression.current_level(),
            progress: self.progression.progress_to_next_level(),
        });
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn score(&self) -> u64 {
        self.progression.score()
    }

    pub fn level(&self) -> u32 {
        self.progression.current_level()
    }

    /// Eye position and look-at point for the renderer
    pub fn camera(&self) -> (Vec3, Vec3) {
        let eye = self.player.eye_position();
        (eye, eye + self.player.look_direction())
    }

    // === Events ===

    pub fn sound(&mut self, cue: SoundCue) {
        self.emit(GameEvent::Sound(cue));
    }

    pub fn ui(&mut self, event: UiEvent) {
        self.emit(GameEvent::Ui(event));
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..dropped);
            log::warn!("Event buffer full, dropped {} undrained events", dropped);
        }
        self.events.push(event);
    }

    fn message(&mut self, text: impl Into<String>, duration: f32) {
        self.ui(UiEvent::Message {
            text: text.into(),
            duration,
        });
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the pending events
    ///
    /// Hosts driving `tick` directly should drain once per frame; only the
    /// newest [`MAX_PENDING_EVENTS`] are kept otherwise.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Weapon ===

    /// Fire one projectile from the eye along the look direction
    ///
    /// Returns whether a shot was fired. An empty magazine only plays the
    /// empty cue; the magazine that just emptied schedules its own reload.
    pub fn shoot(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        if self.ammo == 0 {
            self.sound(SoundCue::EmptyAmmo);
            return false;
        }

        self.ammo -= 1;
        self.ui(UiEvent::AmmoChanged(self.ammo));

        let id = self.next_entity_id();
        let projectile =
            Projectile::new(self.player.eye_position(), self.player.look_direction()).with_id(id);
        self.projectiles.push(projectile);
        self.sound(SoundCue::Shoot);

        if self.ammo == 0 && !self.scheduler.contains(DeferredTask::Reload) {
            self.scheduler
                .schedule(self.time, self.tuning.reload_delay, DeferredTask::Reload);
            self.ui(UiEvent::Reloading);
        }
        true
    }

    // === Deferred tasks ===

    /// Run every task due at the current session time
    pub fn run_due_tasks(&mut self) {
        while let Some(task) = self.scheduler.pop_due(self.time) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: DeferredTask) {
        // Nothing scheduled may act on a finished session
        if self.is_ended() {
            return;
        }

        match task {
            DeferredTask::InitialSpawn => self.spawn_enemy(),
            DeferredTask::Spawn => {
                let level = self.progression.current_descriptor();
                let (max_enemies, interval) = (level.max_enemies, level.spawn_interval);
                if self.enemies.len() >= max_enemies {
                    self.scheduler
                        .schedule(self.time, self.tuning.spawn_retry_delay, DeferredTask::Spawn);
                    return;
                }
                self.spawn_enemy();
                let jitter = self.rng.random::<f32>() * self.tuning.spawn_jitter;
                self.scheduler
                    .schedule(self.time, interval + jitter, DeferredTask::Spawn);
            }
            DeferredTask::Reload => {
                self.ammo = self.tuning.max_ammo;
                self.ui(UiEvent::AmmoChanged(self.ammo));
                log::debug!("Reloaded to {}", self.ammo);
            }
            DeferredTask::RevertFlash { enemy_id } => {
                if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == enemy_id) {
                    enemy.clear_flash();
                }
            }
        }
    }

    /// Spawn one enemy for the current level on the spawn ring
    pub fn spawn_enemy(&mut self) {
        let id = self.next_entity_id();
        let angle = self.rng.random::<f32>() * TAU;
        let (min_r, max_r) = (self.tuning.spawn_min_radius, self.tuning.spawn_max_radius);
        let radius = min_r + self.rng.random::<f32>() * (max_r - min_r);
        let position = Vec3::new(angle.cos() * radius, GROUND_HEIGHT, angle.sin() * radius);

        let enemy = Enemy::new(id, Some(self.progression.current_descriptor())).at(position);
        log::debug!(
            "Spawned enemy {} at ({:.1}, {:.1}) level {}",
            id,
            position.x,
            position.z,
            self.progression.current_level()
        );
        self.enemies.push(enemy);
    }

    // === Damage and score ===

    /// Damage the enemy at `index`; returns whether it died
    pub(crate) fn damage_enemy(&mut self, index: usize, amount: i32) -> bool {
        let enemy = &mut self.enemies[index];
        let dead = enemy.take_damage(amount);
        let enemy_id = enemy.id;
        self.scheduler
            .schedule(self.time, DAMAGE_FLASH_SECS, DeferredTask::RevertFlash { enemy_id });
        dead
    }

    /// Score a kill and apply any level-up it causes
    pub(crate) fn award_kill(&mut self) {
        let level_up = self.progression.add_score(self.tuning.kill_score);
        self.ui(UiEvent::ScoreChanged(self.progression.score()));
        if let Some(level) = level_up {
            self.sound(SoundCue::LevelUp);
            self.message(format!("LEVEL {} REACHED!", level), 3.0);
            self.ui(UiEvent::LevelUp {
                level,
                sky_color: sky_color(level),
            });
        }
        self.publish_level();
    }

    /// Contact damage to the player; ends the session at zero health
    pub(crate) fn hurt_player(&mut self, amount: i32) {
        self.health -= amount;
        self.ui(UiEvent::HealthChanged(self.health));
        self.ui(UiEvent::DamageTaken { amount });
        self.sound(SoundCue::PlayerHit);

        if self.health <= 0 {
            self.end_session();
        }
    }

    fn end_session(&mut self) {
        self.phase = SessionPhase::Ended;
        self.scheduler.clear();
        let final_score = self.progression.score();
        self.ui(UiEvent::GameOver { final_score });
        log::info!(
            "Session ended at {:.1}s: score {} level {}",
            self.time,
            final_score,
            self.progression.current_level()
        );
    }

    /// End the session from outside the frame loop (host shutdown)
    pub fn end(&mut self) {
        if !self.is_ended() {
            self.end_session();
        }
    }

    // === Arena ===

    /// Clamp the player to the map and update the edge warnings
    pub fn enforce_boundary(&mut self) {
        let limit = self.tuning.map_half_extent;
        let position = &mut self.player.position;
        let x = position.x.clamp(-limit, limit);
        let z = position.z.clamp(-limit, limit);
        let clamped = x != position.x || z != position.z;
        position.x = x;
        position.z = z;
        position.y = GROUND_HEIGHT;

        if clamped && !self.boundary_clamped {
            self.message("Map Boundary Reached!", 1.0);
        }
        self.boundary_clamped = clamped;

        let warn_at = limit - self.tuning.boundary_warning_margin;
        let near = x.abs() > warn_at || z.abs() > warn_at;
        if near != self.boundary_warning {
            self.boundary_warning = near;
            self.ui(UiEvent::BoundaryWarning(near));
        }
    }
}
