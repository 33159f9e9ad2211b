//! Per-frame simulation step
//!
//! Advances a session by one rendered frame. Given the same seed, the same
//! inputs and the same deltas, the result is identical.

use glam::Vec2;

use super::collision::{player_touches_enemy, projectile_hits_enemy};
use super::player::MoveInput;
use super::state::GameState;
use crate::audio::SoundCue;
use crate::platform::{Action, InputSource};

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveInput,
    /// Fire held this frame (a shot triggers on press)
    pub fire: bool,
    /// Pointer movement since the previous frame
    pub look_delta: Vec2,
}

impl TickInput {
    /// Sample a source, consuming its accumulated look delta
    pub fn from_source<S: InputSource + ?Sized>(source: &mut S) -> Self {
        Self {
            movement: MoveInput {
                forward: source.is_held(Action::MoveForward),
                back: source.is_held(Action::MoveBack),
                strafe_left: source.is_held(Action::StrafeLeft),
                strafe_right: source.is_held(Action::StrafeRight),
            },
            fire: source.is_held(Action::Fire),
            look_delta: source.take_look_delta(),
        }
    }
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_ended() {
        return;
    }

    // Stalls and bad clocks never produce a huge or backwards step
    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.tuning.max_frame_dt)
    } else {
        0.0
    };
    state.time += dt as f64;
    state.run_due_tasks();

    state.player.update(dt, &input.movement, input.look_delta);

    let fire_pressed = input.fire && !state.fire_held;
    state.fire_held = input.fire;
    if fire_pressed {
        state.shoot();
    }

    let target = Some(state.player.position);
    for enemy in &mut state.enemies {
        enemy.update(dt, target, &mut state.rng);
    }

    for projectile in &mut state.projectiles {
        projectile.update(dt);
    }
    state.projectiles.retain(|p| !p.should_remove());

    resolve_projectile_hits(state);
    resolve_player_contacts(state);
    if state.is_ended() {
        return;
    }

    state.enforce_boundary();
}

/// Projectiles against enemies, in id order on both sides
fn resolve_projectile_hits(state: &mut GameState) {
    let mut spent: Vec<u32> = Vec::new();
    let mut killed: Vec<u32> = Vec::new();

    for pi in 0..state.projectiles.len() {
        let projectile = &state.projectiles[pi];
        let Some(ei) = state
            .enemies
            .iter()
            .position(|e| !killed.contains(&e.id) && projectile_hits_enemy(projectile, e))
        else {
            continue;
        };
        let (projectile_id, damage) = (projectile.id, projectile.damage);

        spent.push(projectile_id);
        let dead = state.damage_enemy(ei, damage);
        state.sound(SoundCue::EnemyHit);

        if dead || state.tuning.one_hit_kills {
            killed.push(state.enemies[ei].id);
            state.award_kill();
        }
    }

    if !spent.is_empty() {
        state.projectiles.retain(|p| !spent.contains(&p.id));
    }
    if !killed.is_empty() {
        state.enemies.retain(|e| !killed.contains(&e.id));
    }
}

/// Enemies that reached the player deal their damage and are removed
fn resolve_player_contacts(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemies.len() {
        if !player_touches_enemy(&state.player, &state.enemies[i]) {
            i += 1;
            continue;
        }

        let enemy = state.enemies.remove(i);
        state.hurt_player(enemy.damage);
        if state.is_ended() {
            return;
        }
    }
}
