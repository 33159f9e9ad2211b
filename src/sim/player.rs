//! Player movement and mouse look

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::collision::Positioned;
use crate::consts::*;
use crate::{direction_from_yaw_pitch, yaw_of};

/// Held movement actions for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
}

impl MoveInput {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.strafe_left || self.strafe_right
    }
}

/// The player's body and view direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Unit look direction (movement follows it)
    pub direction: Vec3,
    pub speed: f32,
    mouse_sensitivity: f32,
    /// Cap combined movement to nominal speed instead of summing inputs
    pub normalize_diagonal: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, GROUND_HEIGHT, 0.0),
            direction: Vec3::NEG_Z,
            speed: PLAYER_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            normalize_diagonal: false,
        }
    }
}

impl Player {
    /// Integrate movement, apply look, then pin to the ground
    pub fn update(&mut self, dt: f32, input: &MoveInput, look_delta: Vec2) {
        self.handle_movement(dt, input);
        self.handle_look(look_delta);
        self.pin_to_ground();
    }

    fn handle_movement(&mut self, dt: f32, input: &MoveInput) {
        let step = self.speed * dt;
        let right = self.direction.cross(Vec3::Y).normalize_or_zero();

        let mut movement = Vec3::ZERO;
        if input.forward {
            movement += self.direction * step;
        }
        if input.back {
            movement -= self.direction * step;
        }
        if input.strafe_left {
            movement -= right * step;
        }
        if input.strafe_right {
            movement += right * step;
        }

        // Held inputs sum, so diagonals run ~1.41x faster unless capped
        if self.normalize_diagonal && movement.length() > step.abs() {
            movement = movement.normalize_or_zero() * step.abs();
        }

        self.position += movement;
    }

    fn handle_look(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }

        let yaw_rotation = Quat::from_rotation_y(-delta.x * self.mouse_sensitivity);
        let turned = yaw_rotation * self.direction;

        let pitch = turned.y.clamp(-1.0, 1.0).asin() - delta.y * self.mouse_sensitivity;
        let pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);

        self.direction = direction_from_yaw_pitch(yaw_of(turned), pitch);
    }

    /// Camera and muzzle position
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Y * EYE_HEIGHT
    }

    pub fn look_direction(&self) -> Vec3 {
        self.direction
    }

    /// Current pitch (positive looks up)
    pub fn pitch(&self) -> f32 {
        self.direction.y.clamp(-1.0, 1.0).asin()
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity = sensitivity.clamp(MIN_MOUSE_SENSITIVITY, MAX_MOUSE_SENSITIVITY);
    }
}

impl Positioned for Player {
    fn position(&self) -> Vec3 {
        self.position
    }
}

impl Actor for Player {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn facing(&self) -> Vec3 {
        self.direction
    }

    fn speed(&self) -> f32 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    #[test]
    fn test_forward_moves_along_look() {
        let mut player = Player::default();
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        assert!((player.position.z - (-PLAYER_SPEED * DT)).abs() < 1e-5);
        assert_eq!(player.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn test_strafe_right_is_positive_x() {
        let mut player = Player::default();
        let input = MoveInput {
            strafe_right: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        assert!((player.position.x - PLAYER_SPEED * DT).abs() < 1e-5);
    }

    #[test]
    fn test_opposite_inputs_cancel() {
        let mut player = Player::default();
        let input = MoveInput {
            forward: true,
            back: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        assert!(player.position.z.abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_sums_by_default() {
        let mut player = Player::default();
        let input = MoveInput {
            forward: true,
            strafe_right: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        let moved = (player.position - Vec3::new(0.0, GROUND_HEIGHT, 0.0)).length();
        assert!((moved - PLAYER_SPEED * DT * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_diagonal_capped_when_normalized() {
        let mut player = Player {
            normalize_diagonal: true,
            ..Default::default()
        };
        let input = MoveInput {
            forward: true,
            strafe_left: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        let moved = (player.position - Vec3::new(0.0, GROUND_HEIGHT, 0.0)).length();
        assert!((moved - PLAYER_SPEED * DT).abs() < 1e-4);
    }

    #[test]
    fn test_look_yaw_keeps_level_unit_direction() {
        let mut player = Player::default();
        player.update(DT, &MoveInput::default(), Vec2::new(100.0, 0.0));
        assert!((player.direction.length() - 1.0).abs() < 1e-5);
        assert!(player.direction.y.abs() < 1e-5);
        // 0.5 rad turn from -Z
        let turned = yaw_of(player.direction) - yaw_of(Vec3::NEG_Z);
        assert!((wrap(turned).abs() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_look_turns_strafe_axis() {
        let mut player = Player::default();
        // quarter turn: forward is now along the X axis
        let quarter = std::f32::consts::FRAC_PI_2 / MOUSE_SENSITIVITY;
        player.update(DT, &MoveInput::default(), Vec2::new(quarter, 0.0));
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        assert!(player.position.x.abs() > PLAYER_SPEED * DT * 0.99);
        assert!(player.position.z.abs() < 1e-4);
    }

    fn wrap(angle: f32) -> f32 {
        use std::f32::consts::{PI, TAU};
        (angle + PI).rem_euclid(TAU) - PI
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut player = Player::default();
        player.update(DT, &MoveInput::default(), Vec2::new(0.0, -100_000.0));
        assert!((player.pitch() - MAX_PITCH).abs() < 1e-4);
        assert!((player.direction.length() - 1.0).abs() < 1e-5);

        player.update(DT, &MoveInput::default(), Vec2::new(0.0, 100_000.0));
        assert!((player.pitch() + MAX_PITCH).abs() < 1e-4);
    }

    #[test]
    fn test_height_pinned_when_looking_up() {
        let mut player = Player::default();
        player.update(DT, &MoveInput::default(), Vec2::new(0.0, -200.0));
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        player.update(DT, &input, Vec2::ZERO);
        assert_eq!(player.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn test_sensitivity_clamped() {
        let mut player = Player::default();
        player.set_mouse_sensitivity(1.0);
        assert_eq!(player.mouse_sensitivity(), MAX_MOUSE_SENSITIVITY);
        player.set_mouse_sensitivity(0.0);
        assert_eq!(player.mouse_sensitivity(), MIN_MOUSE_SENSITIVITY);
    }

    #[test]
    fn test_eye_position() {
        let player = Player::default();
        assert_eq!(player.eye_position().y, GROUND_HEIGHT + EYE_HEIGHT);
    }
}
