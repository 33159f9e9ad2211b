//! Shared motion contract for the player and enemies

use glam::Vec3;

use super::collision::Positioned;
use crate::consts::GROUND_HEIGHT;
use crate::yaw_of;

/// A simulated body that moves on the ground plane and faces somewhere
///
/// Player and Enemy share this shape; they differ in what drives them
/// (input vs. behavior FSM) and in whether they carry health.
pub trait Actor: Positioned {
    fn set_position(&mut self, position: Vec3);

    /// Unit facing direction
    fn facing(&self) -> Vec3;

    /// Nominal movement speed (units/s)
    fn speed(&self) -> f32;

    /// Heading around +Y, for renderers
    fn yaw(&self) -> f32 {
        yaw_of(self.facing())
    }

    /// Snap the actor back onto the ground plane
    fn pin_to_ground(&mut self) {
        let mut p = self.position();
        p.y = GROUND_HEIGHT;
        self.set_position(p);
    }
}
