//! Platform input layer
//!
//! Hosts translate raw key, button and pointer events into an
//! [`InputState`]; the frame loop samples it through [`InputSource`] once per
//! frame. Look deltas accumulate between frames and are consumed on read.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    Fire,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::Fire,
    ];

    /// Default key binding; accepts both key names ("w") and codes ("KeyW")
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.strip_prefix("Key").unwrap_or(key);
        match key.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Action::MoveForward),
            "s" | "arrowdown" => Some(Action::MoveBack),
            "a" | "arrowleft" => Some(Action::StrafeLeft),
            "d" | "arrowright" => Some(Action::StrafeRight),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Action::MoveForward => 0,
            Action::MoveBack => 1,
            Action::StrafeLeft => 2,
            Action::StrafeRight => 3,
            Action::Fire => 4,
        }
    }
}

/// What the frame loop reads each frame
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;

    /// Pointer movement since the last call; resets the accumulator
    fn take_look_delta(&mut self) -> Vec2;
}

/// Held actions plus accumulated pointer movement
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [bool; 5],
    look_delta: Vec2,
    pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held[action.index()] = true;
    }

    pub fn release(&mut self, action: Action) {
        self.held[action.index()] = false;
    }

    /// Returns false for unbound keys
    pub fn key_down(&mut self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(action) => {
                self.press(action);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(action) => {
                self.release(action);
                true
            }
            None => false,
        }
    }

    /// Primary button fires while the pointer is captured
    ///
    /// Returns true when the click should instead request pointer capture.
    pub fn mouse_down(&mut self, button: u8) -> bool {
        if button != 0 {
            return false;
        }
        if !self.pointer_locked {
            return true;
        }
        self.press(Action::Fire);
        false
    }

    pub fn mouse_up(&mut self, button: u8) {
        if button == 0 {
            self.release(Action::Fire);
        }
    }

    /// Relative pointer movement; ignored unless the pointer is captured
    pub fn add_look_delta(&mut self, dx: f32, dy: f32) {
        if self.pointer_locked {
            self.look_delta += Vec2::new(dx, dy);
        }
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked {
            self.release(Action::Fire);
            self.look_delta = Vec2::ZERO;
        }
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Drop every held action and pending delta (focus loss, restart)
    pub fn reset(&mut self) {
        self.held = [false; 5];
        self.look_delta = Vec2::ZERO;
    }
}

impl InputSource for InputState {
    fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }
}

/// Shared with the host's event handlers
impl<T: InputSource> InputSource for Rc<RefCell<T>> {
    fn is_held(&self, action: Action) -> bool {
        self.borrow().is_held(action)
    }

    fn take_look_delta(&mut self) -> Vec2 {
        self.borrow_mut().take_look_delta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key("w"), Some(Action::MoveForward));
        assert_eq!(Action::from_key("KeyS"), Some(Action::MoveBack));
        assert_eq!(Action::from_key("A"), Some(Action::StrafeLeft));
        assert_eq!(Action::from_key("ArrowRight"), Some(Action::StrafeRight));
        assert_eq!(Action::from_key("Space"), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        assert!(input.key_down("KeyW"));
        assert!(input.is_held(Action::MoveForward));
        assert!(!input.key_down("q"));
        input.key_up("w");
        assert!(!input.is_held(Action::MoveForward));
    }

    #[test]
    fn test_look_delta_needs_lock_and_resets_on_read() {
        let mut input = InputState::new();
        input.add_look_delta(10.0, 5.0);
        assert_eq!(input.take_look_delta(), Vec2::ZERO);

        input.set_pointer_locked(true);
        input.add_look_delta(10.0, 5.0);
        input.add_look_delta(-4.0, 1.0);
        assert_eq!(input.take_look_delta(), Vec2::new(6.0, 6.0));
        assert_eq!(input.take_look_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_click_requests_lock_before_firing() {
        let mut input = InputState::new();
        assert!(input.mouse_down(0));
        assert!(!input.is_held(Action::Fire));

        input.set_pointer_locked(true);
        assert!(!input.mouse_down(0));
        assert!(input.is_held(Action::Fire));

        input.set_pointer_locked(false);
        assert!(!input.is_held(Action::Fire));
    }
}
