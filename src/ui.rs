//! HUD updates and transient messages emitted by the simulation
//!
//! Like audio, presentation lives outside the core. The simulation describes
//! what changed and a [`UiSink`] decides how to show it.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Something the HUD should reflect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    ScoreChanged(u64),
    HealthChanged(i32),
    AmmoChanged(u32),
    /// Level number and progress toward the next one (0-1)
    LevelChanged { level: u32, progress: f32 },
    /// New level reached; `sky_color` is the backdrop tint for it
    LevelUp { level: u32, sky_color: u32 },
    /// Transient centered message
    Message { text: String, duration: f32 },
    /// Player is near the map edge (on/off)
    BoundaryWarning(bool),
    /// Player took contact damage (screen flash)
    DamageTaken { amount: i32 },
    /// Magazine emptied, reload in progress
    Reloading,
    /// Session over
    GameOver { final_score: u64 },
}

/// Backdrop tint per level; levels past the end reuse the last entry
pub const SKY_COLORS: [u32; 7] = [
    0x87ceeb, // sky blue
    0xffa500, // orange
    0xffff00, // yellow
    0x00ff00, // green
    0x00ffff, // cyan
    0xff00ff, // magenta
    0xffffff, // white
];

pub fn sky_color(level: u32) -> u32 {
    let index = (level.max(1) as usize - 1).min(SKY_COLORS.len() - 1);
    SKY_COLORS[index]
}

/// Emphasis for a HUD readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HudTone {
    Normal,
    Warning,
    Critical,
}

impl HudTone {
    pub fn for_health(health: i32) -> Self {
        match health {
            h if h <= 25 => HudTone::Critical,
            h if h <= 50 => HudTone::Warning,
            _ => HudTone::Normal,
        }
    }

    pub fn for_ammo(ammo: u32) -> Self {
        match ammo {
            0..=5 => HudTone::Critical,
            6..=10 => HudTone::Warning,
            _ => HudTone::Normal,
        }
    }

    /// Level progress readout: brighter as the next level gets closer
    pub fn for_progress(progress: f32) -> Self {
        let percent = (progress * 100.0).round();
        if percent >= 80.0 {
            HudTone::Critical
        } else if percent >= 50.0 {
            HudTone::Warning
        } else {
            HudTone::Normal
        }
    }

    /// Hex color for text rendering
    pub fn color(&self) -> &'static str {
        match self {
            HudTone::Normal => "#ffffff",
            HudTone::Warning => "#ffaa00",
            HudTone::Critical => "#ff0000",
        }
    }
}

/// Receiver for HUD updates
pub trait UiSink {
    fn show(&mut self, event: UiEvent);

    /// Tear down any presentation state (session end/restart)
    fn shutdown(&mut self) {}
}

impl<T: UiSink> UiSink for Rc<RefCell<T>> {
    fn show(&mut self, event: UiEvent) {
        self.borrow_mut().show(event);
    }

    fn shutdown(&mut self) {
        self.borrow_mut().shutdown();
    }
}

/// Collects events in order (headless runs and tests)
impl UiSink for Vec<UiEvent> {
    fn show(&mut self, event: UiEvent) {
        self.push(event);
    }
}

/// Sink that writes HUD changes to the log
#[derive(Debug, Clone, Default)]
pub struct LogUi {
    /// Last values shown, so repeated updates are not re-logged
    score: u64,
    health: i32,
    ammo: u32,
}

impl UiSink for LogUi {
    fn show(&mut self, event: UiEvent) {
        match event {
            UiEvent::ScoreChanged(score) if score != self.score => {
                self.score = score;
                log::debug!("Score: {}", score);
            }
            UiEvent::HealthChanged(health) if health != self.health => {
                self.health = health;
                log::info!("Health: {} ({:?})", health, HudTone::for_health(health));
            }
            UiEvent::AmmoChanged(ammo) if ammo != self.ammo => {
                self.ammo = ammo;
                log::debug!("Ammo: {}", ammo);
            }
            UiEvent::LevelChanged { level, progress } => {
                log::debug!("Level: {} Progress: {}%", level, (progress * 100.0).round());
            }
            UiEvent::LevelUp { level, sky_color } => {
                log::info!("LEVEL {} (sky #{:06x})", level, sky_color);
            }
            UiEvent::Message { text, duration } => {
                log::info!("{} ({:.1}s)", text, duration);
            }
            UiEvent::BoundaryWarning(on) => {
                if on {
                    log::warn!("Approaching map boundary");
                }
            }
            UiEvent::DamageTaken { amount } => log::debug!("Took {} damage", amount),
            UiEvent::Reloading => log::info!("Reloading..."),
            UiEvent::GameOver { final_score } => log::info!("GAME OVER - final score {}", final_score),
            _ => {}
        }
    }
}
