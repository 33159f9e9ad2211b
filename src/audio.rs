//! Audio cues emitted by the simulation
//!
//! The core never synthesizes sound. It names discrete cues and hands them to
//! an [`AudioSink`]; the sink decides how (or whether) to render them.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Projectile fired
    Shoot,
    /// Projectile struck an enemy
    EnemyHit,
    /// Enemy reached the player
    PlayerHit,
    /// Fire pressed with an empty magazine
    EmptyAmmo,
    /// Advanced to the next level
    LevelUp,
}

/// Oscillator sweep a synthesizing sink can use for a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before master volume
    pub gain: f32,
    /// Seconds
    pub duration: f32,
}

impl SoundCue {
    pub const ALL: [SoundCue; 5] = [
        SoundCue::Shoot,
        SoundCue::EnemyHit,
        SoundCue::PlayerHit,
        SoundCue::EmptyAmmo,
        SoundCue::LevelUp,
    ];

    /// Stable event name
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::EnemyHit => "enemy-hit",
            SoundCue::PlayerHit => "player-hit",
            SoundCue::EmptyAmmo => "empty-ammo",
            SoundCue::LevelUp => "level-up",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cue| cue.name() == name)
    }

    /// Suggested sweep: short descending blips for hits, a rising chirp for level-up
    pub fn tone(&self) -> Tone {
        match self {
            SoundCue::Shoot => Tone {
                start_hz: 800.0,
                end_hz: 200.0,
                gain: 0.3,
                duration: 0.1,
            },
            SoundCue::EnemyHit => Tone {
                start_hz: 400.0,
                end_hz: 100.0,
                gain: 0.4,
                duration: 0.2,
            },
            SoundCue::PlayerHit => Tone {
                start_hz: 200.0,
                end_hz: 50.0,
                gain: 0.5,
                duration: 0.3,
            },
            SoundCue::EmptyAmmo => Tone {
                start_hz: 150.0,
                end_hz: 150.0,
                gain: 0.2,
                duration: 0.1,
            },
            SoundCue::LevelUp => Tone {
                start_hz: 440.0,
                end_hz: 1320.0,
                gain: 0.4,
                duration: 0.4,
            },
        }
    }
}

/// Receiver for sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Pick up volume and mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}

    /// Release any audio resources (session teardown)
    fn shutdown(&mut self) {}
}

/// Shared handle, for hosts that keep a reference to the sink
impl<T: AudioSink> AudioSink for Rc<RefCell<T>> {
    fn play(&mut self, cue: SoundCue) {
        self.borrow_mut().play(cue);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.borrow_mut().apply_settings(settings);
    }

    fn shutdown(&mut self) {
        self.borrow_mut().shutdown();
    }
}

/// Collects cues in order (headless runs and tests)
impl AudioSink for Vec<SoundCue> {
    fn play(&mut self, cue: SoundCue) {
        self.push(cue);
    }
}

/// Sink that reports cues through `log` with the volume they would play at
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues that were audible when played
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let tone = cue.tone();
        log::debug!(
            "sound {} {:.0}->{:.0} Hz gain {:.2} for {:.2}s",
            cue.name(),
            tone.start_hz,
            tone.end_hz,
            tone.gain * vol,
            tone.duration
        );
        self.played += 1;
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    fn shutdown(&mut self) {
        log::info!("Audio sink closed after {} cues", self.played);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for cue in SoundCue::ALL {
            assert_eq!(SoundCue::from_name(cue.name()), Some(cue));
        }
        assert_eq!(SoundCue::from_name("explosion"), None);
    }

    #[test]
    fn test_muted_sink_skips_cues() {
        let mut audio = LogAudio::new();
        audio.play(SoundCue::Shoot);
        assert_eq!(audio.played(), 1);

        assert!(audio.toggle_mute());
        audio.play(SoundCue::Shoot);
        assert_eq!(audio.played(), 1);
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = LogAudio::new();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn test_settings_applied() {
        let mut audio = LogAudio::new();
        audio.apply_settings(&Settings {
            master_volume: 0.8,
            sfx_volume: 0.5,
            muted: true,
            ..Default::default()
        });
        assert!(audio.is_muted());
        audio.set_muted(false);
        assert!((audio.effective_volume() - 0.4).abs() < 1e-6);
    }
}
