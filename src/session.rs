//! Session context
//!
//! Binds a [`GameState`] to the collaborators a host provides. There are no
//! globals: whoever builds the `Session` decides where input comes from and
//! where sound and HUD events go.

use crate::audio::AudioSink;
use crate::platform::InputSource;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{UiEvent, UiSink};

/// A running game with its input source and output sinks
pub struct Session {
    state: GameState,
    settings: Settings,
    input: Box<dyn InputSource>,
    audio: Box<dyn AudioSink>,
    ui: Box<dyn UiSink>,
    frames: u64,
    /// Sinks already torn down for the current state
    closed: bool,
}

impl Session {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        input: Box<dyn InputSource>,
        audio: Box<dyn AudioSink>,
        ui: Box<dyn UiSink>,
    ) -> Self {
        let mut session = Self {
            state: GameState::with_tuning(seed, tuning),
            settings: Settings::default(),
            input,
            audio,
            ui,
            frames: 0,
            closed: false,
        };
        session.apply_settings(settings);
        session.announce();
        session.dispatch();
        session
    }

    /// Sample input, advance one frame, route events
    ///
    /// Returns false once the session has ended.
    pub fn frame(&mut self, dt: f32) -> bool {
        if self.state.is_ended() {
            return false;
        }

        let input = TickInput::from_source(self.input.as_mut());
        tick(&mut self.state, &input, dt);
        self.frames += 1;
        self.dispatch();

        if self.state.is_ended() {
            self.teardown();
            return false;
        }
        true
    }

    /// Tear down and start a fresh session with the same tuning
    pub fn restart(&mut self) {
        self.teardown();
        self.state.restart();
        self.state.player.set_mouse_sensitivity(self.settings.mouse_sensitivity);
        self.frames = 0;
        self.closed = false;
        log::info!("Session restarted with seed {}", self.state.seed);
        self.announce();
        self.dispatch();
    }

    /// End the session now (host closing)
    pub fn shutdown(&mut self) {
        self.state.end();
        self.dispatch();
        self.teardown();
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        self.state.player.set_mouse_sensitivity(settings.mouse_sensitivity);
        self.audio.apply_settings(&settings);
        self.settings = settings;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    /// Frames stepped since the session (re)started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn announce(&mut self) {
        if self.settings.show_map_hint {
            let extent = self.state.tuning.map_half_extent;
            self.ui.show(UiEvent::Message {
                text: format!("Map Boundaries: ±{} units", extent),
                duration: 3.0,
            });
        }
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio.play(cue),
                GameEvent::Ui(event) => self.ui.show(event),
            }
        }
    }

    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.ui.shutdown();
        self.audio.shutdown();
        log::info!(
            "Session closed after {} frames: score {} level {}",
            self.frames,
            self.state.score(),
            self.state.level()
        );
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}
