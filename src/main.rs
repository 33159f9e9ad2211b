//! Arena Shooter headless runner
//!
//! Drives a session with a scripted autopilot and logs what happens. Useful
//! for soak runs and for checking balance changes from a tuning file.
//!
//! Usage: `arena-shooter [seed] [seconds]`
//! Config paths come from `ARENA_SETTINGS` / `ARENA_TUNING` (default
//! `settings.json` / `tuning.json`); missing files fall back to defaults.

use std::env;
use std::path::PathBuf;

use glam::Vec2;

use arena_shooter::audio::LogAudio;
use arena_shooter::platform::{Action, InputSource};
use arena_shooter::ui::LogUi;
use arena_shooter::{Session, Settings, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;

/// Circles the arena, sweeps the view and taps fire
#[derive(Debug, Default)]
struct Autopilot {
    frame: u64,
}

impl Autopilot {
    fn step(&mut self) {
        self.frame += 1;
    }
}

impl InputSource for Autopilot {
    fn is_held(&self, action: Action) -> bool {
        match action {
            Action::MoveForward => true,
            Action::StrafeLeft => (self.frame / 240) % 2 == 0,
            Action::StrafeRight => (self.frame / 240) % 2 == 1,
            Action::MoveBack => false,
            Action::Fire => self.frame % 12 < 6,
        }
    }

    fn take_look_delta(&mut self) -> Vec2 {
        self.step();
        // Tilt the view toward the ground once, then keep turning
        let pitch = if self.frame == 1 { 20.0 } else { 0.0 };
        Vec2::new(4.0, pitch)
    }
}

fn config_path(var: &str, default: &str) -> PathBuf {
    env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(60.0);

    let settings = Settings::load_or_default(&config_path("ARENA_SETTINGS", "settings.json"));
    let tuning = Tuning::load_or_default(&config_path("ARENA_TUNING", "tuning.json"));
    log::info!("Arena Shooter (headless) seed {} for {:.0}s", seed, seconds);

    let mut session = Session::new(
        seed,
        tuning,
        settings,
        Box::new(Autopilot::default()),
        Box::new(LogAudio::new()),
        Box::new(LogUi::default()),
    );

    let frames = (seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        if !session.frame(FRAME_DT) {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "Finished at {:.1}s: score {} level {} health {} enemies {}",
        state.time,
        state.score(),
        state.level(),
        state.health,
        state.enemies.len()
    );
    session.shutdown();
}
