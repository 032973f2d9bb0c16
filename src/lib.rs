//! Cabin Runner - the secret area of a retro portfolio site
//!
//! Core modules:
//! - `gate`: Grid puzzle and tile reveal that stand in front of the game
//! - `sim`: Runner simulation (physics, spawning, collisions, scoring)
//! - `runner`: Per-frame driver tying the simulation to RNG and storage
//! - `renderer`: Draw-call generation and the WebGPU pipeline
//! - `schedule`: Cancelable one-shot timers on a single clock
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `highscores`, `settings`: The two values that outlive a visit
//! - `i18n`: English and Spanish strings
//! - `platform`: Input modality, key mapping, clock
//! - `tuning`: Data-driven game feel

pub mod gate;
pub mod highscores;
pub mod i18n;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod schedule;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScoreStore;
pub use runner::Runner;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (scaled with nearest-neighbour filtering)
    pub const CANVAS_W: f32 = 800.0;
    pub const CANVAS_H: f32 = 400.0;

    /// Y coordinate of the ground line (y grows downward)
    pub const GROUND_Y: f32 = 340.0;

    /// Physics constants are tuned per 1/60 s frame
    pub const FRAME_RATE: f32 = 60.0;
    /// Largest real-time delta fed to the simulation (tab-resume guard)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Delta used for the very first frame
    pub const FIRST_FRAME_DT: f32 = 1.0 / FRAME_RATE;
}

/// Convert a real-time delta (seconds) into frame-normalized simulation steps
#[inline]
pub fn frame_step(dt: f32) -> f32 {
    dt.clamp(0.0, consts::MAX_FRAME_DT) * consts::FRAME_RATE
}
