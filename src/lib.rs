//! Multiplication Rain - a falling-problems times table game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, answers, scoring)
//! - `tuning`: Data-driven difficulty balance
//! - `app`: Screen routing between menu, play and results
//! - `persistence`: Storage capability and LocalStorage backend
//! - `platform`: Browser/native platform abstraction

pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod results;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::{App, Screen};
pub use highscores::SaveData;
pub use settings::Settings;
pub use tuning::{DifficultyConfig, DifficultyLevel};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz), in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Countdown period
    pub const SECOND_MS: f64 = 1000.0;

    /// Play area geometry, in percent of the area height/width
    pub const SPAWN_Y: f32 = -100.0;
    pub const FLOOR_Y: f32 = 100.0;
    /// Problems answered above this line earn the fast-answer bonus
    pub const FAST_ANSWER_Y: f32 = 20.0;
    pub const SPAWN_X_MIN: f32 = 15.0;
    pub const SPAWN_X_SPAN: f32 = 70.0;

    /// Delay between the end condition and the final stats hand-off
    pub const GAME_OVER_DELAY_MS: f64 = 500.0;
    pub const FEEDBACK_CORRECT_MS: f64 = 800.0;
    pub const FEEDBACK_WRONG_MS: f64 = 1000.0;
}
