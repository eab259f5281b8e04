//! Tandem Hop - a turn-based two-player charge-jump platformer
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (player state machine, tiles, physics, run timer)
//! - `platform`: Input snapshots and key bindings
//! - `leaderboard`: Remote leaderboard client and backends
//! - `highscores`: Leaderboard display rows and time formatting
//! - `outcome`: Finish sequence (best time, result panel, score submission)
//! - `hud`: On-screen text slots
//! - `persistence`: Local key-value preference store (best time)
//! - `settings`: Data-driven tuning and key bindings
//! - `session`: Owns every subsystem and exposes `tick`
//! - `game_loop`: Fixed timestep driver and scripted input

pub mod game_loop;
pub mod highscores;
pub mod hud;
pub mod leaderboard;
pub mod outcome;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use game_loop::{GameLoop, InputSource, ScriptedInput};
pub use highscores::{HighScores, format_time};
pub use hud::Hud;
pub use outcome::Outcome;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the loop will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Number of leaderboard rows shown on the finish panel
    pub const LEADERBOARD_SLOTS: usize = 5;

    /// Player 1's canonical model roll (upright)
    pub const P1_POSE_DEGREES: f32 = 0.0;
    /// Player 2's canonical model roll (rotated 90 degrees clockwise)
    pub const P2_POSE_DEGREES: f32 = -90.0;
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
