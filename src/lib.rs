//! Rockfall - a falling-obstacle dodge arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, power-ups, boss, progression)
//! - `platform`: Input boundary (held keys to per-tick input)
//! - `audio`: Sound cue boundary
//! - `persistence`: Atomic JSON documents on disk
//! - `game`: Session driver tying the simulation to its side-effect sinks

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::HighScoreRecord;
pub use profile::Profile;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Entities this far below the bottom edge are culled
    pub const DESPAWN_MARGIN: f32 = 40.0;

    /// Player paddle
    pub const PLAYER_WIDTH: f32 = 120.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    pub const PLAYER_BOTTOM_GAP: f32 = 10.0;
    /// Base movement speed (pixels/s)
    pub const PLAYER_BASE_SPEED: f32 = 600.0;
    /// Movement speed per speed-upgrade level (pixels/s)
    pub const PLAYER_SPEED_PER_UPGRADE: f32 = 60.0;
    pub const BASE_LIVES: u8 = 3;
    pub const INVULNERABILITY_TICKS: u32 = 90;
}
