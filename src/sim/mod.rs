//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering, audio or filesystem dependencies

pub mod achievements;
pub mod boss;
pub mod collision;
pub mod entity;
pub mod level;
pub mod powerup;
pub mod rect;
pub mod rng;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use achievements::{Achievement, AchievementFlags};
pub use level::{LevelParams, MAX_LEVELS};
pub use rect::Rect;
pub use rng::SimRng;
pub use snapshot::Snapshot;
pub use state::{
    ActiveEffects, Boss, EffectKind, GameEvent, GamePhase, GameState, MenuItem, Obstacle,
    ObstacleKind, Player, PowerUp, PowerUpKind, SimLimits, Ultimate,
};
pub use tick::{TickInput, tick};
