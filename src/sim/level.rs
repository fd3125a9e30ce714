//! Per-level parameter table

use serde::{Deserialize, Serialize};

/// Number of levels in a run
pub const MAX_LEVELS: u32 = 3;

/// Spawn and win parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Score needed to complete the level
    pub win_score: u32,
    /// Base obstacle fall speed (pixels/s)
    pub base_fall_speed: f32,
    /// Ticks between obstacle spawns
    pub spawn_delay: u32,
    /// Obstacle cap (oldest evicted beyond this)
    pub max_obstacles: usize,
}

const LEVELS: [LevelParams; MAX_LEVELS as usize] = [
    LevelParams {
        win_score: 15,
        base_fall_speed: 300.0,
        spawn_delay: 45,
        max_obstacles: 20,
    },
    LevelParams {
        win_score: 25,
        base_fall_speed: 420.0,
        spawn_delay: 35,
        max_obstacles: 30,
    },
    LevelParams {
        win_score: 40,
        base_fall_speed: 540.0,
        spawn_delay: 25,
        max_obstacles: 40,
    },
];

impl LevelParams {
    /// Look up a level (1-based). Out-of-range indices clamp to the nearest level.
    pub fn for_level(level: u32) -> Self {
        let idx = level.clamp(1, MAX_LEVELS) as usize - 1;
        LEVELS[idx]
    }

    /// Score at which the boss appears (80% of the win score)
    pub fn boss_threshold(&self) -> u32 {
        self.win_score * 4 / 5
    }
}
