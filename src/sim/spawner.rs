//! Spawner: decides when and what to create
//!
//! Two independent timers. The obstacle timer fires at the level's
//! `spawn_delay` and is suppressed while a boss is up; the power-up timer
//! fires at a fixed delay and then spawns with a fixed probability.

use glam::Vec2;

use super::state::*;
use crate::consts::*;

/// Ticks between power-up spawn attempts
pub const POWERUP_SPAWN_DELAY: u32 = 300;
/// Chance that a power-up attempt spawns something
pub const POWERUP_SPAWN_CHANCE: f64 = 0.5;
/// Obstacles present when a level starts
pub const STARTING_OBSTACLES: usize = 3;

/// Spawner step: advance both timers and spawn what is due
pub fn update_spawner(state: &mut GameState) {
    if state.boss_active() {
        state.obstacle_spawn_timer = 0;
    } else {
        state.obstacle_spawn_timer += 1;
        if state.obstacle_spawn_timer >= state.params.spawn_delay {
            state.obstacle_spawn_timer = 0;
            spawn_obstacle(state);
        }
    }

    state.powerup_spawn_timer += 1;
    if state.powerup_spawn_timer >= POWERUP_SPAWN_DELAY {
        state.powerup_spawn_timer = 0;
        if state.rng.chance(POWERUP_SPAWN_CHANCE) {
            spawn_powerup(state);
        }
    }
}

/// Spawn one obstacle of a uniformly random kind at the top edge
pub fn spawn_obstacle(state: &mut GameState) {
    let kind = state
        .rng
        .pick(&ObstacleKind::ALL)
        .unwrap_or(ObstacleKind::Normal);
    let half = kind.size() / 2.0;
    let x = state.rng.range_f32(half, PLAYFIELD_WIDTH - half);
    log::debug!("spawn {:?} at x={:.0}", kind, x);
    state.push_obstacle(kind, Vec2::new(x, -half));
}

/// Spawn one power-up of a uniformly random kind at the top edge
pub fn spawn_powerup(state: &mut GameState) {
    let kind = state
        .rng
        .pick(&PowerUpKind::ALL)
        .unwrap_or(PowerUpKind::Shield);
    let half = PICKUP_SIZE / 2.0;
    let x = state.rng.range_f32(half, PLAYFIELD_WIDTH - half);
    let id = state.next_entity_id();
    log::debug!("spawn power-up {:?} at x={:.0}", kind, x);
    state.pickups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(x, -half),
    });
}

/// Reset both timers and seed the level with its starting obstacles
pub fn reset_for_level(state: &mut GameState) {
    state.obstacle_spawn_timer = 0;
    state.powerup_spawn_timer = 0;
    for _ in 0..STARTING_OBSTACLES {
        let half = ObstacleKind::Normal.size() / 2.0;
        let x = state.rng.range_f32(half, PLAYFIELD_WIDTH - half);
        let y = state.rng.range_f32(0.0, PLAYFIELD_HEIGHT / 2.0);
        state.push_obstacle(ObstacleKind::Normal, Vec2::new(x, y));
    }
}
