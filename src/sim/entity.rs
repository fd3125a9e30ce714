//! Entity model: per-type movement rules
//!
//! Obstacles fall at their own speed scaled by a world-level multiplier;
//! pickups fall at a constant speed; particles and the player trail are
//! presentation state advanced alongside.

use glam::Vec2;

use super::state::*;
use crate::consts::*;

/// Obstacle spin (radians/s), cosmetic
const SPIN_RATE: f32 = 2.0;
/// Score ramp slope and cap for the fall multiplier
const SCORE_RAMP_PER_POINT: f32 = 0.01;
const SCORE_RAMP_CAP: f32 = 0.5;
/// Particle physics
const PARTICLE_GRAVITY: f32 = 300.0;
const PARTICLE_DECAY: f32 = 1.5;

/// World-level inputs to obstacle movement, computed once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldContext {
    /// Scales every obstacle's fall (and drift) speed
    pub fall_multiplier: f32,
    /// Player center x, for homing obstacles
    pub player_x: f32,
}

impl WorldContext {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            fall_multiplier: fall_multiplier(
                state.effects.is_active(EffectKind::SlowMotion),
                state.ultimate.is_active(),
                state.score,
            ),
            player_x: state.player.pos.x,
        }
    }
}

/// Combined fall-speed multiplier: slow-motion x0.5, ultimate x0.3, and a
/// mild ramp with score
pub fn fall_multiplier(slow_motion: bool, ultimate_active: bool, score: u32) -> f32 {
    let mut multiplier = 1.0 + (score as f32 * SCORE_RAMP_PER_POINT).min(SCORE_RAMP_CAP);
    if slow_motion {
        multiplier *= 0.5;
    }
    if ultimate_active {
        multiplier *= 0.3;
    }
    multiplier
}

/// Advance one obstacle. Returns true when a splitter crosses the midline and
/// should break apart.
pub fn advance_obstacle(obstacle: &mut Obstacle, dt: f32, ctx: &WorldContext) -> bool {
    let prev_y = obstacle.pos.y;
    obstacle.pos.y += obstacle.speed * ctx.fall_multiplier * dt;
    obstacle.rotation = (obstacle.rotation + SPIN_RATE * dt) % std::f32::consts::TAU;

    let half = obstacle.size / 2.0;
    match obstacle.kind {
        ObstacleKind::Homing => {
            obstacle.homing_target = Some(ctx.player_x);
            let delta = ctx.player_x - obstacle.pos.x;
            let step = HOMING_STEP * dt;
            obstacle.pos.x += delta.clamp(-step, step);
            obstacle.pos.x = obstacle.pos.x.clamp(half, PLAYFIELD_WIDTH - half);
        }
        ObstacleKind::Bouncy => {
            let dir = obstacle.bounce_dir.unwrap_or(1.0);
            obstacle.pos.x += dir * BOUNCE_SPEED * ctx.fall_multiplier * dt;
            if obstacle.pos.x - half <= 0.0 {
                obstacle.pos.x = half;
                obstacle.bounce_dir = Some(1.0);
            } else if obstacle.pos.x + half >= PLAYFIELD_WIDTH {
                obstacle.pos.x = PLAYFIELD_WIDTH - half;
                obstacle.bounce_dir = Some(-1.0);
            }
        }
        _ => {}
    }

    let midline = PLAYFIELD_HEIGHT / 2.0;
    obstacle.kind == ObstacleKind::Splitter && prev_y < midline && obstacle.pos.y >= midline
}

/// Advance every obstacle, breaking splitters into shards
pub fn update_obstacles(state: &mut GameState, dt: f32) {
    let ctx = WorldContext::from_state(state);
    let mut splits = Vec::new();
    for obstacle in state.obstacles.iter_mut() {
        if advance_obstacle(obstacle, dt, &ctx) {
            splits.push(obstacle.id);
        }
    }
    if splits.is_empty() {
        return;
    }

    let mut result = Vec::with_capacity(state.obstacles.len() + splits.len());
    for obstacle in std::mem::take(&mut state.obstacles) {
        if splits.contains(&obstacle.id) {
            for dir in [-1.0, 1.0] {
                let id = state.next_entity_id();
                result.push(Obstacle {
                    id,
                    kind: ObstacleKind::Bouncy,
                    pos: obstacle.pos + Vec2::new(dir * SHARD_SIZE / 2.0, 0.0),
                    size: SHARD_SIZE,
                    speed: obstacle.speed,
                    rotation: obstacle.rotation,
                    bounce_dir: Some(dir),
                    homing_target: None,
                });
            }
        } else {
            result.push(obstacle);
        }
    }
    state.obstacles = result;
    enforce_obstacle_cap(&mut state.obstacles, state.params.max_obstacles);
}

/// Advance one pickup (constant speed, unaffected by world multipliers)
pub fn advance_pickup(pickup: &mut PowerUp, dt: f32) {
    pickup.pos.y += PICKUP_FALL_SPEED * dt;
}

/// Advance particles and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.vel *= 0.98;
        particle.life -= dt * PARTICLE_DECAY;
        particle.size *= 0.995;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Spawn a radial burst of particles
pub fn spawn_burst(state: &mut GameState, center: Vec2, color: u32, count: usize) {
    for _ in 0..count {
        let angle = state.rng.range_f32(0.0, std::f32::consts::TAU);
        let speed = state.rng.range_f32(80.0, 220.0);
        let size = state.rng.range_f32(3.0, 7.0);
        state.push_particle(Particle {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            life: 1.0,
            size,
        });
    }
}

/// Remove entities that fell past the despawn line
pub fn cull_offscreen(state: &mut GameState) {
    let limit = PLAYFIELD_HEIGHT + DESPAWN_MARGIN;
    state.obstacles.retain(|o| o.pos.y <= limit);
    state.pickups.retain(|p| p.pos.y <= limit);
}

/// FIFO bound: evict the oldest obstacles until at most `cap` remain
pub fn enforce_obstacle_cap(obstacles: &mut Vec<Obstacle>, cap: usize) {
    if obstacles.len() > cap {
        let excess = obstacles.len() - cap;
        obstacles.drain(..excess);
    }
}

/// Entity model step: obstacles, pickups, particles, trail, then culling
pub fn update_entities(state: &mut GameState, dt: f32) {
    update_obstacles(state, dt);
    for pickup in state.pickups.iter_mut() {
        advance_pickup(pickup, dt);
    }
    update_particles(&mut state.particles, dt);
    let trail_length = state.limits.trail_length;
    state.player.record_trail(trail_length);
    cull_offscreen(state);
}
