//! Boss controller
//!
//! `inactive -> active -> inactive`. The boss appears once the level score
//! reaches 80% of the win score, sways across the top of the playfield,
//! fires alternating obstacle patterns and loses health on its own (faster
//! while the ultimate is active). There is no direct attack on the boss.

use glam::Vec2;

use super::achievements::{Achievement, check_achievements, unlock};
use super::entity::spawn_burst;
use super::state::*;
use crate::consts::*;

/// Health formula: `BOSS_BASE_HEALTH + level * BOSS_HEALTH_PER_LEVEL`
pub const BOSS_BASE_HEALTH: f32 = 100.0;
pub const BOSS_HEALTH_PER_LEVEL: f32 = 50.0;
/// Ambient health loss per tick
pub const BOSS_DECAY_PER_TICK: f32 = 0.2;
/// Extra health loss per tick while the ultimate is active
pub const BOSS_ULTIMATE_DAMAGE: f32 = 1.0;
/// Ticks between attacks
pub const BOSS_ATTACK_INTERVAL: u32 = 60;
/// Defeat rewards
pub const BOSS_COINS_PER_LEVEL: u32 = 50;
pub const BOSS_SCORE_BONUS: u32 = 10;

const SPREAD_COUNT: usize = 5;
const SPREAD_GAP: f32 = 60.0;
const RING_COUNT: usize = 8;
const RING_RADIUS: f32 = 70.0;
const SWAY_RATE: f32 = 0.02;

/// Spawn the boss if the level score crossed the threshold
pub fn maybe_spawn_boss(state: &mut GameState) {
    if state.boss_active()
        || state.boss_defeated_this_level
        || state.score < state.params.boss_threshold()
    {
        return;
    }
    let health = BOSS_BASE_HEALTH + state.level as f32 * BOSS_HEALTH_PER_LEVEL;
    state.boss = Some(Boss {
        health,
        max_health: health,
        pos: Vec2::new(PLAYFIELD_WIDTH / 2.0, BOSS_Y),
        pattern: 0,
        timer: 0,
    });
    log::info!("Boss spawned on level {} with {} health", state.level, health);
    state.emit(GameEvent::BossSpawned { health });
}

/// Boss controller step
pub fn update_boss(state: &mut GameState) {
    maybe_spawn_boss(state);

    let ultimate_active = state.ultimate.is_active();
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    boss.timer += 1;
    boss.pos.x = PLAYFIELD_WIDTH / 2.0 + BOSS_SWAY * (boss.timer as f32 * SWAY_RATE).sin();
    boss.health -= BOSS_DECAY_PER_TICK;
    if ultimate_active {
        boss.health -= BOSS_ULTIMATE_DAMAGE;
    }

    let attack = boss.timer % BOSS_ATTACK_INTERVAL == 0 && boss.health > 0.0;
    let (pos, pattern, health) = (boss.pos, boss.pattern, boss.health);
    if attack {
        boss.pattern = (boss.pattern + 1) % 2;
    }

    if health <= 0.0 {
        defeat_boss(state, pos);
    } else if attack {
        fire_pattern(state, pos, pattern);
    }
}

/// Emit one attack pattern around `origin`
fn fire_pattern(state: &mut GameState, origin: Vec2, pattern: u8) {
    match pattern {
        0 => {
            // Horizontal spread of fast obstacles
            let half = ObstacleKind::Fast.size() / 2.0;
            let y = origin.y + BOSS_SIZE.y / 2.0;
            for i in 0..SPREAD_COUNT {
                let offset = (i as f32 - (SPREAD_COUNT as f32 - 1.0) / 2.0) * SPREAD_GAP;
                let x = (origin.x + offset).clamp(half, PLAYFIELD_WIDTH - half);
                state.push_obstacle(ObstacleKind::Fast, Vec2::new(x, y));
            }
        }
        _ => {
            // Ring of normal obstacles
            let half = ObstacleKind::Normal.size() / 2.0;
            for i in 0..RING_COUNT {
                let angle = std::f32::consts::TAU * i as f32 / RING_COUNT as f32;
                let p = origin + Vec2::new(angle.cos(), angle.sin()) * RING_RADIUS;
                let x = p.x.clamp(half, PLAYFIELD_WIDTH - half);
                state.push_obstacle(ObstacleKind::Normal, Vec2::new(x, p.y));
            }
        }
    }
    log::debug!("Boss attack pattern {}", pattern);
    state.emit(GameEvent::BossAttack { pattern });
}

/// Clear the boss and pay out its rewards
fn defeat_boss(state: &mut GameState, pos: Vec2) {
    state.boss = None;
    state.boss_defeated_this_level = true;

    let coins = BOSS_COINS_PER_LEVEL * state.level;
    state.profile.coins += coins;
    state.score += BOSS_SCORE_BONUS;
    state.run_score += BOSS_SCORE_BONUS;
    spawn_burst(state, pos, particle_color::BOSS, 40);

    log::info!("Boss defeated on level {} (+{} coins)", state.level, coins);
    state.emit(GameEvent::BossDefeated { coins });
    unlock(state, Achievement::BossSlayer);
    check_achievements(state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at_threshold() -> GameState {
        let mut state = GameState::new(9);
        state.score = state.params.boss_threshold();
        state
    }

    #[test]
    fn test_spawn_at_threshold_only() {
        let mut state = GameState::new(9);
        state.score = state.params.boss_threshold() - 1;
        update_boss(&mut state);
        assert!(state.boss.is_none());

        let mut state = state_at_threshold();
        update_boss(&mut state);
        let boss = state.boss.as_ref().expect("boss should spawn");
        assert_eq!(boss.max_health, BOSS_BASE_HEALTH + BOSS_HEALTH_PER_LEVEL);
    }

    #[test]
    fn test_single_boss_instance() {
        let mut state = state_at_threshold();
        update_boss(&mut state);
        let first_max = state.boss.as_ref().map(|b| b.max_health);
        update_boss(&mut state);
        assert_eq!(state.boss.as_ref().map(|b| b.max_health), first_max);
        let spawns = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BossSpawned { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn test_attack_patterns_alternate() {
        let mut state = state_at_threshold();
        for _ in 0..BOSS_ATTACK_INTERVAL {
            update_boss(&mut state);
        }
        assert_eq!(state.obstacles.len(), SPREAD_COUNT);
        assert!(state.obstacles.iter().all(|o| o.kind == ObstacleKind::Fast));

        state.obstacles.clear();
        for _ in 0..BOSS_ATTACK_INTERVAL {
            update_boss(&mut state);
        }
        assert_eq!(state.obstacles.len(), RING_COUNT);
        assert!(state.obstacles.iter().all(|o| o.kind == ObstacleKind::Normal));
    }

    #[test]
    fn test_passive_decay_and_ultimate_damage() {
        let mut state = state_at_threshold();
        update_boss(&mut state);
        let h1 = state.boss.as_ref().map(|b| b.health).unwrap_or_default();
        state.ultimate.active_ticks = 10;
        update_boss(&mut state);
        let h2 = state.boss.as_ref().map(|b| b.health).unwrap_or_default();
        assert!((h1 - h2 - (BOSS_DECAY_PER_TICK + BOSS_ULTIMATE_DAMAGE)).abs() < 1e-3);
    }

    #[test]
    fn test_defeat_rewards_and_no_respawn() {
        let mut state = state_at_threshold();
        let score_before = state.score;
        update_boss(&mut state);
        if let Some(boss) = state.boss.as_mut() {
            boss.health = BOSS_DECAY_PER_TICK / 2.0;
        }
        update_boss(&mut state);
        assert!(state.boss.is_none());
        assert!(state.boss_defeated_this_level);
        assert_eq!(state.score, score_before + BOSS_SCORE_BONUS);
        assert_eq!(
            state.coins(),
            BOSS_COINS_PER_LEVEL * state.level + Achievement::BossSlayer.reward()
        );
        assert!(state.profile.achievements.boss_slayer);

        // Still above the threshold, but the boss stays down this level
        update_boss(&mut state);
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_sways_inside_playfield() {
        let mut state = state_at_threshold();
        for _ in 0..400 {
            update_boss(&mut state);
            if let Some(boss) = &state.boss {
                assert!(boss.rect().x >= 0.0);
                assert!(boss.rect().right() <= PLAYFIELD_WIDTH);
            }
        }
    }
}
