//! Collision detection and scoring
//!
//! Runs once per tick over the obstacle list. The list is moved out and
//! rebuilt from the survivors, so removals never disturb the iteration.
//! Per obstacle, the bottom-crossing check runs before the player-overlap
//! check; an obstacle removed by the first is not seen by the second.
//! Once the last life is gone the rest of the list is left untouched.

use super::achievements::check_achievements;
use super::entity::spawn_burst;
use super::rect::Rect;
use super::state::*;
use crate::consts::*;

/// Particles spawned when the player is hit
const HIT_BURST_PARTICLES: usize = 16;

/// What happened to one obstacle this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleOutcome {
    /// Still falling
    Kept,
    /// Crossed the bottom clear of the player: scored
    Dodged,
    /// Crossed the bottom while overlapping the player: removed, no score
    Missed,
    /// Hit the player while shielded: shield consumed
    Blocked,
    /// Hit the player: one life lost
    Damaged,
}

/// Whether the player can currently take contact damage
fn vulnerable(state: &GameState) -> bool {
    state.player.invulnerable_ticks == 0 && !state.ultimate.is_active()
}

/// Classify one obstacle against the player, in evaluation order
pub fn classify(obstacle: &Obstacle, player_rect: &Rect, vulnerable: bool, shielded: bool) -> ObstacleOutcome {
    let overlapping = obstacle.rect().overlaps(player_rect);
    if obstacle.crossed_bottom() {
        return if overlapping {
            ObstacleOutcome::Missed
        } else {
            ObstacleOutcome::Dodged
        };
    }
    if overlapping && vulnerable {
        return if shielded {
            ObstacleOutcome::Blocked
        } else {
            ObstacleOutcome::Damaged
        };
    }
    ObstacleOutcome::Kept
}

/// Collision & scoring step for obstacles and the boss
pub fn resolve_collisions(state: &mut GameState) {
    let obstacles = std::mem::take(&mut state.obstacles);
    let mut survivors = Vec::with_capacity(obstacles.len());

    for obstacle in obstacles {
        if state.player.lives == 0 {
            survivors.push(obstacle);
            continue;
        }
        let player_rect = state.player.rect();
        let outcome = classify(
            &obstacle,
            &player_rect,
            vulnerable(state),
            state.effects.is_active(EffectKind::Shield),
        );
        match outcome {
            ObstacleOutcome::Kept => survivors.push(obstacle),
            ObstacleOutcome::Dodged => award_dodge(state),
            ObstacleOutcome::Missed => {}
            ObstacleOutcome::Blocked => consume_shield(state),
            ObstacleOutcome::Damaged => damage_player(state),
        }
    }
    state.obstacles = survivors;

    resolve_boss_contact(state);
}

/// Boss contact: same gating as obstacles, always exactly one life unshielded
pub fn resolve_boss_contact(state: &mut GameState) {
    let Some(boss) = &state.boss else {
        return;
    };
    if state.player.lives == 0
        || !boss.rect().overlaps(&state.player.rect())
        || !vulnerable(state)
    {
        return;
    }
    if state.effects.is_active(EffectKind::Shield) {
        consume_shield(state);
    } else {
        damage_player(state);
    }
}

fn award_dodge(state: &mut GameState) {
    let points = state.dodge_points();
    state.score += points;
    state.run_score += points;
    state.profile.coins += points;
    state.combo += 1;
    state.max_combo = state.max_combo.max(state.combo);
    state.emit(GameEvent::Dodge { points });
    check_achievements(state);
}

fn consume_shield(state: &mut GameState) {
    state.effects.remove(EffectKind::Shield);
    let pos = state.player.pos;
    spawn_burst(state, pos, particle_color::SHIELD, HIT_BURST_PARTICLES / 2);
    state.emit(GameEvent::ShieldBlocked);
}

fn damage_player(state: &mut GameState) {
    state.player.lives = state.player.lives.saturating_sub(1);
    state.combo = 0;
    state.player.invulnerable_ticks = INVULNERABILITY_TICKS;
    let pos = state.player.pos;
    spawn_burst(state, pos, particle_color::DEBRIS, HIT_BURST_PARTICLES);
    log::debug!("Player hit, {} lives left", state.player.lives);
    state.emit(GameEvent::Hit {
        lives_left: state.player.lives,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Obstacle directly on the player
    fn on_player(state: &mut GameState) {
        let pos = state.player.pos;
        state.push_obstacle(ObstacleKind::Normal, pos);
    }

    /// Obstacle past the bottom, away from the player
    fn past_bottom_clear(state: &mut GameState) {
        let x = if state.player.pos.x > PLAYFIELD_WIDTH / 2.0 { 50.0 } else { 750.0 };
        state.push_obstacle(ObstacleKind::Normal, Vec2::new(x, PLAYFIELD_HEIGHT + 1.0));
    }

    #[test]
    fn test_dodge_scores_score_and_coins_equally() {
        let mut state = GameState::new(1);
        past_bottom_clear(&mut state);
        resolve_collisions(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.coins(), 1);
        assert_eq!(state.combo, 1);
        assert_eq!(state.max_combo, 1);
        assert_eq!(state.player.lives, BASE_LIVES);
    }

    #[test]
    fn test_dodge_points_with_multiplier_and_upgrade() {
        let mut state = GameState::new(1);
        state.effects.set(EffectKind::Multiplier, 10);
        state.profile.upgrades.coin_multiplier = 2;
        past_bottom_clear(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 4);
        assert_eq!(state.coins(), 4);
    }

    #[test]
    fn test_hit_without_shield_costs_one_life() {
        let mut state = GameState::new(1);
        state.combo = 7;
        on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES - 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.player.invulnerable_ticks, INVULNERABILITY_TICKS);
        assert!(state.obstacles.is_empty());
        assert!(state.drain_events().contains(&GameEvent::Hit { lives_left: BASE_LIVES - 1 }));
    }

    #[test]
    fn test_hit_with_shield_consumes_shield() {
        let mut state = GameState::new(1);
        state.effects.set(EffectKind::Shield, 100);
        state.combo = 7;
        on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES);
        assert!(!state.effects.is_active(EffectKind::Shield));
        assert!(state.obstacles.is_empty());
        assert_eq!(state.combo, 7);
    }

    #[test]
    fn test_invulnerable_or_ultimate_ignores_contact() {
        let mut state = GameState::new(1);
        state.player.invulnerable_ticks = 5;
        on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES);
        assert_eq!(state.obstacles.len(), 1);

        let mut state = GameState::new(1);
        state.ultimate.active_ticks = 5;
        on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES);
    }

    #[test]
    fn test_only_first_overlap_damages() {
        let mut state = GameState::new(1);
        on_player(&mut state);
        on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES - 1);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_bottom_cross_while_overlapping_is_a_miss() {
        let mut state = GameState::new(1);
        // Tall player reaching the bottom edge
        state.player.size.y = 60.0;
        state.player.pos.y = PLAYFIELD_HEIGHT - 30.0;
        let x = state.player.pos.x;
        state.push_obstacle(ObstacleKind::Normal, Vec2::new(x, PLAYFIELD_HEIGHT));
        resolve_collisions(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.lives, BASE_LIVES);
    }

    #[test]
    fn test_removal_does_not_skip_neighbours() {
        let mut state = GameState::new(1);
        for _ in 0..4 {
            past_bottom_clear(&mut state);
        }
        resolve_collisions(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 4);
        assert_eq!(state.combo, 4);
    }

    #[test]
    fn test_no_scoring_after_last_life() {
        let mut state = GameState::new(1);
        state.player.lives = 1;
        state.run_score = 8;
        on_player(&mut state);
        for _ in 0..5 {
            past_bottom_clear(&mut state);
        }
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.run_score, 8);
        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.obstacles.len(), 5);
    }

    /// Boss sitting on the player
    fn boss_on_player(state: &mut GameState) {
        state.boss = Some(Boss {
            health: 50.0,
            max_health: 50.0,
            pos: state.player.pos,
            pattern: 0,
            timer: 0,
        });
    }

    #[test]
    fn test_boss_contact_costs_exactly_one_life() {
        let mut state = GameState::new(1);
        boss_on_player(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES - 1);
        // Invulnerable now: no further damage
        resolve_collisions(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES - 1);
    }

    #[test]
    fn test_shield_absorbs_boss_contact() {
        let mut state = GameState::new(1);
        state.effects.set(EffectKind::Shield, 100);
        boss_on_player(&mut state);
        resolve_boss_contact(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES);
        assert!(!state.effects.is_active(EffectKind::Shield));
        assert!(state.drain_events().contains(&GameEvent::ShieldBlocked));
    }

    #[test]
    fn test_invulnerable_or_ultimate_ignores_boss_contact() {
        let mut state = GameState::new(1);
        state.player.invulnerable_ticks = 5;
        state.effects.set(EffectKind::Shield, 100);
        boss_on_player(&mut state);
        resolve_boss_contact(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES);
        assert!(state.effects.is_active(EffectKind::Shield));

        let mut state = GameState::new(1);
        state.ultimate.active_ticks = 5;
        boss_on_player(&mut state);
        resolve_boss_contact(&mut state);
        assert_eq!(state.player.lives, BASE_LIVES);
        assert!(state.drain_events().is_empty());
    }
}
