//! Power-up and ultimate state machine
//!
//! Pickups either feed the ultimate meter directly or (re)start a timed
//! effect. Effects count down each tick; `Speed` is the only effect with
//! state to restore on expiry.

use super::entity::spawn_burst;
use super::state::*;

/// Movement multiplier while the speed effect is active
pub const SPEED_EFFECT_FACTOR: f32 = 1.5;
/// Particles per obstacle destroyed by the ultimate
const ULTIMATE_BURST_PARTICLES: usize = 6;

/// Collect every pickup overlapping the player and apply it
pub fn collect_pickups(state: &mut GameState) {
    let player_rect = state.player.rect();
    let mut collected = Vec::new();
    state.pickups.retain(|pickup| {
        if pickup.rect().overlaps(&player_rect) {
            collected.push(pickup.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        apply_pickup(state, kind);
    }
}

/// Resolve one collected pickup
pub fn apply_pickup(state: &mut GameState, kind: PowerUpKind) {
    state.emit(GameEvent::PowerUpCollected(kind));
    match kind.effect() {
        Some(effect) => activate(state, effect),
        None => {
            state.ultimate.charge =
                (state.ultimate.charge + ULTIMATE_PICKUP_CHARGE).min(ULTIMATE_MAX_CHARGE);
        }
    }
}

/// Start or refresh a timed effect and apply its immediate part
pub fn activate(state: &mut GameState, effect: EffectKind) {
    state.effects.set(effect, effect.duration_ticks());
    match effect {
        EffectKind::Shield => {
            state.player.lives = (state.player.lives + 1).min(state.max_lives());
        }
        EffectKind::Speed => {
            // Recomputed from the base, so a refresh never compounds
            state.player.speed = state.base_player_speed() * SPEED_EFFECT_FACTOR;
        }
        EffectKind::SlowMotion | EffectKind::Multiplier => {}
    }
}

/// Count effects down and revert the ones that expired
pub fn update_effects(state: &mut GameState) {
    for expired in state.effects.tick_down() {
        if expired == EffectKind::Speed {
            state.player.speed = state.base_player_speed();
        }
        state.emit(GameEvent::PowerUpExpired(expired));
    }
}

/// Advance the ultimate's counters and passive charge
pub fn update_ultimate(state: &mut GameState) {
    let ultimate = &mut state.ultimate;
    if ultimate.active_ticks > 0 {
        ultimate.active_ticks -= 1;
    } else if ultimate.charge < ULTIMATE_MAX_CHARGE {
        ultimate.charge = (ultimate.charge + ULTIMATE_PASSIVE_CHARGE).min(ULTIMATE_MAX_CHARGE);
    }
    ultimate.cooldown_ticks = ultimate.cooldown_ticks.saturating_sub(1);
}

/// Fire the ultimate if it is fully charged and off cooldown.
///
/// Clears every live obstacle. Returns false (and changes nothing) otherwise.
pub fn try_activate_ultimate(state: &mut GameState) -> bool {
    if !state.ultimate.is_ready() {
        return false;
    }
    state.ultimate.charge = 0.0;
    state.ultimate.active_ticks = ULTIMATE_ACTIVE_TICKS;
    state.ultimate.cooldown_ticks = ULTIMATE_COOLDOWN_TICKS;

    let destroyed = std::mem::take(&mut state.obstacles);
    for obstacle in &destroyed {
        spawn_burst(state, obstacle.pos, particle_color::ULTIMATE, ULTIMATE_BURST_PARTICLES);
    }
    log::info!("Ultimate activated, {} obstacles destroyed", destroyed.len());
    state.emit(GameEvent::UltimateActivated {
        destroyed: destroyed.len(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_ultimate_charge_pickup_bypasses_effects() {
        let mut state = GameState::new(1);
        apply_pickup(&mut state, PowerUpKind::UltimateCharge);
        assert_eq!(state.ultimate.charge, ULTIMATE_PICKUP_CHARGE);
        assert_eq!(state.effects.iter().count(), 0);

        state.ultimate.charge = 90.0;
        apply_pickup(&mut state, PowerUpKind::UltimateCharge);
        assert_eq!(state.ultimate.charge, ULTIMATE_MAX_CHARGE);
    }

    #[test]
    fn test_shield_restores_a_life_capped() {
        let mut state = GameState::new(1);
        state.player.lives = 1;
        activate(&mut state, EffectKind::Shield);
        assert_eq!(state.player.lives, 2);
        state.player.lives = state.max_lives();
        activate(&mut state, EffectKind::Shield);
        assert_eq!(state.player.lives, state.max_lives());
        assert!(state.effects.is_active(EffectKind::Shield));
    }

    #[test]
    fn test_speed_refresh_does_not_compound_and_reverts() {
        let mut state = GameState::new(1);
        let base = state.base_player_speed();
        activate(&mut state, EffectKind::Speed);
        activate(&mut state, EffectKind::Speed);
        assert_eq!(state.player.speed, base * SPEED_EFFECT_FACTOR);

        for _ in 0..EffectKind::Speed.duration_ticks() {
            update_effects(&mut state);
        }
        assert!(!state.effects.is_active(EffectKind::Speed));
        assert_eq!(state.player.speed, base);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PowerUpExpired(EffectKind::Speed)));
    }

    #[test]
    fn test_duplicate_pickup_refreshes_duration() {
        let mut state = GameState::new(1);
        activate(&mut state, EffectKind::Multiplier);
        for _ in 0..100 {
            update_effects(&mut state);
        }
        activate(&mut state, EffectKind::Multiplier);
        assert_eq!(
            state.effects.remaining(EffectKind::Multiplier),
            EffectKind::Multiplier.duration_ticks()
        );
    }

    #[test]
    fn test_passive_charge_only_while_inactive() {
        let mut state = GameState::new(1);
        update_ultimate(&mut state);
        assert!((state.ultimate.charge - ULTIMATE_PASSIVE_CHARGE).abs() < 1e-6);

        state.ultimate.active_ticks = 5;
        let before = state.ultimate.charge;
        update_ultimate(&mut state);
        assert_eq!(state.ultimate.charge, before);
        assert_eq!(state.ultimate.active_ticks, 4);
    }

    #[test]
    fn test_activation_gated_on_full_charge_and_cooldown() {
        let mut state = GameState::new(1);
        state.ultimate.charge = 99.0;
        assert!(!try_activate_ultimate(&mut state));
        assert_eq!(state.ultimate.charge, 99.0);

        state.ultimate.charge = ULTIMATE_MAX_CHARGE;
        state.ultimate.cooldown_ticks = 1;
        assert!(!try_activate_ultimate(&mut state));
        assert!(!state.ultimate.is_active());
    }

    #[test]
    fn test_activation_clears_obstacles() {
        let mut state = GameState::new(1);
        for i in 0..5 {
            state.push_obstacle(ObstacleKind::Normal, Vec2::new(100.0 + i as f32 * 50.0, 100.0));
        }
        state.ultimate.charge = ULTIMATE_MAX_CHARGE;
        assert!(try_activate_ultimate(&mut state));
        assert!(state.obstacles.is_empty());
        assert_eq!(state.ultimate.charge, 0.0);
        assert_eq!(state.ultimate.cooldown_ticks, ULTIMATE_COOLDOWN_TICKS);
        assert_eq!(state.ultimate.active_ticks, ULTIMATE_ACTIVE_TICKS);
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_collect_pickup_on_overlap() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state.pickups.push(PowerUp {
            id,
            kind: PowerUpKind::SlowMotion,
            pos: state.player.pos,
        });
        state.pickups.push(PowerUp {
            id: id + 1,
            kind: PowerUpKind::Shield,
            pos: Vec2::new(state.player.pos.x, 0.0),
        });
        collect_pickups(&mut state);
        assert_eq!(state.pickups.len(), 1);
        assert!(state.effects.is_active(EffectKind::SlowMotion));
        assert!(!state.effects.is_active(EffectKind::Shield));
    }
}
