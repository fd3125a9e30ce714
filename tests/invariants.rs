//! Whole-simulation invariants under arbitrary input sequences

use glam::Vec2;
use proptest::prelude::*;

use rockfall::consts::*;
use rockfall::sim::collision::resolve_collisions;
use rockfall::sim::powerup::try_activate_ultimate;
use rockfall::sim::state::{ULTIMATE_COOLDOWN_TICKS, ULTIMATE_MAX_CHARGE};
use rockfall::sim::{EffectKind, GameEvent, GameState, ObstacleKind, TickInput, tick};

/// Decode one byte into a tick's input. Quit is never generated.
fn input_from_byte(b: u8) -> TickInput {
    TickInput {
        move_left: b & 0x01 != 0,
        move_right: b & 0x02 != 0,
        ultimate: b & 0x04 != 0,
        confirm: b & 0x08 != 0,
        menu_down: b & 0x10 != 0 && b & 0x20 != 0,
        menu_up: false,
        cancel: b == 0xFF,
        quit: false,
        autopilot: b & 0x40 != 0,
    }
}

fn all_unlocked(state: &mut GameState) {
    let flags = &mut state.profile.achievements;
    flags.combo_10 = true;
    flags.combo_50 = true;
    flags.boss_slayer = true;
    flags.score_100 = true;
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn bounded_state_every_tick(seed in any::<u64>(), bytes in prop::collection::vec(any::<u8>(), 1..900)) {
        let mut state = GameState::new(seed);
        // Start playing immediately so most ticks exercise gameplay
        tick(&mut state, &TickInput { confirm: true, ..Default::default() }, SIM_DT);

        for b in bytes {
            let lives_before = state.player.lives;
            tick(&mut state, &input_from_byte(b), SIM_DT);
            let events = state.drain_events();

            prop_assert!(state.ultimate.charge >= 0.0);
            prop_assert!(state.ultimate.charge <= ULTIMATE_MAX_CHARGE);
            prop_assert!(state.player.lives <= state.max_lives());
            prop_assert!(state.obstacles.len() <= state.params.max_obstacles);
            prop_assert!(state.particles.len() <= state.limits.max_particles);
            if let Some(boss) = &state.boss {
                prop_assert!(boss.health > 0.0 && boss.health <= boss.max_health);
            }

            // Lives only drop through a hit
            if state.player.lives < lives_before {
                let got_hit = events.iter().any(|e| matches!(e, GameEvent::Hit { .. }));
                prop_assert!(got_hit);
            }
        }
    }

    #[test]
    fn dodges_pay_score_and_coins_equally(
        count in 1usize..15,
        multiplier in any::<bool>(),
        upgrade in 0u8..=3,
        player_x in 60.0f32..740.0,
    ) {
        let mut state = GameState::new(1);
        all_unlocked(&mut state);
        state.player.pos.x = player_x;
        state.profile.upgrades.coin_multiplier = upgrade;
        if multiplier {
            state.effects.set(EffectKind::Multiplier, 10);
        }
        let x = if player_x > PLAYFIELD_WIDTH / 2.0 { 20.0 } else { PLAYFIELD_WIDTH - 20.0 };
        for _ in 0..count {
            state.push_obstacle(ObstacleKind::Normal, Vec2::new(x, PLAYFIELD_HEIGHT + 2.0));
        }

        let lives = state.player.lives;
        resolve_collisions(&mut state);

        let per_dodge = 1 + u32::from(multiplier) + u32::from(upgrade);
        prop_assert_eq!(state.score, per_dodge * count as u32);
        prop_assert_eq!(state.coins(), state.score);
        prop_assert_eq!(state.player.lives, lives);
        prop_assert_eq!(state.combo, count as u32);
    }

    #[test]
    fn ultimate_gated_on_full_charge_and_cooldown(
        charge in 0.0f32..=100.0,
        cooldown in 0u32..400,
        obstacles in 0usize..10,
    ) {
        let mut state = GameState::new(3);
        state.ultimate.charge = charge;
        state.ultimate.cooldown_ticks = cooldown;
        for i in 0..obstacles {
            state.push_obstacle(ObstacleKind::Normal, Vec2::new(50.0 + 60.0 * i as f32, 100.0));
        }

        let ready = charge >= ULTIMATE_MAX_CHARGE && cooldown == 0;
        prop_assert_eq!(try_activate_ultimate(&mut state), ready);
        if ready {
            prop_assert!(state.obstacles.is_empty());
            prop_assert_eq!(state.ultimate.charge, 0.0);
            prop_assert_eq!(state.ultimate.cooldown_ticks, ULTIMATE_COOLDOWN_TICKS);
        } else {
            prop_assert_eq!(state.obstacles.len(), obstacles);
            prop_assert_eq!(state.ultimate.charge, charge);
        }
    }
}
