//! Fixed timestep simulation tick
//!
//! The run controller: a phase machine over `GamePhase` that advances the
//! simulation deterministically. While playing, each tick runs
//! spawner -> entities -> power-ups/ultimate -> boss -> collision, then checks
//! for defeat and level completion.

use glam::Vec2;

use super::achievements::check_achievements;
use super::level::{LevelParams, MAX_LEVELS};
use super::state::*;
use super::{boss, collision, entity, powerup, spawner};
use crate::consts::*;
use crate::profile::UpgradeKind;

/// Coins awarded for clearing a level
pub const LEVEL_BONUS_COINS: u32 = 20;
/// Length of the game-over screen
pub const GAME_OVER_TICKS: u32 = 120;
/// Length of the victory confetti sequence
pub const CELEBRATION_TICKS: u32 = 180;
/// Confetti particles spawned per celebration tick
const CONFETTI_PER_TICK: usize = 3;
const CONFETTI_COLORS: u32 = 6;

/// Input commands for a single tick (deterministic)
///
/// Movement is level-triggered (held); everything else is edge-triggered
/// (pressed this tick). See `platform::InputLatch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire the ultimate
    pub ultimate: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub confirm: bool,
    /// Back to the menu from any phase
    pub cancel: bool,
    /// Stop the session
    pub quit: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.quit_requested {
        return;
    }
    if input.quit {
        log::info!("Quit requested");
        state.quit_requested = true;
        state.emit(GameEvent::QuitRequested);
        return;
    }

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;

    if input.cancel && state.phase != GamePhase::Menu {
        if matches!(state.phase, GamePhase::Playing | GamePhase::LevelTransition) {
            log::info!("Run abandoned on level {}", state.level);
            end_run(state);
        }
        return_to_menu(state);
        state.clamp_invariants();
        return;
    }

    match state.phase {
        GamePhase::Menu => update_menu(state, &input),
        GamePhase::Playing => update_playing(state, &input, dt),
        GamePhase::LevelTransition => {
            if input.confirm {
                state.phase = GamePhase::Playing;
                log::info!("Level {} started", state.level);
                state.emit(GameEvent::LevelStart { level: state.level });
            }
        }
        GamePhase::GameOver => {
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if input.confirm || state.phase_ticks == 0 {
                return_to_menu(state);
            }
        }
        GamePhase::Victory => {
            spawn_confetti(state);
            entity::update_particles(&mut state.particles, dt);
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if input.confirm || state.phase_ticks == 0 {
                return_to_menu(state);
            }
        }
    }

    state.clamp_invariants();
}

fn update_menu(state: &mut GameState, input: &TickInput) {
    let len = MenuItem::ALL.len();
    if input.menu_up {
        state.menu_cursor = (state.menu_cursor + len - 1) % len;
    }
    if input.menu_down {
        state.menu_cursor = (state.menu_cursor + 1) % len;
    }
    if !input.confirm {
        return;
    }

    let item = MenuItem::ALL[state.menu_cursor % len];
    match item {
        MenuItem::Start => start_run(state),
        MenuItem::BuyLife => purchase(state, item, UpgradeKind::Lives),
        MenuItem::BuySpeed => purchase(state, item, UpgradeKind::Speed),
        MenuItem::BuyCoinMultiplier => purchase(state, item, UpgradeKind::CoinMultiplier),
        MenuItem::Quit => {
            log::info!("Quit selected from menu");
            state.quit_requested = true;
            state.emit(GameEvent::QuitRequested);
        }
    }
}

fn purchase(state: &mut GameState, item: MenuItem, kind: UpgradeKind) {
    match state.profile.purchase(kind) {
        Ok(level) => {
            log::info!("Bought {:?} level {} ({} coins left)", kind, level, state.coins());
            state.player.lives = state.max_lives();
            state.player.speed = state.base_player_speed();
            state.emit(GameEvent::Purchased(item));
        }
        Err(e) => {
            log::info!("Cannot buy {:?}: {}", kind, e);
            state.emit(GameEvent::PurchaseDenied(item));
        }
    }
}

/// Reset run state and begin level 1
pub fn start_run(state: &mut GameState) {
    state.level = 1;
    state.score = 0;
    state.run_score = 0;
    state.combo = 0;
    state.max_combo = 0;
    state.player = Player::new(state.max_lives(), state.base_player_speed());
    state.effects.clear();
    state.ultimate = Ultimate::default();
    clear_transients(state);
    enter_level(state);
    state.phase = GamePhase::Playing;
    log::info!("Run started (seed {})", state.rng.seed());
    state.emit(GameEvent::LevelStart { level: 1 });
}

/// Load the current level's parameters and starting obstacles
fn enter_level(state: &mut GameState) {
    state.params = LevelParams::for_level(state.level);
    state.boss_defeated_this_level = false;
    spawner::reset_for_level(state);
}

/// Drop every transient entity
fn clear_transients(state: &mut GameState) {
    state.obstacles.clear();
    state.pickups.clear();
    state.boss = None;
    state.particles.clear();
    state.player.trail.clear();
}

fn return_to_menu(state: &mut GameState) {
    clear_transients(state);
    state.effects.clear();
    state.player.speed = state.base_player_speed();
    state.phase_ticks = 0;
    state.phase = GamePhase::Menu;
    log::info!("Back to menu");
}

fn update_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    state.player.invulnerable_ticks = state.player.invulnerable_ticks.saturating_sub(1);

    let dir = input.move_right as i8 - input.move_left as i8;
    if dir != 0 {
        let dx = dir as f32 * state.player.speed * dt;
        state.player.move_by(dx);
    }

    spawner::update_spawner(state);
    entity::update_entities(state, dt);

    powerup::collect_pickups(state);
    powerup::update_effects(state);
    powerup::update_ultimate(state);
    if input.ultimate {
        powerup::try_activate_ultimate(state);
    }

    boss::update_boss(state);
    collision::resolve_collisions(state);

    if state.player.lives == 0 {
        game_over(state);
    } else if state.score >= state.params.win_score && !state.boss_active() {
        complete_level(state);
    }
}

fn game_over(state: &mut GameState) {
    log::info!("Game over on level {} with {} points", state.level, state.run_score);
    state.emit(GameEvent::GameOver);
    end_run(state);
    state.phase = GamePhase::GameOver;
    state.phase_ticks = GAME_OVER_TICKS;
}

fn complete_level(state: &mut GameState) {
    let cleared = state.level;
    log::info!("Level {} complete", cleared);
    state.emit(GameEvent::LevelWin { level: cleared });
    check_achievements(state);

    if cleared >= MAX_LEVELS {
        state.emit(GameEvent::CelebrationStart);
        end_run(state);
        clear_transients(state);
        state.phase = GamePhase::Victory;
        state.phase_ticks = CELEBRATION_TICKS;
        return;
    }

    state.level += 1;
    state.score = 0;
    state.player.lives = state.max_lives();
    state.profile.coins += LEVEL_BONUS_COINS;
    clear_transients(state);
    enter_level(state);
    state.phase = GamePhase::LevelTransition;
}

/// Fold the run into the high-score record and announce the result
fn end_run(state: &mut GameState) {
    let (score, max_combo) = (state.run_score, state.max_combo);
    let new_record = state.records.submit(score, max_combo);
    if new_record {
        log::info!("New record: {} points, combo {}", score, max_combo);
    }
    state.emit(GameEvent::RunEnded {
        score,
        max_combo,
        new_record,
    });
}

fn spawn_confetti(state: &mut GameState) {
    for _ in 0..CONFETTI_PER_TICK {
        let x = state.rng.range_f32(0.0, PLAYFIELD_WIDTH);
        let vx = state.rng.range_f32(-60.0, 60.0);
        let vy = state.rng.range_f32(40.0, 160.0);
        let color = particle_color::CONFETTI + state.rng.index(CONFETTI_COLORS as usize) as u32;
        state.push_particle(Particle {
            pos: Vec2::new(x, 0.0),
            vel: Vec2::new(vx, vy),
            color,
            life: 1.0,
            size: 5.0,
        });
    }
}

/// Horizontal distance within which an obstacle is treated as a threat
const AUTOPILOT_CLEARANCE: f32 = 24.0;
/// How far above the player the autopilot looks
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;
const AUTOPILOT_DEADBAND: f32 = 6.0;

/// Demo-mode input: walk the menu, dodge the most dangerous obstacle, grab
/// pickups when nothing threatens, and fire the ultimate when cornered.
pub fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    match state.phase {
        GamePhase::Menu => {
            if state.menu_cursor == 0 {
                input.confirm = true;
            } else {
                input.menu_up = true;
            }
        }
        GamePhase::LevelTransition => input.confirm = true,
        GamePhase::Playing => steer(state, &mut input),
        GamePhase::GameOver | GamePhase::Victory => {}
    }
    input
}

fn steer(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    let player_top = player.rect().y;
    let reach = player.size.x / 2.0 + AUTOPILOT_CLEARANCE;

    // The lowest obstacle above the paddle that is lined up with it
    let threat = state
        .obstacles
        .iter()
        .filter(|o| {
            let bottom = o.pos.y + o.size / 2.0;
            bottom < player_top + player.size.y
                && bottom > player_top - AUTOPILOT_LOOKAHEAD
                && (o.pos.x - player.pos.x).abs() < reach + o.size / 2.0
        })
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_x = if let Some(obstacle) = threat {
        if state.ultimate.is_ready() {
            input.ultimate = true;
        }
        let half = player.size.x / 2.0;
        let escape = reach + obstacle.size / 2.0;
        let left = obstacle.pos.x - escape;
        let right = obstacle.pos.x + escape;
        let left_ok = left >= half;
        let right_ok = right <= PLAYFIELD_WIDTH - half;
        match (left_ok, right_ok) {
            (true, true) if player.pos.x < obstacle.pos.x => left,
            (true, true) => right,
            (true, false) => left,
            (false, _) => right,
        }
    } else if let Some(pickup) = state
        .pickups
        .iter()
        .filter(|p| p.pos.y < player.pos.y)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    {
        pickup.pos.x
    } else {
        PLAYFIELD_WIDTH / 2.0
    };

    let delta = target_x - player.pos.x;
    input.move_left = delta < -AUTOPILOT_DEADBAND;
    input.move_right = delta > AUTOPILOT_DEADBAND;
}
