//! Read-only view of the simulation for a renderer
//!
//! Borrowed from `GameState` after each tick. Nothing here can mutate the
//! simulation.

use glam::Vec2;

use super::rect::Rect;
use super::state::*;

/// Boss state as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossView {
    pub pos: Vec2,
    pub rect: Rect,
    pub health: f32,
    pub max_health: f32,
}

impl BossView {
    /// Health as a 0-1 fraction (for a health bar)
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }
}

/// Ultimate meter as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UltimateView {
    pub charge: f32,
    pub max_charge: f32,
    pub active: bool,
    pub cooldown_ticks: u32,
}

/// Scoreboard values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub level: u32,
    pub score: u32,
    pub run_score: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub coins: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub high_score: u32,
    /// The run so far beats the stored record
    pub new_best: bool,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub menu_cursor: usize,
    pub player_rect: Rect,
    /// Blink while invulnerable
    pub player_invulnerable: bool,
    pub trail: &'a [Vec2],
    pub obstacles: &'a [Obstacle],
    pub pickups: &'a [PowerUp],
    pub particles: &'a [Particle],
    pub boss: Option<BossView>,
    pub effects: Vec<(EffectKind, u32)>,
    pub ultimate: UltimateView,
    pub hud: Hud,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            menu_cursor: state.menu_cursor,
            player_rect: state.player.rect(),
            player_invulnerable: state.player.invulnerable_ticks > 0,
            trail: &state.player.trail,
            obstacles: &state.obstacles,
            pickups: &state.pickups,
            particles: &state.particles,
            boss: state.boss.as_ref().map(|b| BossView {
                pos: b.pos,
                rect: b.rect(),
                health: b.health,
                max_health: b.max_health,
            }),
            effects: state.effects.iter().collect(),
            ultimate: UltimateView {
                charge: state.ultimate.charge,
                max_charge: ULTIMATE_MAX_CHARGE,
                active: state.ultimate.is_active(),
                cooldown_ticks: state.ultimate.cooldown_ticks,
            },
            hud: Hud {
                level: state.level,
                score: state.score,
                run_score: state.run_score,
                lives: state.player.lives,
                max_lives: state.max_lives(),
                coins: state.coins(),
                combo: state.combo,
                max_combo: state.max_combo,
                high_score: state.records.high_score,
                new_best: state.records.qualifies(state.run_score),
            },
        }
    }

    /// The menu entry under the cursor, while in the menu
    pub fn selected_menu_item(&self) -> Option<MenuItem> {
        (self.phase == GamePhase::Menu)
            .then(|| MenuItem::ALL.get(self.menu_cursor).copied())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(1);
        state.effects.set(EffectKind::Shield, 42);
        state.score = 7;
        state.boss = Some(Boss {
            health: 30.0,
            max_health: 120.0,
            pos: Vec2::new(400.0, BOSS_Y),
            pattern: 0,
            timer: 0,
        });
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.effects, vec![(EffectKind::Shield, 42)]);
        assert_eq!(snap.hud.score, 7);
        assert!(!snap.hud.new_best);
        assert_eq!(snap.hud.lives, state.player.lives);
        let boss = snap.boss.unwrap();
        assert!((boss.health_fraction() - 0.25).abs() < 1e-6);
        assert_eq!(snap.selected_menu_item(), Some(MenuItem::Start));
    }
}
