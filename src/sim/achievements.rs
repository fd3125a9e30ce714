//! One-shot achievements
//!
//! Each achievement pays its coin reward exactly once; the flags live in the
//! profile so they survive between runs.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};

/// Achievement types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// Reach a combo of 10
    Combo10,
    /// Reach a combo of 50
    Combo50,
    /// Defeat a boss for the first time
    BossSlayer,
    /// Reach a run score of 100
    Score100,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::Combo10,
        Achievement::Combo50,
        Achievement::BossSlayer,
        Achievement::Score100,
    ];

    /// Coins paid on unlock
    pub fn reward(self) -> u32 {
        match self {
            Achievement::Combo10 => 10,
            Achievement::Combo50 => 50,
            Achievement::BossSlayer => 100,
            Achievement::Score100 => 25,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Achievement::Combo10 => "Combo x10",
            Achievement::Combo50 => "Combo x50",
            Achievement::BossSlayer => "Boss Slayer",
            Achievement::Score100 => "Century",
        }
    }
}

/// Unlocked achievement flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementFlags {
    pub combo_10: bool,
    pub combo_50: bool,
    pub boss_slayer: bool,
    pub score_100: bool,
}

impl AchievementFlags {
    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        match achievement {
            Achievement::Combo10 => self.combo_10,
            Achievement::Combo50 => self.combo_50,
            Achievement::BossSlayer => self.boss_slayer,
            Achievement::Score100 => self.score_100,
        }
    }

    fn set(&mut self, achievement: Achievement) {
        match achievement {
            Achievement::Combo10 => self.combo_10 = true,
            Achievement::Combo50 => self.combo_50 = true,
            Achievement::BossSlayer => self.boss_slayer = true,
            Achievement::Score100 => self.score_100 = true,
        }
    }

    pub fn unlocked_count(&self) -> usize {
        Achievement::ALL
            .iter()
            .filter(|&&a| self.is_unlocked(a))
            .count()
    }
}

/// Unlock an achievement, paying its reward once. Returns true on first unlock.
pub fn unlock(state: &mut GameState, achievement: Achievement) -> bool {
    if state.profile.achievements.is_unlocked(achievement) {
        return false;
    }
    state.profile.achievements.set(achievement);
    state.profile.coins += achievement.reward();
    log::info!(
        "Achievement unlocked: {} (+{} coins)",
        achievement.name(),
        achievement.reward()
    );
    state.emit(GameEvent::AchievementUnlocked(achievement));
    true
}

/// Check the combo and score achievements against the current state
pub fn check_achievements(state: &mut GameState) {
    if state.combo >= 10 {
        unlock(state, Achievement::Combo10);
    }
    if state.combo >= 50 {
        unlock(state, Achievement::Combo50);
    }
    if state.run_score >= 100 {
        unlock(state, Achievement::Score100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_achievements_pay_once() {
        let mut state = GameState::new(1);
        state.combo = 10;
        check_achievements(&mut state);
        assert_eq!(state.coins(), 10);
        check_achievements(&mut state);
        assert_eq!(state.coins(), 10);
        assert!(state.profile.achievements.combo_10);
        assert!(!state.profile.achievements.combo_50);

        state.combo = 50;
        check_achievements(&mut state);
        assert_eq!(state.coins(), 60);
        assert_eq!(state.profile.achievements.unlocked_count(), 2);
    }

    #[test]
    fn test_score_achievement_uses_run_total() {
        let mut state = GameState::new(1);
        state.score = 5;
        state.run_score = 100;
        check_achievements(&mut state);
        assert!(state.profile.achievements.score_100);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::AchievementUnlocked(Achievement::Score100)]);
    }

    #[test]
    fn test_unlock_reports_first_time_only() {
        let mut state = GameState::new(1);
        assert!(unlock(&mut state, Achievement::BossSlayer));
        assert!(!unlock(&mut state, Achievement::BossSlayer));
        assert_eq!(state.coins(), Achievement::BossSlayer.reward());
    }
}
