//! Player profile: coins, permanent upgrades and achievement flags
//!
//! Survives between runs and is saved next to the high-score record.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{self, PersistenceError};
use crate::sim::achievements::AchievementFlags;

/// Highest level any upgrade can reach
pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Permanent upgrade kinds sold in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// +1 maximum life per level
    Lives,
    /// Faster paddle
    Speed,
    /// +1 point and coin per dodge per level
    CoinMultiplier,
}

impl UpgradeKind {
    /// Coins needed to buy the next level
    pub fn cost(self, current_level: u8) -> u32 {
        50 * (current_level as u32 + 1)
    }
}

/// Purchased upgrade levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    pub lives: u8,
    pub speed: u8,
    pub coin_multiplier: u8,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Lives => self.lives,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::CoinMultiplier => self.coin_multiplier,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u8 {
        match kind {
            UpgradeKind::Lives => &mut self.lives,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::CoinMultiplier => &mut self.coin_multiplier,
        }
    }

    /// Clamp levels read from disk into range
    fn sanitize(&mut self) {
        self.lives = self.lives.min(MAX_UPGRADE_LEVEL);
        self.speed = self.speed.min(MAX_UPGRADE_LEVEL);
        self.coin_multiplier = self.coin_multiplier.min(MAX_UPGRADE_LEVEL);
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{0:?} is already at the maximum level")]
    MaxedOut(UpgradeKind),
    #[error("need {cost} coins, have {have}")]
    InsufficientCoins { cost: u32, have: u32 },
}

/// Between-run progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub coins: u32,
    pub upgrades: Upgrades,
    pub achievements: AchievementFlags,
}

impl Profile {
    /// Buy the next level of an upgrade. Returns the new level.
    pub fn purchase(&mut self, kind: UpgradeKind) -> Result<u8, PurchaseError> {
        let level = self.upgrades.level(kind);
        if level >= MAX_UPGRADE_LEVEL {
            return Err(PurchaseError::MaxedOut(kind));
        }
        let cost = kind.cost(level);
        if self.coins < cost {
            return Err(PurchaseError::InsufficientCoins {
                cost,
                have: self.coins,
            });
        }
        self.coins -= cost;
        let slot = self.upgrades.level_mut(kind);
        *slot += 1;
        Ok(*slot)
    }

    /// Load the profile; missing or malformed files give a fresh profile
    pub fn load(path: &Path) -> Self {
        let mut profile: Self = persistence::load_or_default(path);
        profile.upgrades.sanitize();
        profile
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)
    }
}
