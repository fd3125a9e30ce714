//! Game settings and preferences
//!
//! Persisted as `settings.json` in the data directory, separately from the
//! high-score record and profile.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};
use crate::sim::SimLimits;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Case-insensitive preset name, as given on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 512,
        }
    }

    /// Player trail length for this preset
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 8,
            QualityPreset::High => 16,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed (None = derive from the clock)
    pub seed: Option<u64>,

    /// Presentation quality preset
    pub quality: QualityPreset,
    /// Particle effects (bursts, confetti)
    pub particles: bool,
    /// Player trail
    pub trails: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Where the high-score record and profile live (None = next to this file)
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            quality: QualityPreset::Medium,
            particles: true,
            trails: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            data_dir: None,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Caps handed to the simulation
    pub fn sim_limits(&self) -> SimLimits {
        SimLimits {
            max_particles: self.max_particles(),
            trail_length: if self.trails {
                self.quality.trail_length()
            } else {
                0
            },
        }
    }

    /// Effective sound-effect gain (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings; missing or malformed files give defaults
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
