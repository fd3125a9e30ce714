//! Audio boundary
//!
//! The simulation emits `GameEvent`s; the audio manager maps the audible ones
//! to `SoundCue`s and forwards them to a backend. Backend failures are logged
//! and otherwise ignored: they never touch gameplay state or timing.

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player lost a life
    Hit,
    /// Shield absorbed a hit
    ShieldBlock,
    /// Obstacle dodged
    Dodge,
    /// Power-up collected
    PickupCollect,
    UltimateActivate,
    BossAppear,
    BossAttack,
    BossDefeat,
    Achievement,
    /// Level cleared
    LevelWin,
    /// Final level cleared, confetti starting
    CelebrationStart,
    GameOver,
    /// New high score
    HighScore,
    MenuSelect,
    MenuDenied,
}

impl SoundCue {
    /// Cue name as used by asset packs and logs
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::ShieldBlock => "shield_block",
            SoundCue::Dodge => "dodge",
            SoundCue::PickupCollect => "pickup",
            SoundCue::UltimateActivate => "ultimate",
            SoundCue::BossAppear => "boss_appear",
            SoundCue::BossAttack => "boss_attack",
            SoundCue::BossDefeat => "boss_defeat",
            SoundCue::Achievement => "achievement",
            SoundCue::LevelWin => "level_win",
            SoundCue::CelebrationStart => "celebration_start",
            SoundCue::GameOver => "game_over",
            SoundCue::HighScore => "high_score",
            SoundCue::MenuSelect => "menu_select",
            SoundCue::MenuDenied => "menu_denied",
        }
    }

    /// Relative loudness of the cue
    fn gain(self) -> f32 {
        match self {
            SoundCue::Dodge | SoundCue::BossAttack => 0.4,
            SoundCue::MenuSelect | SoundCue::MenuDenied => 0.5,
            _ => 1.0,
        }
    }

    /// The cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let cue = match event {
            GameEvent::Hit { .. } => SoundCue::Hit,
            GameEvent::ShieldBlocked => SoundCue::ShieldBlock,
            GameEvent::Dodge { .. } => SoundCue::Dodge,
            GameEvent::PowerUpCollected(_) => SoundCue::PickupCollect,
            GameEvent::UltimateActivated { .. } => SoundCue::UltimateActivate,
            GameEvent::BossSpawned { .. } => SoundCue::BossAppear,
            GameEvent::BossAttack { .. } => SoundCue::BossAttack,
            GameEvent::BossDefeated { .. } => SoundCue::BossDefeat,
            GameEvent::AchievementUnlocked(_) => SoundCue::Achievement,
            GameEvent::LevelWin { .. } => SoundCue::LevelWin,
            GameEvent::CelebrationStart => SoundCue::CelebrationStart,
            GameEvent::GameOver => SoundCue::GameOver,
            GameEvent::RunEnded {
                new_record: true, ..
            } => SoundCue::HighScore,
            GameEvent::Purchased(_) => SoundCue::MenuSelect,
            GameEvent::PurchaseDenied(_) => SoundCue::MenuDenied,
            GameEvent::PowerUpExpired(_)
            | GameEvent::LevelStart { .. }
            | GameEvent::RunEnded { .. }
            | GameEvent::QuitRequested => return None,
        };
        Some(cue)
    }
}

/// Backend failure (device missing, asset missing, ...)
#[derive(Debug, Error)]
#[error("audio backend failed to play {cue:?}: {reason}")]
pub struct AudioError {
    pub cue: SoundCue,
    pub reason: String,
}

/// A sound backend
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError>;
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Backend that logs each cue (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError> {
        log::debug!("sound {} at {:.2}", cue.name(), volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    /// Master x sfx, 0 when muted
    volume: f32,
    /// Set after the first backend failure so the log isn't flooded
    failed: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            volume: Settings::default().effective_volume(),
            failed: false,
        }
    }

    /// Manager with no backend
    pub fn silent() -> Self {
        Self::new(Box::new(NullAudio))
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a sound effect
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.volume * cue.gain();
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.sink.play(cue, vol) {
            if !self.failed {
                log::warn!("{}; further audio errors suppressed", e);
                self.failed = true;
            }
        }
    }

    /// Play the cue for an event, if any
    pub fn handle_event(&mut self, event: &GameEvent) {
        if let Some(cue) = SoundCue::for_event(event) {
            self.play(cue);
        }
    }
}
