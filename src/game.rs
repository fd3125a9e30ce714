//! Game session
//!
//! Owns the simulation state and its side-effect sinks. Runs fixed-timestep
//! substeps for each frame, then drains the tick events into audio and
//! persistence. The high-score record is written only when a run ends with a
//! new record; quitting stops the session without writing anything.

use crate::audio::AudioManager;
use crate::consts::*;
use crate::highscores::HighScoreRecord;
use crate::persistence::DataDir;
use crate::profile::Profile;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};

/// Longest frame the accumulator will accept (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Game instance holding all state
pub struct Game {
    state: GameState,
    data: DataDir,
    audio: AudioManager,
    accumulator: f32,
    running: bool,
    /// Track phase for transition logging
    last_phase: GamePhase,
}

impl Game {
    /// Start a session: read the record and profile once, apply settings
    pub fn new(seed: u64, settings: &Settings, data: DataDir, mut audio: AudioManager) -> Self {
        let records = HighScoreRecord::load(&data.highscore_path());
        let profile = Profile::load(&data.profile_path());
        log::info!(
            "High score {} (combo {}), {} coins",
            records.high_score,
            records.max_combo,
            profile.coins
        );
        audio.apply_settings(settings);
        let state = GameState::new(seed)
            .with_records(records)
            .with_profile(profile)
            .with_limits(settings.sim_limits());
        Self::from_state(state, data, audio)
    }

    /// Wrap an existing state (tests, replays)
    pub fn from_state(state: GameState, data: DataDir, audio: AudioManager) -> Self {
        let last_phase = state.phase;
        Self {
            state,
            data,
            audio,
            accumulator: 0.0,
            running: true,
            last_phase,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for setup in tests and tools
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.state)
    }

    /// Run as many fixed ticks as `frame_dt` covers. Returns the tick count.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && self.running {
            self.step(&input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input = TickInput {
                move_left: input.move_left,
                move_right: input.move_right,
                autopilot: input.autopilot,
                ..Default::default()
            };
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Advance exactly one tick and dispatch its events
    pub fn step(&mut self, input: &TickInput) {
        if !self.running {
            return;
        }
        tick(&mut self.state, input, SIM_DT);

        for event in self.state.drain_events() {
            self.audio.handle_event(&event);
            self.handle_event(&event);
        }

        if self.state.phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
            self.last_phase = self.state.phase;
        }
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::QuitRequested => {
                self.running = false;
            }
            GameEvent::RunEnded {
                score,
                max_combo,
                new_record,
            } => {
                log::info!("Run ended: {} points, best combo {}", score, max_combo);
                if *new_record {
                    self.save_records();
                }
                self.save_profile();
            }
            GameEvent::Purchased(_) => self.save_profile(),
            _ => {}
        }
    }

    fn save_records(&self) {
        if let Err(e) = self.state.records.save(&self.data.highscore_path()) {
            log::warn!("Could not save high score: {}", e);
        }
    }

    fn save_profile(&self) {
        if let Err(e) = self.state.profile.save(&self.data.profile_path()) {
            log::warn!("Could not save profile: {}", e);
        }
    }
}
