//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`. There are no
//! statics: each component takes `&mut GameState` and the run controller in
//! `tick` decides the order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::achievements::Achievement;
use super::level::LevelParams;
use super::rect::Rect;
use super::rng::SimRng;
use crate::consts::*;
use crate::highscores::HighScoreRecord;
use crate::profile::Profile;

/// Current phase of the run controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu / upgrade shop
    Menu,
    /// Active gameplay
    Playing,
    /// Level cleared, waiting for confirm to start the next one
    LevelTransition,
    /// Run lost (shown briefly before returning to the menu)
    GameOver,
    /// Final level cleared, celebration running
    Victory,
}

/// Menu entries, in cursor order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    Start,
    BuyLife,
    BuySpeed,
    BuyCoinMultiplier,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Start,
        MenuItem::BuyLife,
        MenuItem::BuySpeed,
        MenuItem::BuyCoinMultiplier,
        MenuItem::Quit,
    ];
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Normal,
    Fast,
    Slow,
    /// Drifts sideways, reflecting off the walls
    Bouncy,
    /// Breaks into two shards halfway down
    Splitter,
    /// Steers toward the player
    Homing,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::Normal,
        ObstacleKind::Fast,
        ObstacleKind::Slow,
        ObstacleKind::Bouncy,
        ObstacleKind::Splitter,
        ObstacleKind::Homing,
    ];

    /// Side length in pixels
    pub fn size(self) -> f32 {
        match self {
            ObstacleKind::Normal | ObstacleKind::Bouncy => 30.0,
            ObstacleKind::Fast => 24.0,
            ObstacleKind::Slow => 40.0,
            ObstacleKind::Splitter => 36.0,
            ObstacleKind::Homing => 26.0,
        }
    }

    /// Added to the level's base fall speed (pixels/s)
    pub fn speed_offset(self) -> f32 {
        match self {
            ObstacleKind::Normal | ObstacleKind::Bouncy => 0.0,
            ObstacleKind::Fast => 180.0,
            ObstacleKind::Slow => -120.0,
            ObstacleKind::Splitter | ObstacleKind::Homing => -60.0,
        }
    }
}

/// Horizontal drift of bouncy obstacles (pixels/s)
pub const BOUNCE_SPEED: f32 = 150.0;
/// Homing steering rate (pixels/s)
pub const HOMING_STEP: f32 = 90.0;
/// Splitter shard size
pub const SHARD_SIZE: f32 = 18.0;
/// Slowest an obstacle may fall, whatever its offset (pixels/s)
pub const MIN_FALL_SPEED: f32 = 60.0;

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    /// Fall speed before world multipliers (pixels/s)
    pub speed: f32,
    /// Cosmetic rotation (radians)
    pub rotation: f32,
    /// Horizontal direction for bouncy obstacles (+1 right, -1 left)
    pub bounce_dir: Option<f32>,
    /// X coordinate a homing obstacle is steering toward
    pub homing_target: Option<f32>,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, base_fall_speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            size: kind.size(),
            speed: (base_fall_speed + kind.speed_offset()).max(MIN_FALL_SPEED),
            rotation: 0.0,
            bounce_dir: (kind == ObstacleKind::Bouncy).then_some(1.0),
            homing_target: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Whether the obstacle has reached the playfield bottom
    pub fn crossed_bottom(&self) -> bool {
        self.pos.y >= PLAYFIELD_HEIGHT
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Speed,
    SlowMotion,
    Multiplier,
    UltimateCharge,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Shield,
        PowerUpKind::Speed,
        PowerUpKind::SlowMotion,
        PowerUpKind::Multiplier,
        PowerUpKind::UltimateCharge,
    ];

    /// The timed effect this pickup activates (`UltimateCharge` has none)
    pub fn effect(self) -> Option<EffectKind> {
        match self {
            PowerUpKind::Shield => Some(EffectKind::Shield),
            PowerUpKind::Speed => Some(EffectKind::Speed),
            PowerUpKind::SlowMotion => Some(EffectKind::SlowMotion),
            PowerUpKind::Multiplier => Some(EffectKind::Multiplier),
            PowerUpKind::UltimateCharge => None,
        }
    }
}

/// Power-up pickup size
pub const PICKUP_SIZE: f32 = 28.0;
/// Power-up fall speed, unaffected by slow-motion or the ultimate (pixels/s)
pub const PICKUP_FALL_SPEED: f32 = 180.0;

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, PICKUP_SIZE)
    }
}

/// Timed effect kinds (the key set of `ActiveEffects`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Shield,
    Speed,
    SlowMotion,
    Multiplier,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Shield,
        EffectKind::Speed,
        EffectKind::SlowMotion,
        EffectKind::Multiplier,
    ];

    /// Duration granted on pickup (ticks)
    pub fn duration_ticks(self) -> u32 {
        match self {
            EffectKind::Shield => 600,
            EffectKind::Speed => 300,
            EffectKind::SlowMotion => 300,
            EffectKind::Multiplier => 600,
        }
    }

    fn index(self) -> usize {
        match self {
            EffectKind::Shield => 0,
            EffectKind::Speed => 1,
            EffectKind::SlowMotion => 2,
            EffectKind::Multiplier => 3,
        }
    }
}

/// Active power-up effects: remaining ticks per effect kind, 0 = inactive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    remaining: [u32; 4],
}

impl ActiveEffects {
    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.remaining[kind.index()] > 0
    }

    pub fn remaining(&self, kind: EffectKind) -> u32 {
        self.remaining[kind.index()]
    }

    /// Set (or refresh) an effect's remaining duration
    pub fn set(&mut self, kind: EffectKind, ticks: u32) {
        self.remaining[kind.index()] = ticks;
    }

    pub fn remove(&mut self, kind: EffectKind) {
        self.remaining[kind.index()] = 0;
    }

    pub fn clear(&mut self) {
        self.remaining = [0; 4];
    }

    /// Active effects with their remaining durations
    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, u32)> + '_ {
        EffectKind::ALL
            .into_iter()
            .map(|k| (k, self.remaining(k)))
            .filter(|&(_, t)| t > 0)
    }

    /// Count every active effect down one tick; returns the kinds that expired
    pub fn tick_down(&mut self) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in EffectKind::ALL {
            let slot = &mut self.remaining[kind.index()];
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }
}

/// Ultimate ability constants
pub const ULTIMATE_MAX_CHARGE: f32 = 100.0;
pub const ULTIMATE_PASSIVE_CHARGE: f32 = 0.1;
pub const ULTIMATE_PICKUP_CHARGE: f32 = 25.0;
pub const ULTIMATE_ACTIVE_TICKS: u32 = 180;
pub const ULTIMATE_COOLDOWN_TICKS: u32 = 300;

/// Ultimate ability meter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ultimate {
    /// 0..=ULTIMATE_MAX_CHARGE
    pub charge: f32,
    /// Ticks of active time left
    pub active_ticks: u32,
    /// Ticks until the ultimate may fire again
    pub cooldown_ticks: u32,
}

impl Ultimate {
    pub fn is_active(&self) -> bool {
        self.active_ticks > 0
    }

    pub fn is_ready(&self) -> bool {
        self.charge >= ULTIMATE_MAX_CHARGE && self.cooldown_ticks == 0
    }
}

/// Boss constants
pub const BOSS_SIZE: Vec2 = Vec2::new(120.0, 60.0);
pub const BOSS_Y: f32 = 80.0;
pub const BOSS_SWAY: f32 = 280.0;

/// The boss (at most one exists)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub health: f32,
    pub max_health: f32,
    /// Center position
    pub pos: Vec2,
    /// Which attack pattern fires next
    pub pattern: u8,
    /// Ticks since spawn
    pub timer: u32,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, BOSS_SIZE)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub lives: u8,
    /// Ticks of damage immunity left
    pub invulnerable_ticks: u32,
    /// Current movement speed (pixels/s)
    pub speed: f32,
    /// Recent centers, newest first (presentation only)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Player {
    pub fn new(lives: u8, speed: f32) -> Self {
        Self {
            pos: Vec2::new(
                PLAYFIELD_WIDTH / 2.0,
                PLAYFIELD_HEIGHT - PLAYER_BOTTOM_GAP - PLAYER_HEIGHT / 2.0,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            lives,
            invulnerable_ticks: 0,
            speed,
            trail: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Move horizontally, staying inside the playfield
    pub fn move_by(&mut self, dx: f32) {
        let half = self.size.x / 2.0;
        self.pos.x = (self.pos.x + dx).clamp(half, PLAYFIELD_WIDTH - half);
    }

    /// Record current position to the trail
    pub fn record_trail(&mut self, max_len: usize) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(max_len);
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Particle color keys
pub mod particle_color {
    pub const DEBRIS: u32 = 0;
    pub const SHIELD: u32 = 1;
    pub const ULTIMATE: u32 = 2;
    pub const BOSS: u32 = 3;
    pub const CONFETTI: u32 = 100;
}

/// Caps on presentation state, from the quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimLimits {
    pub max_particles: usize,
    pub trail_length: usize,
}

impl Default for SimLimits {
    fn default() -> Self {
        Self {
            max_particles: 256,
            trail_length: 8,
        }
    }
}

/// Discrete events emitted by a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player lost a life
    Hit { lives_left: u8 },
    /// Shield absorbed a hit
    ShieldBlocked,
    /// Obstacle crossed the bottom without touching the player
    Dodge { points: u32 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(EffectKind),
    UltimateActivated { destroyed: usize },
    BossSpawned { health: f32 },
    BossAttack { pattern: u8 },
    BossDefeated { coins: u32 },
    AchievementUnlocked(Achievement),
    LevelWin { level: u32 },
    LevelStart { level: u32 },
    CelebrationStart,
    GameOver,
    /// Run finished (win or lose); `new_record` if the stored record improved
    RunEnded {
        score: u32,
        max_combo: u32,
        new_record: bool,
    },
    Purchased(MenuItem),
    PurchaseDenied(MenuItem),
    QuitRequested,
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// The single random source
    pub rng: SimRng,
    pub phase: GamePhase,
    /// Index into `MenuItem::ALL`
    pub menu_cursor: usize,
    /// Current level (1-based)
    pub level: u32,
    pub params: LevelParams,
    /// Score within the current level
    pub score: u32,
    /// Score accumulated over the whole run
    pub run_score: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Countdown for timed phases (game over screen, celebration)
    pub phase_ticks: u32,
    pub player: Player,
    /// Obstacles in insertion order (oldest first)
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub ultimate: Ultimate,
    pub boss: Option<Boss>,
    /// A boss was already beaten on this level
    pub boss_defeated_this_level: bool,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub obstacle_spawn_timer: u32,
    pub powerup_spawn_timer: u32,
    /// Coins, upgrades and achievements carried between runs
    pub profile: Profile,
    /// Best score / combo on record
    pub records: HighScoreRecord,
    pub limits: SimLimits,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Quit was requested; the session should stop
    pub quit_requested: bool,
    next_id: u32,
}

impl GameState {
    /// Create a new game state in the menu with the given seed
    pub fn new(seed: u64) -> Self {
        let profile = Profile::default();
        Self {
            rng: SimRng::new(seed),
            phase: GamePhase::Menu,
            menu_cursor: 0,
            level: 1,
            params: LevelParams::for_level(1),
            score: 0,
            run_score: 0,
            combo: 0,
            max_combo: 0,
            time_ticks: 0,
            phase_ticks: 0,
            player: Player::new(BASE_LIVES, PLAYER_BASE_SPEED),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            effects: ActiveEffects::default(),
            ultimate: Ultimate::default(),
            boss: None,
            boss_defeated_this_level: false,
            particles: Vec::new(),
            obstacle_spawn_timer: 0,
            powerup_spawn_timer: 0,
            profile,
            records: HighScoreRecord::default(),
            limits: SimLimits::default(),
            events: Vec::new(),
            quit_requested: false,
            next_id: 1,
        }
    }

    /// Install saved progress; the player picks up the upgraded lives and speed
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self.player = Player::new(self.max_lives(), self.base_player_speed());
        self
    }

    pub fn with_records(mut self, records: HighScoreRecord) -> Self {
        self.records = records;
        self
    }

    pub fn with_limits(mut self, limits: SimLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }

    pub fn coins(&self) -> u32 {
        self.profile.coins
    }

    /// Lives cap: base plus the permanent upgrade
    pub fn max_lives(&self) -> u8 {
        BASE_LIVES + self.profile.upgrades.lives
    }

    /// Movement speed without temporary effects (pixels/s)
    pub fn base_player_speed(&self) -> f32 {
        PLAYER_BASE_SPEED + PLAYER_SPEED_PER_UPGRADE * self.profile.upgrades.speed as f32
    }

    /// Points for one dodge: 1, +1 with the multiplier, + the coin upgrade
    pub fn dodge_points(&self) -> u32 {
        let multiplier = u32::from(self.effects.is_active(EffectKind::Multiplier));
        1 + multiplier + self.profile.upgrades.coin_multiplier as u32
    }

    /// Add an obstacle and evict the oldest beyond the level cap
    pub fn push_obstacle(&mut self, kind: ObstacleKind, pos: Vec2) {
        let id = self.next_entity_id();
        let obstacle = Obstacle::new(id, kind, pos, self.params.base_fall_speed);
        self.obstacles.push(obstacle);
        super::entity::enforce_obstacle_cap(&mut self.obstacles, self.params.max_obstacles);
    }

    /// Add a particle, evicting the oldest beyond the particle cap
    pub fn push_particle(&mut self, particle: Particle) {
        if self.limits.max_particles == 0 {
            return;
        }
        while self.particles.len() >= self.limits.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Clamp any invariant that drifted out of range
    pub fn clamp_invariants(&mut self) {
        self.ultimate.charge = self.ultimate.charge.clamp(0.0, ULTIMATE_MAX_CHARGE);
        let max_lives = self.max_lives();
        if self.player.lives > max_lives {
            log::warn!("lives {} above cap {}, clamping", self.player.lives, max_lives);
            self.player.lives = max_lives;
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.health = boss.health.clamp(0.0, boss.max_health);
        }
        super::entity::enforce_obstacle_cap(&mut self.obstacles, self.params.max_obstacles);
        if self.particles.len() > self.limits.max_particles {
            let excess = self.particles.len() - self.limits.max_particles;
            self.particles.drain(..excess);
        }
    }
}
