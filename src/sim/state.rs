//! Run state and core simulation types
//!
//! All state belonging to a single run lives in `RunSession`. Nothing here
//! is global: two sessions never share entities, counters or RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::lane_center;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress (title screen)
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run is paused; nothing advances
    Paused,
    /// Run ended by a crash; may be revived or retried
    GameOver,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub half_size: Vec2,
    /// Current lane (always within `0..lane_count`)
    pub lane: usize,
    /// Destination x of the smoothed lane transition
    pub target_x: f32,
}

impl Player {
    pub fn new(lane: usize, config: &RunConfig) -> Self {
        let x = config.lane_x(lane);
        Self {
            pos: Vec2::new(x, config.player_y()),
            half_size: Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
            lane,
            target_x: x,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, self.half_size)
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Normal,
    /// Falls 1.25x faster
    Fast,
}

impl ObstacleKind {
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            ObstacleKind::Normal => 1.0,
            ObstacleKind::Fast => FAST_OBSTACLE_MULTIPLIER,
        }
    }
}

/// A car in the player's way
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub half_size: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, self.half_size)
    }
}

/// A collectible coin worth one unit of currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub radius: f32,
}

impl Coin {
    pub const VALUE: u64 = 1;
}

/// Particle colour family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Coin,
    Boost,
    Crash,
}

/// A particle for visual effects (never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub kind: ParticleKind,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Field geometry and spawn tuning for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub width: f32,
    pub height: f32,
    pub lane_count: usize,
    /// Ticks between coin spawns
    pub coin_interval: u64,
    pub spawn_obstacles: bool,
    pub spawn_coins: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            lane_count: LANE_COUNT,
            coin_interval: COIN_INTERVAL,
            spawn_obstacles: true,
            spawn_coins: true,
        }
    }
}

impl RunConfig {
    /// Reduced-feature variant with the slower coin cadence
    pub fn simple() -> Self {
        Self {
            coin_interval: COIN_INTERVAL_SIMPLE,
            ..Self::default()
        }
    }

    pub fn lane_x(&self, lane: usize) -> f32 {
        lane_center(lane, self.lane_count, self.width)
    }

    pub fn center_lane(&self) -> usize {
        self.lane_count.max(1) / 2
    }

    pub fn player_y(&self) -> f32 {
        self.height * PLAYER_Y_FRACTION
    }
}

/// Boost ability timers (orthogonal to the run phase)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoostState {
    pub active: bool,
    /// Ticks until the active boost wears off
    pub remaining: u32,
    /// Ticks until boost may be triggered again
    pub cooldown: u32,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunSession {
    /// Seed the spawner RNG was created from
    pub seed: u64,
    pub config: RunConfig,
    pub phase: RunPhase,
    /// Simulated ticks since the run started
    pub time_ticks: u64,
    /// Ticks survived; never decreases within a run
    pub score: u64,
    /// Coins picked up this run
    pub run_coins: u64,
    /// Current descent speed
    pub speed: f32,
    pub boost: BoostState,
    /// Decaying cosmetic shake intensity in pixels
    pub screen_shake: f32,
    /// Road dash scroll position (cosmetic)
    pub road_offset: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub(crate) rng: Pcg32,
}

impl RunSession {
    /// Create an idle session with the given seed
    pub fn new(seed: u64, config: RunConfig) -> Self {
        let player = Player::new(config.center_lane(), &config);
        Self {
            seed,
            phase: RunPhase::Idle,
            time_ticks: 0,
            score: 0,
            run_coins: 0,
            speed: BASE_SPEED,
            boost: BoostState::default(),
            screen_shake: 0.0,
            road_offset: 0.0,
            player,
            obstacles: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    /// Clear every run-scoped counter and entity and center the player.
    /// The RNG keeps its stream so consecutive runs differ.
    pub fn reset(&mut self) {
        self.time_ticks = 0;
        self.score = 0;
        self.run_coins = 0;
        self.speed = BASE_SPEED;
        self.boost = BoostState::default();
        self.screen_shake = 0.0;
        self.road_offset = 0.0;
        self.player = Player::new(self.config.center_lane(), &self.config);
        self.obstacles.clear();
        self.coins.clear();
        self.particles.clear();
    }

    /// Currency awarded for the run so far
    pub fn reward(&self) -> u64 {
        self.score / SCORE_PER_REWARD_COIN + self.run_coins
    }

    /// Remove obstacles near or below the player so a revived run does not
    /// crash again immediately
    pub fn clear_revive_zone(&mut self) {
        let limit = self.player.pos.y - REVIVE_CLEARANCE;
        self.obstacles.retain(|o| o.pos.y < limit);
    }

    /// Immutable view for renderers
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            phase: self.phase,
            score: self.score,
            run_coins: self.run_coins,
            speed: self.speed,
            boost_active: self.boost.active,
            boost_cooldown: self.boost.cooldown,
            screen_shake: self.screen_shake,
            road_offset: self.road_offset,
            player: &self.player,
            obstacles: &self.obstacles,
            coins: &self.coins,
            particles: &self.particles,
        }
    }
}

/// Read-only view of a session for drawing a frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderSnapshot<'a> {
    pub phase: RunPhase,
    pub score: u64,
    pub run_coins: u64,
    pub speed: f32,
    pub boost_active: bool,
    pub boost_cooldown: u32,
    pub screen_shake: f32,
    pub road_offset: f32,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub coins: &'a [Coin],
    pub particles: &'a [Particle],
}
