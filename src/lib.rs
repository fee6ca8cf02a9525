//! Neon Rush - A neon lane-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic run engine (spawning, physics, collisions, run lifecycle)
//! - `input`: Pointer/key gesture mapping into run intents
//! - `profile`: Wallet, upgrades, purchases and local run history
//! - `settings`: Player preferences (volume, vibration, particles)
//! - `hud`: Overlay panel layout and text
//! - `audio`: Web Audio sound effects, music and haptics (wasm only)
//! - `autopilot`: Computer driver for headless runs

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod autopilot;
pub mod highscores;
pub mod hud;
pub mod input;
pub mod profile;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, RunRecord};
pub use input::{InputMapper, IntentQueue};
pub use profile::{Profile, ShopError, Skin};
pub use settings::Settings;
pub use sim::{Currency, InsufficientFunds, Intent, ProfileStore, RunPhase, RunSession, Wallet};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field (canvas) dimensions in pixels
    pub const FIELD_WIDTH: f32 = 420.0;
    pub const FIELD_HEIGHT: f32 = 720.0;
    pub const LANE_COUNT: usize = 5;

    /// Player car
    pub const PLAYER_WIDTH: f32 = 42.0;
    pub const PLAYER_HEIGHT: f32 = 70.0;
    /// Player y as a fraction of field height
    pub const PLAYER_Y_FRACTION: f32 = 0.82;
    /// Fraction of the remaining lane offset closed per tick (before handling)
    pub const LANE_SMOOTHING: f32 = 0.22;

    /// Speed model: (BASE_SPEED + score / SPEED_RAMP_DIVISOR) * boost, capped
    pub const BASE_SPEED: f32 = 3.2;
    pub const SPEED_CAP: f32 = 8.0;
    pub const SPEED_RAMP_DIVISOR: f32 = 220.0;
    /// Descent per tick relative to speed
    pub const OBSTACLE_SPEED_FACTOR: f32 = 3.2;
    pub const COIN_SPEED_FACTOR: f32 = 2.9;
    pub const FAST_OBSTACLE_MULTIPLIER: f32 = 1.25;
    /// Road dash scroll relative to speed
    pub const ROAD_SCROLL_FACTOR: f32 = 4.4;

    /// Spawning
    pub const OBSTACLE_SPAWN_Y: f32 = -90.0;
    pub const COIN_SPAWN_Y: f32 = -50.0;
    pub const OBSTACLE_BASE_WIDTH: f32 = 44.0;
    pub const OBSTACLE_WIDTH_JITTER: f32 = 10.0;
    pub const OBSTACLE_BASE_HEIGHT: f32 = 70.0;
    pub const OBSTACLE_HEIGHT_JITTER: f32 = 18.0;
    pub const FAST_OBSTACLE_CHANCE: f64 = 0.15;
    pub const COIN_RADIUS: f32 = 14.0;
    pub const OBSTACLE_BASE_INTERVAL: u64 = 46;
    pub const OBSTACLE_MIN_INTERVAL: u64 = 26;
    pub const OBSTACLE_INTERVAL_SCORE_STEP: u64 = 900;
    pub const COIN_INTERVAL: u64 = 66;
    pub const COIN_INTERVAL_SIMPLE: u64 = 70;

    /// Despawn once below these offsets past the bottom edge
    pub const OBSTACLE_DESPAWN_MARGIN: f32 = 160.0;
    pub const COIN_DESPAWN_MARGIN: f32 = 90.0;

    /// Magnet: attraction range slack and per-tick pull fraction
    pub const MAGNET_SLACK: f32 = 40.0;
    pub const MAGNET_PULL: f32 = 0.06;

    /// Boost speed multiplier before the boost upgrade power
    pub const BOOST_BASE_MULTIPLIER: f32 = 1.35;

    /// Screen shake
    pub const CRASH_SHAKE: f32 = 10.0;
    pub const SHAKE_DECAY: f32 = 0.85;
    pub const SHAKE_EPSILON: f32 = 0.4;

    /// Economy
    pub const SCORE_PER_REWARD_COIN: u64 = 70;
    pub const REVIVE_GEM_COST: u64 = 10;
    /// Obstacles closer than this above the player are cleared on revive
    pub const REVIVE_CLEARANCE: f32 = 140.0;
}

/// Center x of lane `index` for a field of `width` split into `lane_count` lanes
#[inline]
pub fn lane_center(index: usize, lane_count: usize, width: f32) -> f32 {
    let lane_count = lane_count.max(1);
    width * (2 * index + 1) as f32 / (2 * lane_count) as f32
}
