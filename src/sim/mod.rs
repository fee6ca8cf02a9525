//! Deterministic run engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies (collaborators sit behind
//!   the `EventSink` and `ProfileStore` traits)

pub mod collision;
pub mod events;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod wallet;

pub use collision::Aabb;
pub use events::{EventSink, GameEvent, NullSink};
pub use state::{
    BoostState, Coin, MAX_PARTICLES, Obstacle, ObstacleKind, Particle, ParticleKind, Player, RenderSnapshot,
    RunConfig, RunPhase, RunSession,
};
pub use tick::{Intent, apply_intent, tick};
pub use upgrades::{UpgradeKind, UpgradeLevels, UpgradePricing};
pub use wallet::{Currency, GameplaySettings, InsufficientFunds, ProfileSnapshot, ProfileStore, Wallet};
