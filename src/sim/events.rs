//! Discrete notifications emitted by the run engine
//!
//! Audio, haptics, rendering effects and leaderboard submission all react to
//! these; the engine never waits on any of them.

use serde::{Deserialize, Serialize};

/// Something noteworthy that happened during a tick or intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh run began (start or retry)
    RunStarted,
    /// The player moved to another lane
    LaneChanged { lane: usize },
    /// A coin was picked up at the given position
    CoinCollected { x: f32, y: f32 },
    /// Boost was triggered
    BoostStarted,
    /// The player hit an obstacle
    Collision,
    /// The run ended; `reward` was credited to the wallet
    RunEnded {
        score: u64,
        coins_collected: u64,
        reward: u64,
        new_highscore: bool,
    },
    /// A crashed run was continued for gems
    Revived,
}

/// Receiver of engine events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Sink that drops everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}
