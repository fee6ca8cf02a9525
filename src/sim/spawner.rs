//! Obstacle and coin spawning
//!
//! Cadence is driven by the tick counter; obstacle cadence tightens with
//! score but never below `OBSTACLE_MIN_INTERVAL`. Lane and size choices come
//! from the session's seeded RNG, so a seed replays the same traffic.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, Obstacle, ObstacleKind, RunSession};
use crate::consts::*;

/// Ticks between obstacle spawns at the given score
pub fn obstacle_interval(score: u64) -> u64 {
    OBSTACLE_BASE_INTERVAL
        .saturating_sub(score / OBSTACLE_INTERVAL_SCORE_STEP)
        .max(OBSTACLE_MIN_INTERVAL)
}

/// Spawn whatever is due on the current tick
pub fn spawn_due(session: &mut RunSession) {
    let t = session.time_ticks;
    if t == 0 {
        return;
    }
    if session.config.spawn_obstacles && t.is_multiple_of(obstacle_interval(session.score)) {
        spawn_obstacle(session);
    }
    let coin_interval = session.config.coin_interval.max(1);
    if session.config.spawn_coins && t.is_multiple_of(coin_interval) {
        spawn_coin(session);
    }
}

/// Push a new obstacle above the top edge in a random lane
pub fn spawn_obstacle(session: &mut RunSession) {
    let lane = session.rng.random_range(0..session.config.lane_count.max(1));
    let width = OBSTACLE_BASE_WIDTH + session.rng.random::<f32>() * OBSTACLE_WIDTH_JITTER;
    let height = OBSTACLE_BASE_HEIGHT + session.rng.random::<f32>() * OBSTACLE_HEIGHT_JITTER;
    let kind = if session.rng.random_bool(FAST_OBSTACLE_CHANCE) {
        ObstacleKind::Fast
    } else {
        ObstacleKind::Normal
    };

    log::debug!("Spawn {:?} obstacle in lane {} at tick {}", kind, lane, session.time_ticks);
    session.obstacles.push(Obstacle {
        pos: Vec2::new(session.config.lane_x(lane), OBSTACLE_SPAWN_Y),
        half_size: Vec2::new(width / 2.0, height / 2.0),
        kind,
    });
}

/// Push a new coin above the top edge in a random lane
pub fn spawn_coin(session: &mut RunSession) {
    let lane = session.rng.random_range(0..session.config.lane_count.max(1));
    session.coins.push(Coin {
        pos: Vec2::new(session.config.lane_x(lane), COIN_SPAWN_Y),
        radius: COIN_RADIUS,
    });
}
