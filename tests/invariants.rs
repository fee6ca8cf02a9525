//! Property tests for run invariants under arbitrary input scripts

use neon_rush::consts::{COIN_SPAWN_Y, COIN_SPEED_FACTOR, OBSTACLE_SPAWN_Y, OBSTACLE_SPEED_FACTOR};
use neon_rush::sim::{Coin, GameEvent, Obstacle, RunConfig, tick};
use neon_rush::{Intent, Profile, RunPhase, RunSession};
use proptest::prelude::*;

fn intent_for(code: u8) -> Option<Intent> {
    match code {
        0 => Some(Intent::MoveLane(-1)),
        1 => Some(Intent::MoveLane(1)),
        2 => Some(Intent::Boost),
        3 => Some(Intent::Pause),
        4 => Some(Intent::Resume),
        5 => Some(Intent::Retry),
        _ => None,
    }
}

const EPS: f32 = 1e-3;

/// Every obstacle is either an older one moved down by exactly its step or a
/// fresh spawn
fn obstacles_moved_down(before: &[Obstacle], after: &[Obstacle], speed: f32) -> bool {
    after.iter().all(|o| {
        let step = speed * OBSTACLE_SPEED_FACTOR * o.kind.speed_multiplier();
        let spawned = (o.pos.y - (OBSTACLE_SPAWN_Y + step)).abs() < EPS;
        let moved = before
            .iter()
            .any(|b| b.half_size == o.half_size && b.pos.x == o.pos.x && (o.pos.y - (b.pos.y + step)).abs() < EPS);
        step > 0.0 && (spawned || moved)
    })
}

fn coins_moved_down(before: &[Coin], after: &[Coin], speed: f32) -> bool {
    let step = speed * COIN_SPEED_FACTOR;
    after.iter().all(|c| {
        let spawned = (c.pos.y - (COIN_SPAWN_Y + step)).abs() < EPS;
        let moved = before
            .iter()
            .any(|b| b.pos.x == c.pos.x && (c.pos.y - (b.pos.y + step)).abs() < EPS);
        step > 0.0 && (spawned || moved)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_lane_stays_in_bounds(seed in any::<u64>(), script in prop::collection::vec(0u8..10, 400)) {
        let mut profile = Profile::default();
        let mut events: Vec<GameEvent> = Vec::new();
        let mut session = RunSession::new(seed, RunConfig::default());
        tick(&mut session, &[Intent::Start], &mut profile, &mut events);

        for code in script {
            let intents: Vec<Intent> = intent_for(code).into_iter().collect();
            tick(&mut session, &intents, &mut profile, &mut events);
            prop_assert!(session.player.lane < session.config.lane_count);
            let min_x = session.config.lane_x(0) - 1.0;
            let max_x = session.config.lane_x(session.config.lane_count - 1) + 1.0;
            prop_assert!(session.player.pos.x >= min_x && session.player.pos.x <= max_x);
        }
    }

    #[test]
    fn prop_score_never_decreases_within_run(seed in any::<u64>(), script in prop::collection::vec(0u8..10, 400)) {
        let mut profile = Profile::default();
        let mut session = RunSession::new(seed, RunConfig::default());
        tick(&mut session, &[Intent::Start], &mut profile, &mut Vec::new());

        for code in script {
            let before = session.score;
            let mut events: Vec<GameEvent> = Vec::new();
            let intents: Vec<Intent> = intent_for(code).into_iter().collect();
            tick(&mut session, &intents, &mut profile, &mut events);

            if !events.contains(&GameEvent::RunStarted) {
                prop_assert!(session.score >= before);
                prop_assert!(session.score <= before + 1);
            }
        }
    }

    #[test]
    fn prop_entities_only_move_down(seed in any::<u64>(), script in prop::collection::vec(0u8..10, 400)) {
        let mut profile = Profile::default();
        let mut session = RunSession::new(seed, RunConfig::default());
        tick(&mut session, &[Intent::Start], &mut profile, &mut Vec::new());

        for code in script {
            let intents: Vec<Intent> = intent_for(code).into_iter().collect();
            let was_running = session.phase == RunPhase::Running;
            let steering_only = intents.iter().all(|i| matches!(i, Intent::MoveLane(_) | Intent::Boost));
            let obstacles = session.obstacles.clone();
            let coins = session.coins.clone();

            tick(&mut session, &intents, &mut profile, &mut Vec::new());

            if was_running && steering_only {
                prop_assert!(obstacles_moved_down(&obstacles, &session.obstacles, session.speed));
                prop_assert!(coins_moved_down(&coins, &session.coins, session.speed));
            } else if !was_running && !intents.iter().any(|i| matches!(i, Intent::Resume | Intent::Retry)) {
                // Nothing on the road moves outside a run
                prop_assert_eq!(session.obstacles.len(), obstacles.len());
                for (a, b) in session.obstacles.iter().zip(&obstacles) {
                    prop_assert_eq!(a.pos, b.pos);
                }
            }
        }
    }

    #[test]
    fn prop_wallet_matches_events(seed in any::<u64>(), script in prop::collection::vec(0u8..10, 600)) {
        let mut profile = Profile::default();
        let mut events: Vec<GameEvent> = Vec::new();
        let mut session = RunSession::new(seed, RunConfig::default());
        tick(&mut session, &[Intent::Start], &mut profile, &mut events);
        for code in script {
            let intents: Vec<Intent> = intent_for(code).into_iter().collect();
            tick(&mut session, &intents, &mut profile, &mut events);
        }

        let pickups = events.iter().filter(|e| matches!(e, GameEvent::CoinCollected { .. })).count() as u64;
        let rewards: u64 = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::RunEnded { reward, .. } => Some(*reward),
                _ => None,
            })
            .sum();
        prop_assert_eq!(profile.wallet.coins, pickups + rewards);
    }
}
