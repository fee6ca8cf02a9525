//! Fixed timestep run tick and the run lifecycle
//!
//! Intents captured between frames are applied at the start of the next
//! tick, never mid-tick. Simulation (spawning, physics, score) only advances
//! while `Running`; everything including timers freezes while `Paused`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventSink, GameEvent};
use super::physics::{self, current_speed, decay_shake, emit_burst, update_particles};
use super::spawner;
use super::state::{BoostState, ParticleKind, RenderSnapshot, RunPhase, RunSession};
use super::wallet::{Currency, ProfileSnapshot, ProfileStore};
use crate::consts::*;

/// Player or UI request, consumed at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Begin a run from the title screen
    Start,
    Pause,
    Resume,
    /// Fresh run straight from the game over screen
    Retry,
    /// Continue a crashed run for gems
    Revive,
    Boost,
    /// Move one lane left (-1) or right (+1)
    MoveLane(i8),
}

/// Apply queued intents, then advance the session by one fixed timestep
pub fn tick<'a, P, S>(
    session: &'a mut RunSession,
    intents: &[Intent],
    profile: &mut P,
    events: &mut S,
) -> RenderSnapshot<'a>
where
    P: ProfileStore + ?Sized,
    S: EventSink + ?Sized,
{
    for &intent in intents {
        apply_intent(session, intent, profile, events);
    }

    match session.phase {
        RunPhase::Paused => {}
        RunPhase::Running => {
            decay_shake(&mut session.screen_shake);
            let snapshot = profile.snapshot();
            advance_running(session, &snapshot, profile, events);
            update_particles(&mut session.particles);
        }
        RunPhase::Idle | RunPhase::GameOver => {
            // Cosmetics keep settling behind the menu / game over overlay
            decay_shake(&mut session.screen_shake);
            update_particles(&mut session.particles);
        }
    }

    session.snapshot()
}

/// Apply one intent if the current phase accepts it.
///
/// Returns false when the intent was rejected (wrong phase, cooldown,
/// insufficient gems). Rejections never change state.
pub fn apply_intent<P, S>(session: &mut RunSession, intent: Intent, profile: &mut P, events: &mut S) -> bool
where
    P: ProfileStore + ?Sized,
    S: EventSink + ?Sized,
{
    let accepted = match (intent, session.phase) {
        (Intent::Start, RunPhase::Idle) | (Intent::Retry, RunPhase::GameOver) => {
            begin_run(session, events);
            true
        }
        (Intent::Pause, RunPhase::Running) => {
            session.phase = RunPhase::Paused;
            true
        }
        (Intent::Resume, RunPhase::Paused) => {
            session.phase = RunPhase::Running;
            true
        }
        (Intent::Revive, RunPhase::GameOver) => revive(session, profile, events),
        (Intent::Boost, RunPhase::Running) => {
            let snapshot = profile.snapshot();
            try_boost(session, &snapshot, events)
        }
        (Intent::MoveLane(dir), RunPhase::Running) => move_lane(session, dir, events),
        _ => false,
    };

    if !accepted {
        log::debug!("Ignored {:?} while {:?}", intent, session.phase);
    }
    accepted
}

fn begin_run<S: EventSink + ?Sized>(session: &mut RunSession, events: &mut S) {
    session.reset();
    session.phase = RunPhase::Running;
    log::info!("Run started (seed {})", session.seed);
    events.emit(GameEvent::RunStarted);
}

fn revive<P, S>(session: &mut RunSession, profile: &mut P, events: &mut S) -> bool
where
    P: ProfileStore + ?Sized,
    S: EventSink + ?Sized,
{
    if let Err(e) = profile.debit(Currency::Gems, REVIVE_GEM_COST) {
        log::debug!("Revive refused: {}", e);
        return false;
    }
    session.clear_revive_zone();
    session.phase = RunPhase::Running;
    log::info!("Run revived at score {}", session.score);
    events.emit(GameEvent::Revived);
    true
}

fn try_boost<S: EventSink + ?Sized>(session: &mut RunSession, snapshot: &ProfileSnapshot, events: &mut S) -> bool {
    if session.boost.cooldown > 0 {
        return false;
    }
    let upgrades = &snapshot.upgrades;
    session.boost = BoostState {
        active: true,
        remaining: upgrades.boost_duration_ticks(),
        cooldown: upgrades.boost_cooldown_ticks(),
    };
    let origin = session.player.pos + Vec2::new(0.0, 10.0);
    emit_burst(session, origin, 25, ParticleKind::Boost, snapshot.settings.particles);
    events.emit(GameEvent::BoostStarted);
    true
}

fn move_lane<S: EventSink + ?Sized>(session: &mut RunSession, dir: i8, events: &mut S) -> bool {
    let last = session.config.lane_count.saturating_sub(1);
    let lane = session
        .player
        .lane
        .saturating_add_signed(dir.signum() as isize)
        .min(last);
    if lane == session.player.lane {
        return false;
    }
    session.player.lane = lane;
    session.player.target_x = session.config.lane_x(lane);
    events.emit(GameEvent::LaneChanged { lane });
    true
}

/// Count boost timers down by one tick
fn tick_boost(boost: &mut BoostState) {
    boost.cooldown = boost.cooldown.saturating_sub(1);
    if boost.active {
        boost.remaining = boost.remaining.saturating_sub(1);
        if boost.remaining == 0 {
            boost.active = false;
        }
    }
}

fn advance_running<P, S>(session: &mut RunSession, snapshot: &ProfileSnapshot, profile: &mut P, events: &mut S)
where
    P: ProfileStore + ?Sized,
    S: EventSink + ?Sized,
{
    session.time_ticks += 1;

    session.speed = current_speed(session.score, session.boost.active, &snapshot.upgrades);
    let dash_period = session.config.height + 80.0;
    session.road_offset = (session.road_offset + session.speed * ROAD_SCROLL_FACTOR).rem_euclid(dash_period);

    spawner::spawn_due(session);
    tick_boost(&mut session.boost);

    let outcome = physics::step(session, &snapshot.upgrades, snapshot.settings.particles, events);
    if outcome.coins_collected > 0 {
        profile.credit(Currency::Coins, outcome.coins_collected);
    }

    if outcome.crashed {
        end_run(session, snapshot, profile, events);
    } else {
        session.score += 1;
    }
}

fn end_run<P, S>(session: &mut RunSession, snapshot: &ProfileSnapshot, profile: &mut P, events: &mut S)
where
    P: ProfileStore + ?Sized,
    S: EventSink + ?Sized,
{
    session.phase = RunPhase::GameOver;
    session.screen_shake = CRASH_SHAKE;
    let origin = session.player.pos;
    emit_burst(session, origin, 20, ParticleKind::Crash, snapshot.settings.particles);
    events.emit(GameEvent::Collision);

    let reward = session.reward();
    profile.credit(Currency::Coins, reward);
    let new_highscore = profile.record_run(session.score);

    log::info!(
        "Run ended: score {}, coins {}, reward {}{}",
        session.score,
        session.run_coins,
        reward,
        if new_highscore { " (new highscore)" } else { "" }
    );
    events.emit(GameEvent::RunEnded {
        score: session.score,
        coins_collected: session.run_coins,
        reward,
        new_highscore,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::sim::state::{Coin, Obstacle, ObstacleKind, RunConfig};
    use crate::sim::wallet::Wallet;

    fn quiet_config() -> RunConfig {
        RunConfig {
            spawn_obstacles: false,
            spawn_coins: false,
            ..RunConfig::default()
        }
    }

    fn running(profile: &mut Profile) -> RunSession {
        let mut session = RunSession::new(12345, quiet_config());
        assert!(apply_intent(&mut session, Intent::Start, profile, &mut Vec::new()));
        session
    }

    fn crash(session: &mut RunSession, profile: &mut Profile) -> Vec<GameEvent> {
        let pos = session.player.pos;
        session.obstacles.push(Obstacle {
            pos,
            half_size: Vec2::new(22.0, 35.0),
            kind: ObstacleKind::Normal,
        });
        let mut events = Vec::new();
        tick(session, &[], profile, &mut events);
        events
    }

    #[test]
    fn test_start_from_idle() {
        let mut profile = Profile::default();
        let mut session = RunSession::new(1, quiet_config());
        let mut events = Vec::new();
        tick(&mut session, &[Intent::Start], &mut profile, &mut events);
        assert_eq!(session.phase, RunPhase::Running);
        assert_eq!(session.score, 1);
        assert_eq!(events, vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_idle_ignores_gameplay_intents() {
        let mut profile = Profile::default();
        let mut session = RunSession::new(1, quiet_config());
        for intent in [Intent::Pause, Intent::Resume, Intent::Retry, Intent::Revive, Intent::Boost, Intent::MoveLane(1)] {
            assert!(!apply_intent(&mut session, intent, &mut profile, &mut Vec::new()));
        }
        tick(&mut session, &[], &mut profile, &mut Vec::new());
        assert_eq!(session.phase, RunPhase::Idle);
        assert_eq!(session.score, 0);
        assert_eq!(session.time_ticks, 0);
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        let mut events = Vec::new();

        assert!(apply_intent(&mut session, Intent::Pause, &mut profile, &mut events));
        assert!(!apply_intent(&mut session, Intent::Pause, &mut profile, &mut events));
        assert_eq!(session.phase, RunPhase::Paused);

        assert!(apply_intent(&mut session, Intent::Resume, &mut profile, &mut events));
        assert!(!apply_intent(&mut session, Intent::Resume, &mut profile, &mut events));
        assert_eq!(session.phase, RunPhase::Running);
        assert!(events.is_empty());
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        tick(&mut session, &[Intent::Boost], &mut profile, &mut Vec::new());
        let score = session.score;
        let ticks = session.time_ticks;
        let boost = session.boost.clone();

        tick(&mut session, &[Intent::Pause], &mut profile, &mut Vec::new());
        for _ in 0..50 {
            tick(&mut session, &[Intent::MoveLane(1), Intent::Boost], &mut profile, &mut Vec::new());
        }
        assert_eq!(session.phase, RunPhase::Paused);
        assert_eq!(session.score, score);
        assert_eq!(session.time_ticks, ticks);
        assert_eq!(session.boost.cooldown, boost.cooldown);
        assert_eq!(session.boost.remaining, boost.remaining);
        assert_eq!(session.player.lane, 2);
    }

    #[test]
    fn test_lane_changes_clamp() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        let mut events = Vec::new();
        for _ in 0..4 {
            apply_intent(&mut session, Intent::MoveLane(-1), &mut profile, &mut events);
        }
        assert_eq!(session.player.lane, 0);
        assert_eq!(session.player.target_x, session.config.lane_x(0));
        // Two real moves then two clamped no-ops
        assert_eq!(events.len(), 2);

        for _ in 0..10 {
            apply_intent(&mut session, Intent::MoveLane(1), &mut profile, &mut events);
        }
        assert_eq!(session.player.lane, 4);
        // Position only follows gradually
        assert!(session.player.pos.x < session.player.target_x);
    }

    #[test]
    fn test_boost_triggers_once_per_cooldown() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        let cooldown = profile.snapshot().upgrades.boost_cooldown_ticks();

        let mut events = Vec::new();
        tick(&mut session, &[Intent::Boost], &mut profile, &mut events);
        for _ in 1..cooldown {
            tick(&mut session, &[Intent::Boost], &mut profile, &mut events);
        }
        let started = events.iter().filter(|e| **e == GameEvent::BoostStarted).count();
        assert_eq!(started, 1);

        // Cooldown has fully elapsed
        assert_eq!(session.boost.cooldown, 0);
        tick(&mut session, &[Intent::Boost], &mut profile, &mut events);
        let started = events.iter().filter(|e| **e == GameEvent::BoostStarted).count();
        assert_eq!(started, 2);
    }

    #[test]
    fn test_boost_expires_after_duration() {
        let mut profile = Profile::default();
        profile.upgrades.boost = 4;
        let mut session = running(&mut profile);
        let duration = profile.snapshot().upgrades.boost_duration_ticks();
        assert_eq!(duration, 82);

        tick(&mut session, &[Intent::Boost], &mut profile, &mut Vec::new());
        for _ in 1..duration {
            assert!(session.boost.active);
            tick(&mut session, &[], &mut profile, &mut Vec::new());
        }
        assert!(!session.boost.active);
        assert!(session.boost.cooldown > 0);
    }

    #[test]
    fn test_boost_raises_speed() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        tick(&mut session, &[], &mut profile, &mut Vec::new());
        let cruising = session.speed;
        tick(&mut session, &[Intent::Boost], &mut profile, &mut Vec::new());
        assert!(session.speed > cruising * 1.3);
    }

    #[test]
    fn test_coin_pickup_credits_wallet() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        let pos = session.player.pos;
        session.coins.push(Coin { pos, radius: COIN_RADIUS });

        let mut events = Vec::new();
        tick(&mut session, &[], &mut profile, &mut events);
        assert!(session.coins.is_empty());
        assert_eq!(session.run_coins, 1);
        assert_eq!(profile.balance(Currency::Coins), 1);
        let collected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
            .count();
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_crash_ends_run_with_reward() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        for _ in 0..150 {
            tick(&mut session, &[], &mut profile, &mut Vec::new());
        }
        session.run_coins = 3;
        let score_before = session.score;

        let events = crash(&mut session, &mut profile);
        assert_eq!(session.phase, RunPhase::GameOver);
        assert_eq!(session.score, score_before);
        assert_eq!(session.screen_shake, CRASH_SHAKE);
        assert!(events.contains(&GameEvent::Collision));

        let expected_reward = score_before / 70 + 3;
        assert!(events.contains(&GameEvent::RunEnded {
            score: score_before,
            coins_collected: 3,
            reward: expected_reward,
            new_highscore: true,
        }));
        assert_eq!(profile.balance(Currency::Coins), expected_reward);
        assert_eq!(profile.best.highscore, score_before);
        assert_eq!(profile.local_board.entries.len(), 1);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        crash(&mut session, &mut profile);
        let score = session.score;
        for _ in 0..10 {
            tick(&mut session, &[Intent::Boost, Intent::MoveLane(1), Intent::Pause], &mut profile, &mut Vec::new());
        }
        assert_eq!(session.phase, RunPhase::GameOver);
        assert_eq!(session.score, score);
    }

    #[test]
    fn test_revive_requires_gems() {
        let mut profile = Profile::default();
        profile.wallet.gems = 9;
        let mut session = running(&mut profile);
        crash(&mut session, &mut profile);

        let mut events = Vec::new();
        assert!(!apply_intent(&mut session, Intent::Revive, &mut profile, &mut events));
        assert_eq!(session.phase, RunPhase::GameOver);
        assert_eq!(profile.wallet.gems, 9);
        assert!(events.is_empty());
    }

    #[test]
    fn test_revive_debits_and_clears_lane() {
        let mut profile = Profile::default();
        profile.wallet.gems = 25;
        let mut session = running(&mut profile);
        for _ in 0..30 {
            tick(&mut session, &[], &mut profile, &mut Vec::new());
        }
        crash(&mut session, &mut profile);
        let score = session.score;
        session.obstacles.push(Obstacle {
            pos: Vec2::new(session.player.pos.x, -60.0),
            half_size: Vec2::new(22.0, 35.0),
            kind: ObstacleKind::Normal,
        });

        let mut events = Vec::new();
        assert!(apply_intent(&mut session, Intent::Revive, &mut profile, &mut events));
        assert_eq!(session.phase, RunPhase::Running);
        assert_eq!(profile.wallet.gems, 15);
        assert_eq!(events, vec![GameEvent::Revived]);
        // The crash obstacle is gone, the distant one stays
        assert_eq!(session.obstacles.len(), 1);
        // Run continues rather than restarting
        assert_eq!(session.score, score);
        tick(&mut session, &[], &mut profile, &mut Vec::new());
        assert_eq!(session.score, score + 1);
        assert_eq!(session.phase, RunPhase::Running);
    }

    #[test]
    fn test_retry_resets_run() {
        let mut profile = Profile::default();
        let mut session = running(&mut profile);
        for _ in 0..40 {
            tick(&mut session, &[], &mut profile, &mut Vec::new());
        }
        crash(&mut session, &mut profile);
        assert!(!apply_intent(&mut session, Intent::Start, &mut profile, &mut Vec::new()));

        let mut events = Vec::new();
        assert!(apply_intent(&mut session, Intent::Retry, &mut profile, &mut events));
        assert_eq!(session.phase, RunPhase::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.time_ticks, 0);
        assert!(session.obstacles.is_empty());
        assert_eq!(events, vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_handling_speeds_up_convergence() {
        fn ticks_to_settle(handling: u32) -> u32 {
            let mut profile = Profile::default();
            profile.upgrades.handling = handling;
            let mut session = running(&mut profile);
            apply_intent(&mut session, Intent::MoveLane(1), &mut profile, &mut Vec::new());
            let mut ticks = 0;
            while (session.player.target_x - session.player.pos.x).abs() > 1.0 {
                tick(&mut session, &[], &mut profile, &mut Vec::new());
                ticks += 1;
            }
            ticks
        }

        let slow = ticks_to_settle(0);
        let fast = ticks_to_settle(12);
        assert!(fast < slow, "level 12 took {fast} ticks vs {slow}");
        assert!(slow >= 2 * fast);
    }

    #[test]
    fn test_determinism() {
        let mut p1 = Profile::default();
        let mut p2 = Profile::default();
        let mut s1 = RunSession::new(99999, RunConfig::default());
        let mut s2 = RunSession::new(99999, RunConfig::default());

        let script = [
            vec![Intent::Start],
            vec![Intent::MoveLane(-1)],
            vec![],
            vec![Intent::Boost],
            vec![Intent::MoveLane(1), Intent::MoveLane(1)],
        ];
        for step in 0..600 {
            let intents = &script[step % script.len()];
            tick(&mut s1, intents, &mut p1, &mut Vec::new());
            tick(&mut s2, intents, &mut p2, &mut Vec::new());
        }

        assert_eq!(s1.phase, s2.phase);
        assert_eq!(s1.score, s2.score);
        assert_eq!(s1.obstacles.len(), s2.obstacles.len());
        assert!((s1.player.pos.x - s2.player.pos.x).abs() < 0.0001);
    }
}
