//! Per-tick movement, magnet attraction and collision resolution
//!
//! Only called while a run is `Running`. The run state machine owns the
//! phase change; this module just reports whether the player crashed.

use glam::Vec2;
use rand::Rng;

use super::events::{EventSink, GameEvent};
use super::state::{Coin, MAX_PARTICLES, Particle, ParticleKind, RunSession};
use super::upgrades::UpgradeLevels;
use crate::consts::*;

/// What happened during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Player overlapped an obstacle
    pub crashed: bool,
    /// Coins consumed this step
    pub coins_collected: u64,
}

/// Descent speed for the current score and boost state
pub fn current_speed(score: u64, boost_active: bool, upgrades: &UpgradeLevels) -> f32 {
    let boost_mul = if boost_active {
        BOOST_BASE_MULTIPLIER * upgrades.boost_power()
    } else {
        1.0
    };
    ((BASE_SPEED + score as f32 / SPEED_RAMP_DIVISOR) * boost_mul).min(SPEED_CAP)
}

/// Advance entities, steer, attract coins and resolve overlaps.
///
/// Coins overlapping the player are consumed before the obstacle test, so a
/// crash tick still keeps its pickups.
pub fn step<S: EventSink + ?Sized>(
    session: &mut RunSession,
    upgrades: &UpgradeLevels,
    particles_enabled: bool,
    events: &mut S,
) -> StepOutcome {
    let speed = session.speed;
    let bottom = session.config.height;

    // Move everything down the road
    for obstacle in &mut session.obstacles {
        obstacle.pos.y += speed * OBSTACLE_SPEED_FACTOR * obstacle.kind.speed_multiplier();
    }
    for coin in &mut session.coins {
        coin.pos.y += speed * COIN_SPEED_FACTOR;
    }
    session
        .obstacles
        .retain(|o| o.pos.y < bottom + OBSTACLE_DESPAWN_MARGIN);
    session.coins.retain(|c| c.pos.y < bottom + COIN_DESPAWN_MARGIN);

    // Lane smoothing (handling upgrade)
    let player = &mut session.player;
    player.pos.x += (player.target_x - player.pos.x) * LANE_SMOOTHING * upgrades.handling_factor();

    apply_magnet(session, upgrades.magnet_radius());

    let mut outcome = StepOutcome::default();
    let hitbox = session.player.hitbox();

    let mut collected = Vec::new();
    session.coins.retain(|coin| {
        if hitbox.overlaps_circle(coin.pos, coin.radius) {
            collected.push(coin.pos);
            false
        } else {
            true
        }
    });
    for pos in collected {
        outcome.coins_collected += Coin::VALUE;
        session.run_coins += Coin::VALUE;
        emit_burst(session, pos, 14, ParticleKind::Coin, particles_enabled);
        events.emit(GameEvent::CoinCollected { x: pos.x, y: pos.y });
    }

    outcome.crashed = session.obstacles.iter().any(|o| hitbox.overlaps(&o.hitbox()));
    outcome
}

/// Pull coins within range toward the player, never upward
fn apply_magnet(session: &mut RunSession, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let target = session.player.pos;
    let reach = radius + MAGNET_SLACK;
    for coin in &mut session.coins {
        let to_player = target - coin.pos;
        if to_player.length() < reach {
            let pull = to_player * MAGNET_PULL;
            coin.pos.x += pull.x;
            coin.pos.y += pull.y.max(0.0);
        }
    }
}

/// Spawn `count` particles at `pos` (no-op when particles are disabled)
pub fn emit_burst(session: &mut RunSession, pos: Vec2, count: usize, kind: ParticleKind, enabled: bool) {
    if !enabled {
        return;
    }
    let room = MAX_PARTICLES.saturating_sub(session.particles.len());
    for _ in 0..count.min(room) {
        let vx = (session.rng.random::<f32>() * 2.0 - 1.0) * 2.2;
        let vy = (session.rng.random::<f32>() * 2.0 - 1.0) * 2.2 - 1.2;
        let life = 40.0 + session.rng.random::<f32>() * 20.0;
        session.particles.push(Particle {
            pos,
            vel: Vec2::new(vx, vy),
            life,
            kind,
        });
    }
}

/// Integrate particles one tick and drop expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += 0.03;
        p.life -= 1.0;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Multiplicative shake decay, snapped to zero once imperceptible
pub fn decay_shake(shake: &mut f32) {
    if *shake > 0.0 {
        *shake *= SHAKE_DECAY;
        if *shake < SHAKE_EPSILON {
            *shake = 0.0;
        }
    }
}
