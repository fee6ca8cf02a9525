//! Simple computer driver for headless demo runs
//!
//! Looks a fixed distance up the road and steers out of any lane with a car
//! in it. It reacts only once the previous lane change has settled, so it
//! never queues more than one move at a time.

use crate::sim::{Intent, RunSession};

/// How far above the player (px) the driver looks for traffic
pub const LOOKAHEAD: f32 = 320.0;
/// Lane change counts as settled when this close (px) to the target
const SETTLED: f32 = 4.0;

/// Lane an entity at `x` occupies
fn lane_of(session: &RunSession, x: f32) -> usize {
    let lanes = session.config.lane_count.max(1);
    let lane_width = session.config.width / lanes as f32;
    ((x / lane_width).max(0.0) as usize).min(lanes - 1)
}

/// True if a car in `lane` is inside the lookahead window
pub fn lane_blocked(session: &RunSession, lane: usize) -> bool {
    let player = &session.player;
    let top = player.pos.y - LOOKAHEAD;
    let bottom = player.pos.y + player.half_size.y;
    session.obstacles.iter().any(|o| {
        let near = o.pos.y + o.half_size.y > top && o.pos.y - o.half_size.y < bottom;
        near && lane_of(session, o.pos.x) == lane
    })
}

/// Pick the next intent for the current tick, if any
pub fn steer(session: &RunSession) -> Option<Intent> {
    let player = &session.player;
    if (player.pos.x - player.target_x).abs() > SETTLED {
        return None;
    }
    if !lane_blocked(session, player.lane) {
        return None;
    }

    let center = session.config.center_lane();
    // Prefer drifting back toward the middle of the road
    let order: [i8; 2] = if player.lane >= center { [-1, 1] } else { [1, -1] };
    order.into_iter().find_map(|dir| {
        let lane = player.lane.checked_add_signed(dir as isize)?;
        (lane < session.config.lane_count && !lane_blocked(session, lane)).then_some(Intent::MoveLane(dir))
    })
}
