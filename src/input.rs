//! Pointer and keyboard gestures to run intents
//!
//! Browser events arrive at arbitrary times between frames. They are mapped
//! here and buffered in an `IntentQueue`, which the frame loop drains at the
//! start of the next tick.

use crate::sim::{Intent, RunPhase};

/// Horizontal travel (px) that turns a tap into a swipe
pub const SWIPE_THRESHOLD: f32 = 25.0;
/// Two taps closer than this (ms) trigger a boost
pub const DOUBLE_TAP_MS: f64 = 260.0;

/// Intents waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct IntentQueue {
    pending: Vec<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    /// Take everything queued so far, in arrival order
    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Tap/swipe/double-tap recognizer
#[derive(Debug, Clone)]
pub struct InputMapper {
    /// X where the current press began (play-area coordinates)
    press_x: Option<f32>,
    /// Time of the previous tap release
    last_tap_ms: Option<f64>,
    pub swipe_threshold: f32,
    pub double_tap_ms: f64,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self {
            press_x: None,
            last_tap_ms: None,
            swipe_threshold: SWIPE_THRESHOLD,
            double_tap_ms: DOUBLE_TAP_MS,
        }
    }
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.press_x = Some(x);
    }

    /// Finish a press at `x` (relative to the play area's left edge).
    ///
    /// A quick second tap queues a boost; independently, every release
    /// queues a lane change: a swipe moves in its direction, a tap moves
    /// toward the tapped half of the area.
    pub fn pointer_up(&mut self, x: f32, area_width: f32, now_ms: f64, phase: RunPhase, queue: &mut IntentQueue) {
        let Some(start_x) = self.press_x.take() else {
            return;
        };

        let double_tap = self
            .last_tap_ms
            .is_some_and(|last| now_ms - last < self.double_tap_ms);
        self.last_tap_ms = Some(now_ms);

        if phase != RunPhase::Running {
            return;
        }

        if double_tap {
            queue.push(Intent::Boost);
        }

        let dx = x - start_x;
        let dir = if dx.abs() > self.swipe_threshold {
            if dx < 0.0 { -1 } else { 1 }
        } else if x < area_width / 2.0 {
            -1
        } else {
            1
        };
        queue.push(Intent::MoveLane(dir));
    }

    /// Pointer left the area or was cancelled mid-press
    pub fn pointer_cancel(&mut self) {
        self.press_x = None;
    }

    /// Map a `KeyboardEvent.code` to an intent for the current phase
    pub fn key_down(&self, code: &str, phase: RunPhase) -> Option<Intent> {
        let intent = match (code, phase) {
            ("Space", RunPhase::Running) => Intent::Boost,
            ("ArrowLeft" | "KeyA", RunPhase::Running) => Intent::MoveLane(-1),
            ("ArrowRight" | "KeyD", RunPhase::Running) => Intent::MoveLane(1),
            ("KeyP" | "Escape", RunPhase::Running) => Intent::Pause,
            ("KeyP" | "Escape", RunPhase::Paused) => Intent::Resume,
            ("Enter", RunPhase::Idle) => Intent::Start,
            ("Enter", RunPhase::GameOver) => Intent::Retry,
            _ => return None,
        };
        Some(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 420.0;

    fn release(mapper: &mut InputMapper, from: f32, to: f32, now: f64, phase: RunPhase) -> Vec<Intent> {
        let mut queue = IntentQueue::new();
        mapper.pointer_down(from);
        mapper.pointer_up(to, WIDTH, now, phase, &mut queue);
        queue.drain()
    }

    #[test]
    fn test_swipes() {
        let mut mapper = InputMapper::new();
        assert_eq!(release(&mut mapper, 300.0, 200.0, 0.0, RunPhase::Running), vec![Intent::MoveLane(-1)]);
        assert_eq!(release(&mut mapper, 100.0, 160.0, 1000.0, RunPhase::Running), vec![Intent::MoveLane(1)]);
    }

    #[test]
    fn test_taps_use_area_half() {
        let mut mapper = InputMapper::new();
        // Small wobble on the right half still counts as a tap
        assert_eq!(release(&mut mapper, 330.0, 310.0, 0.0, RunPhase::Running), vec![Intent::MoveLane(1)]);
        assert_eq!(release(&mut mapper, 50.0, 60.0, 1000.0, RunPhase::Running), vec![Intent::MoveLane(-1)]);
    }

    #[test]
    fn test_double_tap_boosts_and_moves() {
        let mut mapper = InputMapper::new();
        assert_eq!(release(&mut mapper, 50.0, 50.0, 1000.0, RunPhase::Running), vec![Intent::MoveLane(-1)]);
        assert_eq!(
            release(&mut mapper, 50.0, 50.0, 1200.0, RunPhase::Running),
            vec![Intent::Boost, Intent::MoveLane(-1)]
        );
        // Slow second tap is just a tap
        assert_eq!(release(&mut mapper, 50.0, 50.0, 1600.0, RunPhase::Running), vec![Intent::MoveLane(-1)]);
    }

    #[test]
    fn test_gestures_discarded_outside_running() {
        let mut mapper = InputMapper::new();
        for phase in [RunPhase::Idle, RunPhase::Paused, RunPhase::GameOver] {
            assert!(release(&mut mapper, 50.0, 300.0, 0.0, phase).is_empty());
        }
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut mapper = InputMapper::new();
        let mut queue = IntentQueue::new();
        mapper.pointer_up(10.0, WIDTH, 0.0, RunPhase::Running, &mut queue);
        mapper.pointer_down(10.0);
        mapper.pointer_cancel();
        mapper.pointer_up(10.0, WIDTH, 5.0, RunPhase::Running, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_keys() {
        let mapper = InputMapper::new();
        assert_eq!(mapper.key_down("Space", RunPhase::Running), Some(Intent::Boost));
        assert_eq!(mapper.key_down("Space", RunPhase::Paused), None);
        assert_eq!(mapper.key_down("KeyA", RunPhase::Running), Some(Intent::MoveLane(-1)));
        assert_eq!(mapper.key_down("Escape", RunPhase::Running), Some(Intent::Pause));
        assert_eq!(mapper.key_down("KeyP", RunPhase::Paused), Some(Intent::Resume));
        assert_eq!(mapper.key_down("Enter", RunPhase::GameOver), Some(Intent::Retry));
        assert_eq!(mapper.key_down("KeyQ", RunPhase::Running), None);
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = IntentQueue::new();
        queue.push(Intent::MoveLane(1));
        queue.push(Intent::Boost);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![Intent::MoveLane(1), Intent::Boost]);
        assert!(queue.is_empty());
    }
}
