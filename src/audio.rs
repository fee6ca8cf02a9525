//! Audio and haptics using the Web Audio and Vibration APIs
//!
//! Procedurally generated sound effects - no external files needed!
//! Everything here is fire-and-forget: nothing blocks the frame loop, and
//! notes already scheduled keep playing after a pause.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{GameEvent, RunPhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin picked up
    Coin,
    /// Crash into traffic
    Hit,
    /// Lane change
    Lane,
    /// Boost fired
    Boost,
    /// Run revived
    Revive,
}

/// Music loop: minor arpeggio in semitones above the base note
const MUSIC_NOTES: [f32; 8] = [0.0, 7.0, 12.0, 7.0, 3.0, 10.0, 15.0, 10.0];
const MUSIC_BASE_HZ: f32 = 220.0;
const MUSIC_BEAT_MS: f64 = 220.0;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    vibrate: bool,
    muted: bool,
    music_step: usize,
    last_beat_ms: f64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: 0.7,
            music_volume: 0.6,
            vibrate: false,
            muted: false,
            music_step: 0,
            last_beat_ms: 0.0,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume and vibration preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.sfx_gain();
        self.music_volume = settings.music_gain();
        self.vibrate = settings.vibrate;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective(&self, volume: f32) -> f32 {
        if self.muted { 0.0 } else { volume }
    }

    /// React to an engine event with sound and vibration
    pub fn handle_event(&self, event: &GameEvent) {
        match event {
            GameEvent::CoinCollected { .. } => {
                self.play(SoundEffect::Coin);
                self.buzz(10);
            }
            GameEvent::Collision => {
                self.play(SoundEffect::Hit);
                self.buzz(80);
            }
            GameEvent::LaneChanged { .. } => self.play(SoundEffect::Lane),
            GameEvent::BoostStarted => {
                self.play(SoundEffect::Boost);
                self.buzz(25);
            }
            GameEvent::Revived => self.play(SoundEffect::Revive),
            GameEvent::RunStarted | GameEvent::RunEnded { .. } => {}
        }
    }

    /// Advance the music loop on its own wall-clock beat; silent unless a
    /// run is in progress
    pub fn on_frame(&mut self, now_ms: f64, phase: RunPhase) {
        if phase != RunPhase::Running {
            self.last_beat_ms = now_ms;
            return;
        }
        if now_ms - self.last_beat_ms < MUSIC_BEAT_MS {
            return;
        }
        self.last_beat_ms = now_ms;

        let vol = self.effective(self.music_volume);
        if vol <= 0.001 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        let semitones = MUSIC_NOTES[self.music_step % MUSIC_NOTES.len()];
        let freq = MUSIC_BASE_HZ * 2f32.powf(semitones / 12.0);
        self.music_step += 1;

        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.03 * vol, t).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective(self.sfx_volume);
        if vol <= 0.001 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Coin => self.play_sweep(ctx, OscillatorType::Triangle, 880.0, 1320.0, 0.06, 0.08, 0.03 * vol),
            SoundEffect::Hit => self.play_sweep(ctx, OscillatorType::Sawtooth, 180.0, 90.0, 0.12, 0.14, 0.06 * vol),
            SoundEffect::Lane => self.play_sweep(ctx, OscillatorType::Sine, 520.0, 520.0, 0.05, 0.05, 0.018 * vol),
            SoundEffect::Boost => self.play_sweep(ctx, OscillatorType::Square, 260.0, 520.0, 0.12, 0.14, 0.025 * vol),
            SoundEffect::Revive => self.play_sweep(ctx, OscillatorType::Triangle, 330.0, 990.0, 0.2, 0.24, 0.04 * vol),
        }
    }

    /// Vibrate for `ms` if the player enabled haptics
    fn buzz(&self, ms: u32) {
        if !self.vibrate {
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(ms);
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single oscillator gliding from `from_hz` to `to_hz`
    #[allow(clippy::too_many_arguments)]
    fn play_sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        from_hz: f32,
        to_hz: f32,
        glide: f64,
        length: f64,
        level: f32,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from_hz, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(level, t).ok();
        if (to_hz - from_hz).abs() > f32::EPSILON {
            osc.frequency().set_value_at_time(from_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to_hz, t + glide)
                .ok();
        }

        osc.start().ok();
        osc.stop_with_when(t + length).ok();
    }
}
