//! Player settings and preferences
//!
//! Persisted as part of the profile save.

use serde::{Deserialize, Serialize};

use crate::sim::GameplaySettings;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Music volume (0 - 100)
    #[serde(rename = "musicVol")]
    pub music_volume: u8,
    /// Sound effects volume (0 - 100)
    #[serde(rename = "sfxVol")]
    pub sfx_volume: u8,

    // === Feedback ===
    /// Vibrate on coins, boosts and crashes
    pub vibrate: bool,
    /// Particle effects (coin sparkles, boost exhaust, crash debris)
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 60,
            sfx_volume: 70,
            vibrate: false,
            particles: true,
        }
    }
}

impl Settings {
    /// Music gain in `[0, 1]`
    pub fn music_gain(&self) -> f32 {
        volume_to_gain(self.music_volume)
    }

    /// Effect gain in `[0, 1]`
    pub fn sfx_gain(&self) -> f32 {
        volume_to_gain(self.sfx_volume)
    }

    pub fn set_music_volume(&mut self, volume: u32) {
        self.music_volume = volume.min(100) as u8;
    }

    pub fn set_sfx_volume(&mut self, volume: u32) {
        self.sfx_volume = volume.min(100) as u8;
    }

    /// Flags the run engine reads every tick
    pub fn gameplay(&self) -> GameplaySettings {
        GameplaySettings {
            vibrate: self.vibrate,
            particles: self.particles,
        }
    }
}

fn volume_to_gain(volume: u8) -> f32 {
    (volume as f32 / 100.0).clamp(0.0, 1.0)
}
