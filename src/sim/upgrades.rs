//! Upgrade levels and the gameplay multipliers they resolve to
//!
//! Everything here is a pure formula over an `UpgradeLevels` snapshot.
//! Levels are clamped to their configured maximum before use, so an
//! out-of-range level from a hand-edited save never produces a runtime fault.

use serde::{Deserialize, Serialize};

/// The three purchasable upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    Handling,
    Magnet,
    Boost,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [UpgradeKind::Handling, UpgradeKind::Magnet, UpgradeKind::Boost];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Handling => "handling",
            UpgradeKind::Magnet => "magnet",
            UpgradeKind::Boost => "boost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "handling" => Some(UpgradeKind::Handling),
            "magnet" => Some(UpgradeKind::Magnet),
            "boost" => Some(UpgradeKind::Boost),
            _ => None,
        }
    }

    /// Pricing curve for this track
    pub fn pricing(&self) -> UpgradePricing {
        match self {
            UpgradeKind::Handling => UpgradePricing { base: 50.0, grow: 1.55, max: 12 },
            UpgradeKind::Magnet => UpgradePricing { base: 70.0, grow: 1.60, max: 10 },
            UpgradeKind::Boost => UpgradePricing { base: 90.0, grow: 1.65, max: 10 },
        }
    }

    /// Highest purchasable level
    pub fn max_level(&self) -> u32 {
        self.pricing().max
    }
}

/// Geometric price curve: `floor(base * grow^level)` coins for the next level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradePricing {
    pub base: f64,
    pub grow: f64,
    pub max: u32,
}

impl UpgradePricing {
    /// Price of going from `level` to `level + 1`, or `None` once maxed
    pub fn cost(&self, level: u32) -> Option<u64> {
        if level >= self.max {
            return None;
        }
        Some((self.base * self.grow.powi(level as i32)).floor() as u64)
    }
}

/// Snapshot of the player's upgrade levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    pub handling: u32,
    pub magnet: u32,
    pub boost: u32,
}

impl UpgradeLevels {
    pub fn new(handling: u32, magnet: u32, boost: u32) -> Self {
        Self { handling, magnet, boost }
    }

    /// Raw stored level (unclamped)
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Handling => self.handling,
            UpgradeKind::Magnet => self.magnet,
            UpgradeKind::Boost => self.boost,
        }
    }

    pub fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Handling => &mut self.handling,
            UpgradeKind::Magnet => &mut self.magnet,
            UpgradeKind::Boost => &mut self.boost,
        }
    }

    /// Level clamped into `[0, max]` for its track
    pub fn clamped(&self, kind: UpgradeKind) -> u32 {
        self.level(kind).min(kind.max_level())
    }

    /// Lane-change responsiveness: 1.0 at level 0 up to 2.2 at level 12
    pub fn handling_factor(&self) -> f32 {
        1.0 + self.clamped(UpgradeKind::Handling) as f32 * 0.1
    }

    /// Magnet radius in pixels; 0 means the magnet is dormant
    pub fn magnet_radius(&self) -> f32 {
        self.clamped(UpgradeKind::Magnet) as f32 * 8.5
    }

    /// Speed multiplier applied on top of the base boost multiplier
    pub fn boost_power(&self) -> f32 {
        1.0 + self.clamped(UpgradeKind::Boost) as f32 * 0.065
    }

    pub fn boost_duration_ticks(&self) -> u32 {
        70 + self.clamped(UpgradeKind::Boost) * 3
    }

    /// Never drops below 140 ticks
    pub fn boost_cooldown_ticks(&self) -> u32 {
        260u32.saturating_sub(self.clamped(UpgradeKind::Boost) * 10).max(140)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_values() {
        let lv = UpgradeLevels::default();
        assert_eq!(lv.handling_factor(), 1.0);
        assert_eq!(lv.magnet_radius(), 0.0);
        assert_eq!(lv.boost_power(), 1.0);
        assert_eq!(lv.boost_duration_ticks(), 70);
        assert_eq!(lv.boost_cooldown_ticks(), 260);
    }

    #[test]
    fn test_max_level_values() {
        let lv = UpgradeLevels::new(12, 10, 10);
        assert!((lv.handling_factor() - 2.2).abs() < 1e-5);
        assert!((lv.magnet_radius() - 85.0).abs() < 1e-4);
        assert!((lv.boost_power() - 1.65).abs() < 1e-5);
        assert_eq!(lv.boost_duration_ticks(), 100);
        assert_eq!(lv.boost_cooldown_ticks(), 160);
    }

    #[test]
    fn test_out_of_range_levels_are_clamped() {
        let lv = UpgradeLevels::new(99, 50, 1000);
        assert_eq!(lv.handling_factor(), UpgradeLevels::new(12, 0, 0).handling_factor());
        assert_eq!(lv.magnet_radius(), UpgradeLevels::new(0, 10, 0).magnet_radius());
        assert_eq!(lv.boost_cooldown_ticks(), 160);
        assert!(lv.boost_cooldown_ticks() >= 140);
    }

    #[test]
    fn test_cooldown_non_increasing() {
        let mut prev = u32::MAX;
        for level in 0..=10 {
            let cd = UpgradeLevels::new(0, 0, level).boost_cooldown_ticks();
            assert!(cd <= prev);
            prev = cd;
        }
    }

    #[test]
    fn test_pricing_curve() {
        let handling = UpgradeKind::Handling.pricing();
        assert_eq!(handling.cost(0), Some(50));
        assert_eq!(handling.cost(1), Some(77));
        assert_eq!(handling.cost(12), None);

        let boost = UpgradeKind::Boost.pricing();
        assert_eq!(boost.cost(0), Some(90));
        assert_eq!(boost.cost(2), Some(245));
        assert_eq!(boost.cost(10), None);
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in UpgradeKind::ALL {
            assert_eq!(UpgradeKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(UpgradeKind::from_str("nitro"), None);
    }
}
