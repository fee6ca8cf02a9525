//! Player profile: wallet, upgrades, purchases and run history
//!
//! This is the save collaborator behind the engine's `ProfileStore` trait.
//! Persisted to LocalStorage as one JSON document. Every section carries
//! `#[serde(default)]`, so saves from older builds load with new fields
//! filled in.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{
    Currency, InsufficientFunds, ProfileSnapshot, ProfileStore, UpgradeKind, UpgradeLevels, Wallet,
};

/// Gem price of a premium skin
pub const SKIN_PRICE_GEMS: u64 = 80;
/// Gem price of the no-ads unlock
pub const NO_ADS_PRICE_GEMS: u64 = 150;
/// Daily reward
pub const DAILY_GEMS: u64 = 25;
pub const DAILY_COINS: u64 = 30;
/// Longest nickname kept
pub const MAX_NICKNAME_CHARS: usize = 16;

/// Car paint jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Classic,
    Neon,
    Stealth,
}

impl Skin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Classic => "Classic",
            Skin::Neon => "Neon",
            Skin::Stealth => "Stealth",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Skin::Classic),
            "neon" => Some(Skin::Neon),
            "stealth" => Some(Skin::Stealth),
            _ => None,
        }
    }

    /// Body and windshield colours (CSS hex)
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Skin::Classic => ("#e7eef7", "#8aa0b8"),
            Skin::Neon => ("#66ffcc", "#2b3a52"),
            Skin::Stealth => ("#b7c0cc", "#0b0f14"),
        }
    }
}

/// Reasons a shop or reward action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    /// Upgrade already at its maximum level
    #[error("{} is already at max level", .0.as_str())]
    MaxLevel(UpgradeKind),
    /// Wallet cannot cover the price
    #[error(transparent)]
    Insufficient(#[from] InsufficientFunds),
    #[error("already owned")]
    AlreadyOwned,
    /// Daily reward already claimed today
    #[error("daily reward already claimed, come back tomorrow")]
    AlreadyClaimed,
    #[error("unknown shop item: {0}")]
    UnknownItem(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletBalance {
    pub coins: u64,
    pub gems: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnedSkins {
    pub classic: bool,
    pub neon: bool,
    pub stealth: bool,
}

impl Default for OwnedSkins {
    fn default() -> Self {
        Self {
            classic: true,
            neon: false,
            stealth: false,
        }
    }
}

impl OwnedSkins {
    pub fn owns(&self, skin: Skin) -> bool {
        match skin {
            Skin::Classic => self.classic,
            Skin::Neon => self.neon,
            Skin::Stealth => self.stealth,
        }
    }

    fn grant(&mut self, skin: Skin) {
        match skin {
            Skin::Classic => self.classic = true,
            Skin::Neon => self.neon = true,
            Skin::Stealth => self.stealth = true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Purchases {
    pub no_ads: bool,
    pub skins: OwnedSkins,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Best {
    pub highscore: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Daily {
    /// `YYYY-MM-DD` of the last claim, empty if never claimed
    pub last_claim_day: String,
}

/// Everything persisted for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub device_id: String,
    pub nickname: String,
    pub wallet: WalletBalance,
    pub purchases: Purchases,
    pub selected_skin: Skin,
    pub upgrades: UpgradeLevels,
    pub best: Best,
    pub local_board: HighScores,
    pub daily: Daily,
    pub settings: Settings,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            nickname: "Player".to_string(),
            wallet: WalletBalance::default(),
            purchases: Purchases::default(),
            selected_skin: Skin::Classic,
            upgrades: UpgradeLevels::default(),
            best: Best::default(),
            local_board: HighScores::new(),
            daily: Daily::default(),
            settings: Settings::default(),
        }
    }
}

impl Profile {
    /// Assign a random 128-bit hex device id if the save has none
    pub fn ensure_device_id(&mut self, seed: u64) {
        if !self.device_id.is_empty() {
            return;
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        self.device_id = (0..16).map(|_| format!("{:02x}", rng.random::<u8>())).collect();
    }

    /// Set the leaderboard name; blank names are ignored
    pub fn set_nickname(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.nickname = name.chars().take(MAX_NICKNAME_CHARS).collect();
        true
    }

    /// Price of the next level of `kind`, `None` when maxed
    pub fn upgrade_cost(&self, kind: UpgradeKind) -> Option<u64> {
        kind.pricing().cost(self.upgrades.level(kind))
    }

    /// Buy one level of `kind` with coins. Returns the new level.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, ShopError> {
        let cost = self.upgrade_cost(kind).ok_or(ShopError::MaxLevel(kind))?;
        self.debit(Currency::Coins, cost)?;
        let level = self.upgrades.level_mut(kind);
        *level += 1;
        log::info!("Upgraded {} to level {} for {} coins", kind.as_str(), *level, cost);
        Ok(*level)
    }

    /// Buy (if needed) and select a skin
    pub fn buy_skin(&mut self, skin: Skin) -> Result<(), ShopError> {
        if !self.purchases.skins.owns(skin) {
            self.debit(Currency::Gems, SKIN_PRICE_GEMS)?;
            self.purchases.skins.grant(skin);
            log::info!("Bought skin {}", skin.as_str());
        }
        self.selected_skin = skin;
        Ok(())
    }

    pub fn buy_no_ads(&mut self) -> Result<(), ShopError> {
        if self.purchases.no_ads {
            return Err(ShopError::AlreadyOwned);
        }
        self.debit(Currency::Gems, NO_ADS_PRICE_GEMS)?;
        self.purchases.no_ads = true;
        Ok(())
    }

    /// Dispatch a shop button id (`noads`, `skin_neon`, `skin_stealth`)
    pub fn purchase(&mut self, item: &str) -> Result<(), ShopError> {
        match item {
            "noads" => self.buy_no_ads(),
            other => match other.strip_prefix("skin_").and_then(Skin::from_str) {
                Some(skin) => self.buy_skin(skin),
                None => Err(ShopError::UnknownItem(other.to_string())),
            },
        }
    }

    /// Claim the once-per-day reward for calendar day `today`
    pub fn claim_daily(&mut self, today: &str) -> Result<(), ShopError> {
        if self.daily.last_claim_day == today {
            return Err(ShopError::AlreadyClaimed);
        }
        self.daily.last_claim_day = today.to_string();
        self.credit(Currency::Gems, DAILY_GEMS);
        self.credit(Currency::Coins, DAILY_COINS);
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neonrush_save_v2";

    /// Load the save from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let mut profile = match storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            Some(json) => match serde_json::from_str::<Profile>(&json) {
                Ok(profile) => {
                    log::info!("Loaded profile ({} coins, {} gems)", profile.wallet.coins, profile.wallet.gems);
                    profile
                }
                Err(e) => {
                    log::warn!("Unreadable save, starting fresh: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("No save found, starting fresh");
                Self::default()
            }
        };
        profile.ensure_device_id((js_sys::Math::random() * u64::MAX as f64) as u64);
        profile
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Failed to write save");
                    }
                }
                Err(e) => log::warn!("Failed to serialize save: {}", e),
            }
        }
    }

    /// Wipe the stored save and return a fresh profile (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn reset() -> Self {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() {
            let _ = storage.remove_item(Self::STORAGE_KEY);
        }
        log::info!("Save reset");
        Self::load()
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut profile = Self::default();
        profile.ensure_device_id(0x6e65_6f6e);
        profile
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn reset() -> Self {
        Self::load()
    }
}

impl Wallet for Profile {
    fn credit(&mut self, currency: Currency, amount: u64) {
        let balance = match currency {
            Currency::Coins => &mut self.wallet.coins,
            Currency::Gems => &mut self.wallet.gems,
        };
        *balance = balance.saturating_add(amount);
    }

    fn debit(&mut self, currency: Currency, amount: u64) -> Result<(), InsufficientFunds> {
        let balance = match currency {
            Currency::Coins => &mut self.wallet.coins,
            Currency::Gems => &mut self.wallet.gems,
        };
        if *balance < amount {
            return Err(InsufficientFunds {
                currency,
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Coins => self.wallet.coins,
            Currency::Gems => self.wallet.gems,
        }
    }
}

impl ProfileStore for Profile {
    fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            upgrades: self.upgrades,
            settings: self.settings.gameplay(),
        }
    }

    fn record_run(&mut self, score: u64) -> bool {
        let new_best = score > self.best.highscore;
        if new_best {
            self.best.highscore = score;
        }
        let name = self.nickname.clone();
        self.local_board.add_run(&name, score, &today());
        new_best
    }
}

/// Current calendar day as `YYYY-MM-DD` (UTC)
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso.chars().take(10).collect()
}

/// Native builds have no wall calendar; every run lands on the same day
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    "N/A".to_string()
}
