//! Contracts between the run engine and the save/profile collaborator
//!
//! The engine reads an upgrade/settings snapshot once per tick and writes
//! back currency and run results through these traits. It never stores
//! balances itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::upgrades::UpgradeLevels;

/// Wallet currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Earned in runs, spent on upgrades
    Coins,
    /// Premium currency, spent on revives, skins and no-ads
    Gems,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Coins => write!(f, "coins"),
            Currency::Gems => write!(f, "gems"),
        }
    }
}

/// A debit was refused because the balance is too low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough {currency}: need {needed}, have {available}")]
pub struct InsufficientFunds {
    pub currency: Currency,
    pub needed: u64,
    pub available: u64,
}

/// Balance holder for both currencies
pub trait Wallet {
    fn credit(&mut self, currency: Currency, amount: u64);
    /// Debit `amount`, leaving the balance untouched on failure
    fn debit(&mut self, currency: Currency, amount: u64) -> Result<(), InsufficientFunds>;
    fn balance(&self, currency: Currency) -> u64;

    /// Would a debit of `amount` succeed? Never changes the balance.
    fn check_funds(&self, currency: Currency, amount: u64) -> Result<(), InsufficientFunds> {
        let available = self.balance(currency);
        if available < amount {
            return Err(InsufficientFunds {
                currency,
                needed: amount,
                available,
            });
        }
        Ok(())
    }
}

/// Gameplay-relevant settings flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameplaySettings {
    pub vibrate: bool,
    pub particles: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            vibrate: false,
            particles: true,
        }
    }
}

/// Per-tick read of the save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub upgrades: UpgradeLevels,
    pub settings: GameplaySettings,
}

/// Save/profile collaborator as seen by the engine
pub trait ProfileStore: Wallet {
    /// Cheap read of the current upgrade levels and settings flags
    fn snapshot(&self) -> ProfileSnapshot;

    /// Record a finished run (highscore + local history).
    /// Returns true when `score` is a new highscore.
    fn record_run(&mut self, score: u64) -> bool;
}
