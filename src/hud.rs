//! Overlay layout and text for the DOM panels around the canvas

use crate::consts::REVIVE_GEM_COST;
use crate::highscores::HighScores;
use crate::sim::{Currency, InsufficientFunds, RunPhase, Wallet};

/// Shown in the board list when no run has been recorded
pub const EMPTY_BOARD: &str = "No runs yet. Play one!";

/// Which overlay panels are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    /// Title and play button
    pub menu: bool,
    /// In-run score/coins/boost strip
    pub hud: bool,
    pub pause: bool,
    pub game_over: bool,
    /// Shop, settings and the local board. Reachable whenever no run is live.
    pub lobby: bool,
}

impl Panels {
    pub fn for_phase(phase: RunPhase) -> Self {
        Self {
            menu: phase == RunPhase::Idle,
            hud: matches!(phase, RunPhase::Running | RunPhase::Paused),
            pause: phase == RunPhase::Paused,
            game_over: phase == RunPhase::GameOver,
            lobby: matches!(phase, RunPhase::Idle | RunPhase::GameOver),
        }
    }

    /// Element id and visibility for every panel
    pub fn by_id(&self) -> [(&'static str, bool); 5] {
        [
            ("menu", self.menu),
            ("hud", self.hud),
            ("pause-menu", self.pause),
            ("game-over", self.game_over),
            ("lobby", self.lobby),
        ]
    }
}

/// One `#rank name score` row per recorded run
pub fn board_lines(board: &HighScores) -> Vec<String> {
    board
        .entries
        .iter()
        .enumerate()
        .map(|(i, run)| format!("#{} {} {}", i + 1, run.name, run.score))
        .collect()
}

/// Can this wallet pay for a continue?
pub fn check_revive(wallet: &impl Wallet) -> Result<(), InsufficientFunds> {
    wallet.check_funds(Currency::Gems, REVIVE_GEM_COST)
}

/// Revive button caption for the current gem balance
pub fn revive_label(gems: u64) -> String {
    if gems >= REVIVE_GEM_COST {
        format!("CONTINUE ({} gems)", REVIVE_GEM_COST)
    } else {
        format!("CONTINUE ({} gems, you have {})", REVIVE_GEM_COST, gems)
    }
}
