//! Local run board
//!
//! Stored inside the profile save; keeps the best 10 runs on this device.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Nickname at the time of the run
    pub name: String,
    pub score: u64,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
}

/// Top runs, sorted by score descending. Stored as a bare JSON array.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    /// Create empty board
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score >= e.score).unwrap_or(true)
    }

    /// Add a run. Newer runs rank ahead of older runs with the same score.
    /// Returns the rank achieved (1-indexed) or None if it fell off the board.
    pub fn add_run(&mut self, name: &str, score: u64, date: &str) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = RunRecord {
            name: name.to_string(),
            score,
            date: date.to_string(),
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score >= e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
