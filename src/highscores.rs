//! High score leaderboard
//!
//! Kept in memory for the lifetime of the process only; nothing is written
//! to disk. Tracks the top 10 finished runs.

use serde::Serialize;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub score: u64,
    /// Difficulty level reached
    pub level: u32,
    /// Survival time in milliseconds
    pub survived_ms: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Default)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished run. Zero scores and runs below a full board are
    /// dropped. Returns the 1-indexed rank on the board.
    pub fn record(&mut self, run: RunRecord) -> Option<usize> {
        if run.score == 0 {
            return None;
        }

        // Sorted descending by score; ties keep the earlier run first
        let pos = self.entries.partition_point(|e| e.score >= run.score);
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(pos, run);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    /// Best score this process, zero before any scoring run
    pub fn best(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.score)
    }
}
