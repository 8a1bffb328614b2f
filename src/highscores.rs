//! High score leaderboard
//!
//! Tracks the top 10 finished episodes of a session. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::sim::EpisodeSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub coins: u32,
    /// Seconds survived
    pub elapsed: f32,
    /// Episode index within the session
    pub episode: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished episode.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn record(&mut self, summary: &EpisodeSummary, episode: u32) -> Option<usize> {
        if !self.qualifies(summary.score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: summary.score,
            coins: summary.coins,
            elapsed: summary.elapsed,
            episode,
        };

        // Sorted descending by score; ties keep the earlier episode first
        let pos = self.entries.iter().position(|e| summary.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u64) -> EpisodeSummary {
        EpisodeSummary {
            score,
            coins: (score / 100) as u32,
            elapsed: score as f32 / 10.0,
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&summary(0), 0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&summary(300), 0), Some(1));
        assert_eq!(scores.record(&summary(500), 1), Some(1));
        assert_eq!(scores.record(&summary(400), 2), Some(2));
        assert_eq!(scores.record(&summary(400), 3), Some(3));

        let ranked: Vec<_> = scores.entries.iter().map(|e| (e.score, e.episode)).collect();
        assert_eq!(ranked, vec![(500, 1), (400, 2), (400, 3), (300, 0)]);
        assert_eq!(scores.top().unwrap().coins, 5);
    }

    #[test]
    fn test_truncates_to_max() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.record(&summary(i * 10), i as u32);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().unwrap().score, 60);
        assert!(!scores.qualifies(60));
        assert!(scores.qualifies(61));
    }
}
