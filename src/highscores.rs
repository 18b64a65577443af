//! High score leaderboard
//!
//! Persisted to LocalStorage, keeps the top 5 scores.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub date: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "reef_hunt_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append, sort descending by score, truncate to the top 5.
    /// Returns the 1-indexed rank if the entry survived.
    pub fn record(&mut self, score: u64, date: f64) -> Option<usize> {
        self.entries.push(HighScoreEntry { score, date });
        // Stable sort: equal scores keep the earlier run ahead
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self.entries
            .iter()
            .position(|e| e.score == score && e.date == date)
            .map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not persist high scores");
                    return;
                }
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_top_five_descending() {
        let mut scores = HighScores::new();
        for (i, s) in [40, 10, 90, 70, 20, 60, 5].iter().enumerate() {
            scores.record(*s, i as f64);
        }
        let kept: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(kept, vec![90, 70, 60, 40, 20]);
        assert_eq!(scores.top_score(), Some(90));
    }

    #[test]
    fn test_rank_reporting() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(50, 1.0), Some(1));
        assert_eq!(scores.record(80, 2.0), Some(1));
        assert_eq!(scores.record(60, 3.0), Some(2));
        for d in 4..7 {
            scores.record(100, d as f64);
        }
        // Board full of better scores
        assert_eq!(scores.record(1, 9.0), None);
    }

    #[test]
    fn test_ties_keep_earlier_entry_first() {
        let mut scores = HighScores::new();
        scores.record(30, 1.0);
        assert_eq!(scores.record(30, 2.0), Some(2));
        assert_eq!(scores.entries[0].date, 1.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut scores = HighScores::new();
        scores.record(12, 1700000000000.0);
        let json = serde_json::to_string(&scores).unwrap();
        let back: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, scores.entries);
    }
}
