//! Per-difficulty best scores
//!
//! Persisted to LocalStorage as `{ "highScores": { "beginner": 120, ... } }`.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};
use crate::tuning::DifficultyLevel;

/// Best score for every difficulty level (exactly one slot each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub beginner: u64,
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
    pub master: u64,
}

impl HighScores {
    pub fn get(&self, level: DifficultyLevel) -> u64 {
        match level {
            DifficultyLevel::Beginner => self.beginner,
            DifficultyLevel::Easy => self.easy,
            DifficultyLevel::Medium => self.medium,
            DifficultyLevel::Hard => self.hard,
            DifficultyLevel::Master => self.master,
        }
    }

    fn slot_mut(&mut self, level: DifficultyLevel) -> &mut u64 {
        match level {
            DifficultyLevel::Beginner => &mut self.beginner,
            DifficultyLevel::Easy => &mut self.easy,
            DifficultyLevel::Medium => &mut self.medium,
            DifficultyLevel::Hard => &mut self.hard,
            DifficultyLevel::Master => &mut self.master,
        }
    }
}

/// Everything persisted between sessions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub high_scores: HighScores,
}

impl SaveData {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "multiplication-rain-save";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_score(&self, level: DifficultyLevel) -> u64 {
        self.high_scores.get(level)
    }

    /// Check if a score beats the stored best for `level`
    pub fn qualifies(&self, level: DifficultyLevel, score: u64) -> bool {
        score > self.high_score(level)
    }

    /// Record `score` if it beats the stored best; returns whether it did
    pub fn record(&mut self, level: DifficultyLevel, score: u64) -> bool {
        if !self.qualifies(level, score) {
            return false;
        }
        *self.high_scores.slot_mut(level) = score;
        true
    }

    /// Load from storage, all-zero when absent or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        let data: Self = persistence::load_or_default(storage, Self::STORAGE_KEY);
        log::info!("Loaded high scores: {:?}", data.high_scores);
        data
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        persistence::store(storage, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_round_trip() {
        let mut data = SaveData::new();
        data.record(DifficultyLevel::Beginner, 120);
        data.record(DifficultyLevel::Hard, 80);

        let mut storage = MemoryStorage::new();
        data.save(&mut storage).unwrap();
        let loaded = SaveData::load(&storage);

        assert_eq!(loaded, data);
        assert_eq!(loaded.high_score(DifficultyLevel::Beginner), 120);
        assert_eq!(loaded.high_score(DifficultyLevel::Hard), 80);
        assert_eq!(loaded.high_score(DifficultyLevel::Master), 0);
    }

    #[test]
    fn test_json_layout() {
        let mut data = SaveData::new();
        data.record(DifficultyLevel::Easy, 30);
        let json: serde_json::Value = serde_json::to_value(&data).unwrap();
        assert_eq!(json["highScores"]["easy"], 30);
        assert_eq!(json["highScores"]["beginner"], 0);
        assert_eq!(json["highScores"].as_object().map(|o| o.len()), Some(5));
    }

    #[test]
    fn test_partial_blob_fills_missing_levels() {
        let data: SaveData = serde_json::from_str(r#"{"highScores":{"medium":55}}"#).unwrap();
        assert_eq!(data.high_score(DifficultyLevel::Medium), 55);
        assert_eq!(data.high_score(DifficultyLevel::Beginner), 0);
    }

    #[test]
    fn test_record_only_improvements() {
        let mut data = SaveData::new();
        assert!(!data.record(DifficultyLevel::Easy, 0));
        assert!(data.record(DifficultyLevel::Easy, 40));
        assert!(!data.record(DifficultyLevel::Easy, 40));
        assert!(!data.record(DifficultyLevel::Easy, 35));
        assert!(data.record(DifficultyLevel::Easy, 41));
        assert_eq!(data.high_score(DifficultyLevel::Easy), 41);
        assert_eq!(data.high_score(DifficultyLevel::Medium), 0);
    }

    #[test]
    fn test_unreadable_blob_defaults_to_zero() {
        use crate::persistence::Storage;

        let mut storage = MemoryStorage::new();
        storage.write(SaveData::STORAGE_KEY, "garbage").unwrap();
        assert_eq!(SaveData::load(&storage), SaveData::default());
    }
}
