//! Data-driven game balance
//!
//! Difficulty levels and the scoring constants shared by every level.

use serde::{Deserialize, Serialize};

/// Lives at the start of a session
pub const MAX_LIVES: u32 = 3;
/// Base points for a correct answer
pub const CORRECT_POINTS: u64 = 10;
/// Extra points when answered while the problem is near the top
pub const FAST_ANSWER_BONUS: u64 = 5;
/// Bonus awarded once when the combo reaches exactly 5
pub const COMBO_5_BONUS: u64 = 50;
/// Bonus awarded once when the combo reaches exactly 10
pub const COMBO_10_BONUS: u64 = 100;
/// Maximum number of answer buttons on screen
pub const ANSWER_BUTTON_COUNT: usize = 12;
/// Multipliers run 1..=MAX_MULTIPLIER for every table
pub const MAX_MULTIPLIER: u32 = 9;

/// Difficulty levels, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Easy,
    Medium,
    Hard,
    Master,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 5] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
        DifficultyLevel::Master,
    ];

    /// Machine name, also the key used in the save blob
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
            DifficultyLevel::Master => "master",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(DifficultyLevel::Beginner),
            "easy" => Some(DifficultyLevel::Easy),
            "medium" | "med" => Some(DifficultyLevel::Medium),
            "hard" => Some(DifficultyLevel::Hard),
            "master" => Some(DifficultyLevel::Master),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.config().display_name
    }

    /// Tuning bundle for this level
    pub fn config(&self) -> DifficultyConfig {
        match self {
            DifficultyLevel::Beginner => DifficultyConfig {
                level: *self,
                display_name: "Beginner",
                tables: &[2, 5],
                fall_speed: 1.0,
                spawn_interval_ms: 3000.0,
                max_drops: 2,
                time_limit_secs: 90,
            },
            DifficultyLevel::Easy => DifficultyConfig {
                level: *self,
                display_name: "Easy",
                tables: &[2, 3, 4, 5],
                fall_speed: 1.5,
                spawn_interval_ms: 2500.0,
                max_drops: 3,
                time_limit_secs: 90,
            },
            DifficultyLevel::Medium => DifficultyConfig {
                level: *self,
                display_name: "Medium",
                tables: &ALL_TABLES,
                fall_speed: 2.0,
                spawn_interval_ms: 2000.0,
                max_drops: 3,
                time_limit_secs: 60,
            },
            DifficultyLevel::Hard => DifficultyConfig {
                level: *self,
                display_name: "Hard",
                tables: &ALL_TABLES,
                fall_speed: 2.5,
                spawn_interval_ms: 1800.0,
                max_drops: 4,
                time_limit_secs: 60,
            },
            DifficultyLevel::Master => DifficultyConfig {
                level: *self,
                display_name: "Master",
                tables: &ALL_TABLES,
                fall_speed: 3.0,
                spawn_interval_ms: 1500.0,
                max_drops: 5,
                time_limit_secs: 45,
            },
        }
    }
}

const ALL_TABLES: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

/// Immutable tuning parameters for one session
///
/// Not validated: an empty table list or a zero drop cap is a programming
/// error, not something the simulation recovers from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub level: DifficultyLevel,
    pub display_name: &'static str,
    /// Multiplication tables problems are drawn from
    pub tables: &'static [u32],
    /// Vertical advance per frame, in percent of the play area
    pub fall_speed: f32,
    /// Minimum time between spawns
    pub spawn_interval_ms: f64,
    /// Cap on concurrently falling problems
    pub max_drops: usize,
    pub time_limit_secs: u32,
}

impl DifficultyConfig {
    /// Machine name of the level (`"beginner"`, ...)
    pub fn name(&self) -> &'static str {
        self.level.as_str()
    }

    /// Menu label such as `2–5`
    pub fn table_range_label(&self) -> String {
        match (self.tables.first(), self.tables.last()) {
            (Some(first), Some(last)) if first == last => first.to_string(),
            (Some(first), Some(last)) => format!("{first}–{last}"),
            _ => String::new(),
        }
    }

    /// Every distinct product reachable with this level's tables, ascending
    pub fn distinct_products(&self) -> Vec<u32> {
        crate::sim::problem::possible_answers(self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names_round_trip() {
        for level in DifficultyLevel::ALL {
            assert_eq!(DifficultyLevel::from_str(level.as_str()), Some(level));
            assert_eq!(level.config().name(), level.as_str());
        }
        assert_eq!(DifficultyLevel::from_str("MASTER"), Some(DifficultyLevel::Master));
        assert_eq!(DifficultyLevel::from_str("nightmare"), None);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DifficultyLevel::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let level: DifficultyLevel = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(level, DifficultyLevel::Easy);
    }

    #[test]
    fn test_beginner_products() {
        let products = DifficultyLevel::Beginner.config().distinct_products();
        // 2,4,...,18 and 5,10,...,45 share only 10
        assert_eq!(products.len(), 17);
        assert!(products.contains(&6));
        assert!(products.contains(&45));
    }

    #[test]
    fn test_full_table_products() {
        let products = DifficultyLevel::Master.config().distinct_products();
        assert!(products.len() > ANSWER_BUTTON_COUNT);
        assert_eq!(products.first(), Some(&2));
        assert_eq!(products.last(), Some(&81));
    }

    #[test]
    fn test_table_range_label() {
        assert_eq!(DifficultyLevel::Beginner.config().table_range_label(), "2–5");
        assert_eq!(DifficultyLevel::Hard.config().table_range_label(), "2–9");
    }

    #[test]
    fn test_levels_get_harder() {
        let configs: Vec<_> = DifficultyLevel::ALL.iter().map(|l| l.config()).collect();
        for pair in configs.windows(2) {
            assert!(pair[1].fall_speed > pair[0].fall_speed);
            assert!(pair[1].spawn_interval_ms < pair[0].spawn_interval_ms);
            assert!(pair[1].max_drops >= pair[0].max_drops);
        }
    }
}
