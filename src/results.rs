//! Results screen summary

use crate::sim::GameStats;
use crate::tuning::DifficultyLevel;

/// Encouragement line picked by final score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encouragement {
    Genius,
    Expert,
    Close,
    TryAgain,
}

impl Encouragement {
    pub fn for_score(score: u64) -> Self {
        match score {
            201.. => Encouragement::Genius,
            101..=200 => Encouragement::Expert,
            51..=100 => Encouragement::Close,
            _ => Encouragement::TryAgain,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Encouragement::Genius => "Perfect! You're a times-table genius!",
            Encouragement::Expert => "Excellent! Times-table expert!",
            Encouragement::Close => "Well done! Just a little more!",
            Encouragement::TryAgain => "Let's try again!",
        }
    }
}

/// Performance badges shown under the stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Best combo of 10 or more
    ComboMaster,
    /// Accuracy of 90% or more
    Sharpshooter,
    /// 20 or more correct answers
    Whiz,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::ComboMaster => "Combo Master",
            Badge::Sharpshooter => "Sharpshooter",
            Badge::Whiz => "Multiplication Whiz",
        }
    }

    pub fn earned(stats: &GameStats) -> Vec<Badge> {
        let mut badges = Vec::new();
        if stats.best_combo >= 10 {
            badges.push(Badge::ComboMaster);
        }
        if stats.accuracy() >= 90 {
            badges.push(Badge::Sharpshooter);
        }
        if stats.correct_answers >= 20 {
            badges.push(Badge::Whiz);
        }
        badges
    }
}

/// Everything the results screen displays
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsSummary {
    pub level: DifficultyLevel,
    pub stats: GameStats,
    /// Best score for the level after this session was recorded
    pub high_score: u64,
    pub is_new_high_score: bool,
    pub accuracy: u32,
    pub encouragement: Encouragement,
    pub badges: Vec<Badge>,
}

impl ResultsSummary {
    pub fn new(level: DifficultyLevel, stats: GameStats, high_score: u64, is_new_high_score: bool) -> Self {
        Self {
            level,
            accuracy: stats.accuracy(),
            encouragement: Encouragement::for_score(stats.score),
            badges: Badge::earned(&stats),
            stats,
            high_score,
            is_new_high_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(score: u64, correct: u32, wrong: u32, best_combo: u32) -> GameStats {
        GameStats {
            score,
            lives: 0,
            correct_answers: correct,
            wrong_answers: wrong,
            combo: 0,
            best_combo,
            time_remaining: 0,
        }
    }

    #[test]
    fn test_encouragement_tiers() {
        assert_eq!(Encouragement::for_score(0), Encouragement::TryAgain);
        assert_eq!(Encouragement::for_score(50), Encouragement::TryAgain);
        assert_eq!(Encouragement::for_score(51), Encouragement::Close);
        assert_eq!(Encouragement::for_score(101), Encouragement::Expert);
        assert_eq!(Encouragement::for_score(200), Encouragement::Expert);
        assert_eq!(Encouragement::for_score(201), Encouragement::Genius);
    }

    #[test]
    fn test_badges() {
        assert!(Badge::earned(&stats(0, 0, 0, 0)).is_empty());
        assert_eq!(
            Badge::earned(&stats(400, 21, 2, 12)),
            vec![Badge::ComboMaster, Badge::Sharpshooter, Badge::Whiz]
        );
        assert_eq!(Badge::earned(&stats(80, 8, 2, 4)), Vec::<Badge>::new());
    }

    #[test]
    fn test_summary() {
        let summary = ResultsSummary::new(DifficultyLevel::Easy, stats(120, 9, 1, 6), 120, true);
        assert_eq!(summary.accuracy, 90);
        assert_eq!(summary.encouragement, Encouragement::Expert);
        assert_eq!(summary.badges, vec![Badge::Sharpshooter]);
        assert!(summary.is_new_high_score);
    }
}
