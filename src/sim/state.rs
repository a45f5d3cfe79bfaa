//! Game state and core simulation types
//!
//! Everything a play session mutates lives in [`GameState`]; the host only
//! feeds it time and answer presses and reads it back for rendering.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::problem::Problem;
use crate::consts::*;
use crate::tuning::{DifficultyConfig, MAX_LIVES};

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Problems are falling and answers are accepted
    Playing,
    /// End condition reached; waiting out the game-over delay
    Ending,
    /// Final stats are available
    GameOver,
}

/// A problem falling toward the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingProblem {
    pub id: u32,
    pub problem: Problem,
    /// x: horizontal position, y: vertical position (percent of the play area)
    pub pos: Vec2,
}

impl FallingProblem {
    pub fn new(id: u32, problem: Problem, x: f32) -> Self {
        Self {
            id,
            problem,
            pos: Vec2::new(x, SPAWN_Y),
        }
    }

    pub fn answer(&self) -> u32 {
        self.problem.product
    }

    /// Still near the top of its fall path
    pub fn is_fast(&self) -> bool {
        self.pos.y < FAST_ANSWER_Y
    }

    pub fn reached_floor(&self) -> bool {
        self.pos.y >= FLOOR_Y
    }
}

/// Per-session statistics, handed to the results screen at game over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub lives: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    /// Consecutive correct answers since the last miss
    pub combo: u32,
    /// Highest combo reached this session
    pub best_combo: u32,
    pub time_remaining: u32,
}

impl GameStats {
    pub fn new(config: &DifficultyConfig) -> Self {
        Self {
            score: 0,
            lives: MAX_LIVES,
            correct_answers: 0,
            wrong_answers: 0,
            combo: 0,
            best_combo: 0,
            time_remaining: config.time_limit_secs,
        }
    }

    /// Percentage of answers that were correct, rounded; 0 with no answers
    pub fn accuracy(&self) -> u32 {
        let total = self.correct_answers + self.wrong_answers;
        if total == 0 {
            return 0;
        }
        ((self.correct_answers as f64 / total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Correct,
    Wrong,
    Missed,
}

/// Transient message shown over the play area until `clear_at_ms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
    /// Session clock time at which the message disappears
    pub clear_at_ms: f64,
    /// The problem that was just answered correctly (highlighted while visible)
    pub answered: Option<FallingProblem>,
}

/// Things that happened during a tick, drained by the host for audio/UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u32 },
    Correct { id: u32, points: u64, bonus: u64, combo: u32 },
    Wrong { value: u32 },
    Missed { count: u32 },
    /// End condition reached; final stats follow after the delay
    Ending,
    GameOver,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: DifficultyConfig,
    pub stats: GameStats,
    pub phase: GamePhase,
    /// Active problems in spawn order
    pub drops: Vec<FallingProblem>,
    /// Answer buttons currently offered
    pub answer_buttons: Vec<u32>,
    pub feedback: Option<Feedback>,
    /// Session clock (ms since start)
    pub elapsed_ms: f64,
    /// Session clock time of the last spawn attempt
    pub last_spawn_ms: f64,
    /// Time accumulated toward the next countdown second
    pub countdown_ms: f64,
    /// Game-over delay remaining while `Ending`
    pub ending_ms: f64,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    /// Drop the answer buttons were generated for
    pub(crate) answers_for: Option<u32>,
    /// Snapshot taken when the end condition was reached
    pub(crate) final_stats: Option<GameStats>,
    pub(crate) final_reported: bool,
    next_id: u32,
}

impl GameState {
    /// Create a new session for `config` with the given seed
    pub fn new(config: DifficultyConfig, seed: u64) -> Self {
        Self {
            seed,
            config,
            stats: GameStats::new(&config),
            phase: GamePhase::Playing,
            drops: Vec::new(),
            answer_buttons: Vec::new(),
            feedback: None,
            elapsed_ms: 0.0,
            last_spawn_ms: 0.0,
            countdown_ms: 0.0,
            ending_ms: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            answers_for: None,
            final_stats: None,
            final_reported: false,
            next_id: 0,
        }
    }

    /// Allocate a new drop ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Answers and clocks only affect stats while playing
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Drop with the given id, if still falling
    pub fn drop_by_id(&self, id: u32) -> Option<&FallingProblem> {
        self.drops.iter().find(|d| d.id == id)
    }

    /// Final stats, returned exactly once after the game-over delay
    pub fn take_final_stats(&mut self) -> Option<GameStats> {
        if self.phase != GamePhase::GameOver || self.final_reported {
            return None;
        }
        self.final_reported = true;
        self.final_stats.clone()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::DifficultyLevel;

    #[test]
    fn test_new_state() {
        let config = DifficultyLevel::Medium.config();
        let state = GameState::new(config, 42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.lives, MAX_LIVES);
        assert_eq!(state.stats.time_remaining, 60);
        assert!(state.drops.is_empty());
        assert!(state.answer_buttons.is_empty());
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(DifficultyLevel::Easy.config(), 1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_fast_and_floor_thresholds() {
        let mut drop = FallingProblem::new(0, Problem::new(2, 3), 50.0);
        assert!(drop.is_fast());
        assert!(!drop.reached_floor());

        drop.pos.y = FAST_ANSWER_Y;
        assert!(!drop.is_fast());

        drop.pos.y = FLOOR_Y;
        assert!(drop.reached_floor());
    }

    #[test]
    fn test_accuracy() {
        let mut stats = GameStats::new(&DifficultyLevel::Beginner.config());
        assert_eq!(stats.accuracy(), 0);
        stats.correct_answers = 2;
        stats.wrong_answers = 1;
        assert_eq!(stats.accuracy(), 67);
    }

    #[test]
    fn test_final_stats_unavailable_while_playing() {
        let mut state = GameState::new(DifficultyLevel::Beginner.config(), 5);
        assert!(state.take_final_stats().is_none());
    }
}
