//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (drops kept in spawn order)
//! - No rendering or platform dependencies

pub mod problem;
pub mod state;
pub mod tick;

pub use problem::{Problem, generate_answer_set, generate_problem, possible_answers};
pub use state::{FallingProblem, Feedback, FeedbackKind, GameEvent, GamePhase, GameState, GameStats};
pub use tick::{
    AnswerOutcome, ScoreDelta, TickInput, advance_frame, countdown_second, insert_problem,
    refresh_answer_buttons, resolve_answer, score_for, spawn_problem, tick,
};
