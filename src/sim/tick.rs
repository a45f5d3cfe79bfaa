//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. One call to
//! [`tick`] drives all three periodic clocks (frame advance, the one-second
//! countdown and feedback expiry) so there is a single writer.

use rand::Rng;

use super::problem::{Problem, generate_answer_set, generate_problem};
use super::state::{FallingProblem, Feedback, FeedbackKind, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::tuning::{COMBO_5_BONUS, COMBO_10_BONUS, CORRECT_POINTS, FAST_ANSWER_BONUS};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Answer button pressed since the previous tick
    pub answer: Option<u32>,
}

/// Points awarded for one correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDelta {
    pub points: u64,
    pub bonus: u64,
}

impl ScoreDelta {
    pub fn total(&self) -> u64 {
        self.points + self.bonus
    }
}

/// Result of pressing an answer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct { id: u32, delta: ScoreDelta },
    Wrong,
    /// The session is ending or over
    Ignored,
}

/// Score for a correct answer that brought the combo to `combo`
///
/// Milestone bonuses fire only at exactly 5 and exactly 10.
pub fn score_for(combo: u32, fast: bool) -> ScoreDelta {
    let mut bonus = 0;
    if fast {
        bonus += FAST_ANSWER_BONUS;
    }
    match combo {
        5 => bonus += COMBO_5_BONUS,
        10 => bonus += COMBO_10_BONUS,
        _ => {}
    }
    ScoreDelta {
        points: CORRECT_POINTS,
        bonus,
    }
}

/// Advance the session by `dt_ms` (normally [`FRAME_MS`])
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    match state.phase {
        GamePhase::GameOver => return,
        GamePhase::Ending => {
            state.elapsed_ms += dt_ms;
            clear_expired_feedback(state);
            state.ending_ms -= dt_ms;
            if state.ending_ms <= 0.0 {
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOver);
                log::info!(
                    "Game over ({}): score {}",
                    state.config.name(),
                    state.stats.score
                );
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if let Some(value) = input.answer {
        resolve_answer(state, value);
    }

    state.elapsed_ms += dt_ms;
    clear_expired_feedback(state);

    state.countdown_ms += dt_ms;
    while state.countdown_ms >= SECOND_MS && state.is_playing() {
        state.countdown_ms -= SECOND_MS;
        countdown_second(state);
    }

    advance_frame(state, dt_ms);
    refresh_answer_buttons(state);
}

/// Spawn check, fall and floor collisions for one frame
pub fn advance_frame(state: &mut GameState, dt_ms: f64) {
    if !state.is_playing() {
        return;
    }

    // The spawn clock restarts even when the drop cap blocks the spawn
    if state.elapsed_ms - state.last_spawn_ms > state.config.spawn_interval_ms {
        state.last_spawn_ms = state.elapsed_ms;
        spawn_problem(state);
    }

    let step = state.config.fall_speed * (dt_ms / FRAME_MS) as f32;
    for drop in &mut state.drops {
        drop.pos.y += step;
    }

    let before = state.drops.len();
    state.drops.retain(|d| !d.reached_floor());
    let fallen = (before - state.drops.len()) as u32;

    if fallen > 0 {
        state.stats.lives = state.stats.lives.saturating_sub(fallen);
        state.stats.combo = 0;
        set_feedback(state, FeedbackKind::Missed, "Oops! Missed one!".to_string(), None);
        state.events.push(GameEvent::Missed { count: fallen });
        log::debug!("{} problem(s) hit the floor, {} lives left", fallen, state.stats.lives);
        check_game_over(state);
    }
}

/// One tick of the once-per-second countdown
pub fn countdown_second(state: &mut GameState) {
    if !state.is_playing() {
        return;
    }
    state.stats.time_remaining = state.stats.time_remaining.saturating_sub(1);
    check_game_over(state);
}

/// Spawn a random problem unless the drop cap is reached
pub fn spawn_problem(state: &mut GameState) -> Option<u32> {
    if state.drops.len() >= state.config.max_drops {
        return None;
    }
    let problem = generate_problem(state.config.tables, &mut state.rng);
    let x = SPAWN_X_MIN + state.rng.random::<f32>() * SPAWN_X_SPAN;
    Some(insert_problem(state, problem, x))
}

/// Add `problem` at the top of the play area at horizontal position `x`
pub fn insert_problem(state: &mut GameState, problem: Problem, x: f32) -> u32 {
    let id = state.next_entity_id();
    state.drops.push(FallingProblem::new(id, problem, x));
    state.events.push(GameEvent::Spawned { id });
    log::debug!("Spawned #{}: {}", id, problem.label());
    id
}

/// Handle an answer button press
///
/// When several falling problems share the pressed product, the earliest
/// spawned one is taken.
pub fn resolve_answer(state: &mut GameState, value: u32) -> AnswerOutcome {
    if !state.is_playing() {
        return AnswerOutcome::Ignored;
    }

    let outcome = match state.drops.iter().position(|d| d.answer() == value) {
        Some(index) => {
            let drop = state.drops.remove(index);
            let stats = &mut state.stats;
            stats.correct_answers += 1;
            stats.combo += 1;
            stats.best_combo = stats.best_combo.max(stats.combo);

            let combo = stats.combo;
            let delta = score_for(combo, drop.is_fast());
            stats.score += delta.total();

            let id = drop.id;
            set_feedback(
                state,
                FeedbackKind::Correct,
                correct_feedback_text(combo, delta),
                Some(drop),
            );
            state.events.push(GameEvent::Correct {
                id,
                points: delta.points,
                bonus: delta.bonus,
                combo,
            });
            AnswerOutcome::Correct { id, delta }
        }
        None => {
            let stats = &mut state.stats;
            stats.lives = stats.lives.saturating_sub(1);
            stats.wrong_answers += 1;
            stats.combo = 0;
            set_feedback(
                state,
                FeedbackKind::Wrong,
                "Not quite! Think again!".to_string(),
                None,
            );
            state.events.push(GameEvent::Wrong { value });
            AnswerOutcome::Wrong
        }
    };

    check_game_over(state);
    refresh_answer_buttons(state);
    outcome
}

/// Regenerate the answer buttons when the oldest falling problem changes
pub fn refresh_answer_buttons(state: &mut GameState) {
    match state.drops.first().map(|d| (d.id, d.answer())) {
        None => {
            state.answer_buttons.clear();
            state.answers_for = None;
        }
        Some((id, answer)) if state.answers_for != Some(id) => {
            let tables = state.config.tables;
            state.answer_buttons = generate_answer_set(answer, tables, &mut state.rng);
            state.answers_for = Some(id);
        }
        Some(_) => {}
    }
}

/// Enter `Ending` once lives or time run out, snapshotting the stats
fn check_game_over(state: &mut GameState) {
    if !state.is_playing() {
        return;
    }
    if state.stats.lives == 0 || state.stats.time_remaining == 0 {
        state.phase = GamePhase::Ending;
        state.ending_ms = GAME_OVER_DELAY_MS;
        state.final_stats = Some(state.stats.clone());
        state.events.push(GameEvent::Ending);
        log::info!(
            "Round finished: lives {}, time {}s",
            state.stats.lives,
            state.stats.time_remaining
        );
    }
}

fn correct_feedback_text(combo: u32, delta: ScoreDelta) -> String {
    match combo {
        5 => "5 in a row!".to_string(),
        10 => "10 in a row!".to_string(),
        _ if delta.bonus > 0 => format!("+{} points! Bonus +{}!", delta.total(), delta.bonus),
        _ => format!("+{} points!", delta.total()),
    }
}

/// Replace the current message; the newer deadline wins
fn set_feedback(
    state: &mut GameState,
    kind: FeedbackKind,
    text: String,
    answered: Option<FallingProblem>,
) {
    let duration = match kind {
        FeedbackKind::Correct => FEEDBACK_CORRECT_MS,
        FeedbackKind::Wrong | FeedbackKind::Missed => FEEDBACK_WRONG_MS,
    };
    state.feedback = Some(Feedback {
        kind,
        text,
        clear_at_ms: state.elapsed_ms + duration,
        answered,
    });
}

fn clear_expired_feedback(state: &mut GameState) {
    let now = state.elapsed_ms;
    if state.feedback.as_ref().is_some_and(|f| now >= f.clear_at_ms) {
        state.feedback = None;
    }
}
