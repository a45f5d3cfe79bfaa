//! Problem and answer-button generation
//!
//! Pure functions of the difficulty's table list and the caller's RNG.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::tuning::{ANSWER_BUTTON_COUNT, MAX_MULTIPLIER};

/// A multiplication problem: `table × multiplier = product`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Problem {
    pub table: u32,
    pub multiplier: u32,
    pub product: u32,
}

impl Problem {
    pub fn new(table: u32, multiplier: u32) -> Self {
        Self {
            table,
            multiplier,
            product: table * multiplier,
        }
    }

    /// Text shown on the falling drop, e.g. `2 × 3`
    pub fn label(&self) -> String {
        format!("{} × {}", self.table, self.multiplier)
    }
}

/// Pick a random allowed table and a random multiplier in 1..=9
///
/// Panics if `tables` is empty.
pub fn generate_problem<R: Rng + ?Sized>(tables: &[u32], rng: &mut R) -> Problem {
    let table = tables[rng.random_range(0..tables.len())];
    let multiplier = rng.random_range(1..=MAX_MULTIPLIER);
    Problem::new(table, multiplier)
}

/// Distinct products of every table in `tables`, ascending
pub fn possible_answers(tables: &[u32]) -> Vec<u32> {
    let mut answers: Vec<u32> = tables
        .iter()
        .flat_map(|t| (1..=MAX_MULTIPLIER).map(move |m| t * m))
        .collect();
    answers.sort_unstable();
    answers.dedup();
    answers
}

/// Build the shuffled answer buttons for `correct`
///
/// Always contains `correct`. The other slots are distinct products from the
/// whole table range, so the result has `min(ANSWER_BUTTON_COUNT, distinct
/// products)` entries.
pub fn generate_answer_set<R: Rng + ?Sized>(correct: u32, tables: &[u32], rng: &mut R) -> Vec<u32> {
    let pool = possible_answers(tables);
    let target = ANSWER_BUTTON_COUNT.min(pool.len()).max(1);

    let mut decoys: Vec<u32> = pool.into_iter().filter(|&a| a != correct).collect();
    decoys.shuffle(rng);

    let mut answers = Vec::with_capacity(target);
    answers.push(correct);
    answers.extend(decoys.into_iter().take(target - 1));
    answers.shuffle(rng);
    answers
}
