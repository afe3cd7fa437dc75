//! Final score computation.
//!
//! K_i: Accuracy dominates. At 100% accuracy the accuracy bonus alone is
//! 100,000 points, far above the match and miss terms. That weighting is kept.
//! K_i: The miss penalty is quadratic, so the first miss is cheap and a
//! string of misses is expensive.

use crate::models::{GameConfig, GameTally};
use serde::Serialize;
use std::fmt;

/// Points per percent of accuracy.
pub const ACCURACY_MAX_VALUE: i64 = 1000;
/// Points per successful match.
pub const MATCH_VALUE: i64 = 100;
/// Base penalty, multiplied by misses squared.
pub const BASE_MISS_PENALTY: i64 = 20;

/// Score terms, reported individually before the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub round_count: u32,
    pub match_count: u32,
    pub miss_count: u32,
    /// Percentage of rounds matched
    pub accuracy: f64,
    pub accuracy_bonus: i64,
    pub match_bonus: i64,
    pub miss_penalty: i64,
    /// May be negative; never clamped
    pub total: i64,
}

/// Compute the score for a finished game.
pub fn score(tally: &GameTally, config: &GameConfig) -> ScoreBreakdown {
    let rounds = config.rounds() as i64;
    let matches = i64::from(tally.match_count);
    let misses = i64::from(tally.miss_count);

    let accuracy = (matches * 100) as f64 / rounds as f64;
    // ceil(accuracy * 1000) in integers, so exact percentages never pick up a stray point
    let scaled = matches * 100 * ACCURACY_MAX_VALUE;
    let accuracy_bonus = (scaled + rounds - 1) / rounds;

    let match_bonus = matches * MATCH_VALUE;
    let miss_penalty = misses * misses * BASE_MISS_PENALTY;

    ScoreBreakdown {
        round_count: config.rounds() as u32,
        match_count: tally.match_count,
        miss_count: tally.miss_count,
        accuracy,
        accuracy_bonus,
        match_bonus,
        miss_penalty,
        total: accuracy_bonus + match_bonus - miss_penalty,
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Accuracy: {}% accurate ({}/{}): {} points",
            self.accuracy, self.match_count, self.round_count, self.accuracy_bonus
        )?;
        writeln!(
            f,
            "Successful matches: {} X {} = {} points",
            self.match_count, MATCH_VALUE, self.match_bonus
        )?;
        writeln!(
            f,
            "Failed matches: {}^2 * {} = -{} points",
            self.miss_count, BASE_MISS_PENALTY, self.miss_penalty
        )?;
        writeln!(f)?;
        write!(f, "Final Score: {}", self.total)
    }
}
