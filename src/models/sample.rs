//! Round and game state types for scavenger.
//!
//! K_i: These types represent the core data flow through a game.

use crate::models::{Result, ScavengerError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Verdict from one matcher invocation.
///
/// K_i: The matcher speaks only through its exit status.
/// `0` match, `1` no match, `2` malformed arguments, anything else unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Candidate shows the same object or place
    Match,
    /// Candidate does not match
    NoMatch,
    /// Matcher rejected its arguments (our bug, never the player's)
    InvalidRequest,
    /// Unrecognized exit status; `None` when the process died from a signal
    Unknown(Option<i32>),
}

impl Verdict {
    /// Map a process exit code to a verdict.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Match,
            Some(1) => Self::NoMatch,
            Some(2) => Self::InvalidRequest,
            other => Self::Unknown(other),
        }
    }

    /// Whether this verdict counts as a strike.
    pub fn is_strike(self) -> bool {
        matches!(self, Self::NoMatch | Self::Unknown(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::NoMatch => write!(f, "no match"),
            Self::InvalidRequest => write!(f, "invalid request"),
            Self::Unknown(Some(code)) => write!(f, "unknown (exit code {code})"),
            Self::Unknown(None) => write!(f, "unknown (terminated by signal)"),
        }
    }
}

/// What the player handed in for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Path of the image the player picked
    Candidate(PathBuf),
    /// The player backed out of the picker
    Cancelled,
}

/// Validated game setup.
///
/// K_i: 1 <= rounds <= catalog size, enforced by the only constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    rounds: usize,
}

impl GameConfig {
    /// Validate a round count against the number of available samples.
    ///
    /// B_i(count in range) → Result
    pub fn new(rounds: usize, available: usize) -> Result<Self> {
        if rounds == 0 || rounds > available {
            return Err(ScavengerError::invalid_rounds(rounds, available));
        }
        Ok(Self { rounds })
    }

    /// Parse a round count typed by the player.
    pub fn parse(input: &str, available: usize) -> Result<Self> {
        let trimmed = input.trim();
        let rounds = trimmed
            .parse::<usize>()
            .map_err(|_| ScavengerError::invalid_rounds(trimmed, available))?;
        Self::new(rounds, available)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// Attempts per round before it counts as a miss.
pub const MAX_ATTEMPTS: u8 = 3;

/// Outcome of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    /// The player found a match before striking out
    pub matched: bool,
    /// Attempts consumed (1..=3)
    pub attempts_used: u8,
}

/// Running match/miss counters.
///
/// K_i: Both counters only grow, one step per finished round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GameTally {
    pub match_count: u32,
    pub miss_count: u32,
}

impl GameTally {
    /// Fold a finished round into the tally.
    pub fn record(&mut self, result: &RoundResult) {
        if result.matched {
            self.match_count += 1;
        } else {
            self.miss_count += 1;
        }
    }

    /// Rounds recorded so far.
    pub fn rounds_played(&self) -> u32 {
        self.match_count + self.miss_count
    }
}

/// Everything reported at the end of a game.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    /// Seed the catalog was shuffled with
    pub seed: u64,

    /// When the first round started
    pub started_at: DateTime<Utc>,

    /// Wall-clock game time in seconds
    pub runtime_secs: f64,

    /// Final counters
    pub tally: GameTally,

    /// Score derived from the tally
    pub score: super::ScoreBreakdown,
}
