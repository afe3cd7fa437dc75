//! Round controller: three attempts to find a match.
//!
//! The matcher is imprecise, so a round tolerates false negatives: the
//! player gets three attempts and pays the same whether the round is lost
//! on the first or the third.

use crate::client::{FilePicker, MatcherClient, PickRequest};
use crate::models::{Result, RoundResult, ScavengerError, Submission, Verdict, MAX_ATTEMPTS};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// State of a round in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Waiting for the next guess; `strikes` failed attempts so far
    AwaitingGuess { strikes: u8 },
    /// Matched on attempt `attempts`
    Matched { attempts: u8 },
    /// Struck out
    Missed,
}

impl RoundState {
    pub fn start() -> Self {
        Self::AwaitingGuess { strikes: 0 }
    }

    /// Apply a verdict.
    ///
    /// `InvalidRequest` leaves the state unchanged; the controller aborts on it.
    pub fn advance(self, verdict: Verdict) -> Self {
        let Self::AwaitingGuess { strikes } = self else {
            return self;
        };

        match verdict {
            Verdict::Match => Self::Matched {
                attempts: strikes + 1,
            },
            strike if strike.is_strike() => {
                if strikes + 1 >= MAX_ATTEMPTS {
                    Self::Missed
                } else {
                    Self::AwaitingGuess {
                        strikes: strikes + 1,
                    }
                }
            }
            _ => self,
        }
    }

    /// 1-based number of the attempt being waited on.
    pub fn attempt(&self) -> Option<u8> {
        match self {
            Self::AwaitingGuess { strikes } => Some(strikes + 1),
            _ => None,
        }
    }

    /// The round's result once it reached a terminal state.
    pub fn result(&self) -> Option<RoundResult> {
        match *self {
            Self::AwaitingGuess { .. } => None,
            Self::Matched { attempts } => Some(RoundResult {
                matched: true,
                attempts_used: attempts,
            }),
            Self::Missed => Some(RoundResult {
                matched: false,
                attempts_used: MAX_ATTEMPTS,
            }),
        }
    }
}

/// Runs the submission loop of a single round.
#[derive(Clone)]
pub struct RoundController {
    client: MatcherClient,
}

impl RoundController {
    pub fn new(client: MatcherClient) -> Self {
        Self { client }
    }

    /// Play one round against `reference`.
    ///
    /// Stops at the first match. An `InvalidRequest` verdict aborts with
    /// `ScavengerError::InvalidRequest`; nothing is recorded for the round.
    pub async fn play(
        &self,
        picker: &mut dyn FilePicker,
        round: usize,
        rounds: usize,
        reference: &Path,
    ) -> Result<RoundResult> {
        let mut state = RoundState::start();

        while let Some(attempt) = state.attempt() {
            let request = PickRequest {
                round,
                rounds,
                attempt,
                reference,
            };
            let submission = picker.pick(&request).await?;
            let verdict = self.client.challenge(&submission, reference).await?;
            picker.acknowledge(attempt, verdict);

            if verdict == Verdict::InvalidRequest {
                let candidate = match submission {
                    Submission::Candidate(path) => path,
                    Submission::Cancelled => PathBuf::new(),
                };
                error!(
                    round = round,
                    attempt = attempt,
                    reference = %reference.display(),
                    candidate = %candidate.display(),
                    "Matcher rejected its arguments, aborting game"
                );
                return Err(ScavengerError::InvalidRequest {
                    reference: reference.to_owned(),
                    candidate,
                });
            }

            state = state.advance(verdict);
        }

        let result = state
            .result()
            .ok_or_else(|| ScavengerError::Internal("round ended without a result".to_string()))?;

        info!(
            round = round,
            matched = result.matched,
            attempts = result.attempts_used,
            "Round complete"
        );
        Ok(result)
    }
}
