//! Game loop.
//!
//! Flow:
//! Shuffled catalog → show reference → round controller → tally → score

use crate::client::{FilePicker, ImageDisplay, RoundHeader};
use crate::game::{RngState, RoundController, SampleSet};
use crate::models::{score, GameConfig, GameReport, GameTally, Result, ScavengerError};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Instructions shown before the first round.
pub const INSTRUCTIONS: &str = "\
Each round, you will be presented with an image.
Step 1: Find another image containing the same object or showing the same place and save it somewhere on your computer
Step 2: Enter the path to that file when asked
Step 3: Wait a few seconds and you will be told whether or not a match was found and scored accordingly
(if no match was found, you are given two more attempts without penalty before it is counted as a miss)";

/// One game: a shuffled catalog and a validated round count.
pub struct GameSession {
    samples: SampleSet,
    config: GameConfig,
    seed: u64,
    reveal_delay: Duration,
}

impl GameSession {
    /// Shuffle the catalog and set up a game.
    ///
    /// K_i: `config` was validated against this catalog, re-checked here.
    pub fn new(samples: SampleSet, config: GameConfig, rng: &mut RngState) -> Result<Self> {
        if config.rounds() > samples.len() {
            return Err(ScavengerError::invalid_rounds(config.rounds(), samples.len()));
        }

        Ok(Self {
            samples: samples.shuffle(rng),
            config,
            seed: rng.seed(),
            reveal_delay: Duration::ZERO,
        })
    }

    /// Pause after showing each reference image.
    pub fn with_reveal_delay(mut self, reveal_delay: Duration) -> Self {
        self.reveal_delay = reveal_delay;
        self
    }

    /// Catalog entries this game will play, in order.
    pub fn challenges(&self) -> &[String] {
        &self.samples.names()[..self.config.rounds()]
    }

    /// Play every round and score the game.
    ///
    /// The display is released exactly once, whether the game finishes or
    /// aborts.
    pub async fn run(
        &self,
        display: &mut dyn ImageDisplay,
        picker: &mut dyn FilePicker,
        controller: &RoundController,
    ) -> Result<GameReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            rounds = self.config.rounds(),
            catalog = self.samples.len(),
            seed = self.seed,
            "Starting game"
        );

        let outcome = self.play_rounds(display, picker, controller).await;
        display.release();

        let tally = match outcome {
            Ok(tally) => tally,
            Err(e) => {
                warn!(error = %e, "Game aborted");
                return Err(e);
            }
        };

        let score = score(&tally, &self.config);
        let runtime_secs = start.elapsed().as_secs_f64();

        info!(
            rounds = tally.rounds_played(),
            matches = tally.match_count,
            misses = tally.miss_count,
            score = score.total,
            runtime = format!("{runtime_secs:.1}s"),
            "Game complete"
        );

        Ok(GameReport {
            seed: self.seed,
            started_at,
            runtime_secs,
            tally,
            score,
        })
    }

    async fn play_rounds(
        &self,
        display: &mut dyn ImageDisplay,
        picker: &mut dyn FilePicker,
        controller: &RoundController,
    ) -> Result<GameTally> {
        let rounds = self.config.rounds();
        let mut tally = GameTally::default();

        for (index, name) in self.challenges().iter().enumerate() {
            let reference = self
                .samples
                .path_of(index)
                .ok_or_else(|| ScavengerError::Internal(format!("no sample at index {index}")))?;

            let header = RoundHeader {
                round: index + 1,
                rounds,
                name,
            };
            display.show(&header, &reference)?;

            if !self.reveal_delay.is_zero() {
                tokio::time::sleep(self.reveal_delay).await;
            }

            let result = controller
                .play(picker, index + 1, rounds, &reference)
                .await?;
            tally.record(&result);
        }

        Ok(tally)
    }
}
