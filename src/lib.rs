//! scavenger - Image scavenger hunt driven by an external matcher.
//!
//! ## Architecture
//!
//! - **Catalog**: Challenge images, shuffled once per game
//! - **Matcher client**: Runs the external matcher, exit status → verdict
//! - **Round controller**: Up to three attempts per round, stops on a match
//! - **Game loop**: Plays R rounds and tallies matches and misses
//! - **Scoring**: Pure function from the tally to a score breakdown
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Compile-time enforced invariants (types, enums)
//! - B_i (Beliefs): Runtime fallible operations (Result, Option)
//! - I^R (Resolvable): Player-configurable parameters
//! - I^B (Bounded): The matcher is a black box; unknown verdicts become misses

pub mod client;
pub mod game;
pub mod models;

// Re-exports for convenience
pub use client::{
    ConsoleDisplay, ConsolePicker, FilePicker, ImageDisplay, Matcher, MatcherClient,
    ProcessMatcher, PromptStream, ScriptedPicker, ViewerDisplay,
};
pub use game::{GameSession, RngState, RoundController, SampleSet};
pub use models::{
    score, Config, ExitStatus, GameConfig, GameReport, GameTally, Result, ScavengerError,
    ScoreBreakdown, Verdict,
};
