//! Core data models for scavenger.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Concrete types with compile-time guarantees
//! - B_i (Beliefs): Wrapped in Result/Option
//! - I^R (Resolvable): Config parameters
//! - I^B (Bounded): Error variants with exit codes

mod config;
mod error;
mod sample;
mod scoring;

pub use config::*;
pub use error::*;
pub use sample::*;
pub use scoring::*;
