//! Error types for scavenger.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Bad setup (empty catalog, round count out of range)
//! - I^B materialized: Environment failures (picker, matcher launch, IO)
//! - K_i violated: Protocol faults (matcher rejected our arguments)
//!
//! Expected misses (no match, unknown verdict, cancelled pick) are never
//! errors; they are strikes inside a round.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes of the game binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    CantFindSamples = 1,
    InvalidRoundCount = 2,
    FilePickerError = 3,
    InternalFault = 4,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Top-level error type for scavenger.
#[derive(Debug, Error)]
pub enum ScavengerError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED: Setup rejected before any game state exists
    // ═══════════════════════════════════════════════════════════════════
    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("No sample images found in {dir}")]
    EmptyCatalog { dir: PathBuf },

    #[error("Failed to read sample directory {dir}: {source}")]
    CatalogUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid round count '{requested}': choose between 1 and {available}")]
    InvalidRoundCount { requested: String, available: usize },

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED: Environment became known-bad
    // ═══════════════════════════════════════════════════════════════════
    #[error("File picker unavailable: {0}")]
    PickerUnavailable(String),

    #[error("Failed to launch matcher {program}: {source}")]
    MatcherLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED: We handed the matcher malformed input (bug)
    // ═══════════════════════════════════════════════════════════════════
    #[error("Matcher rejected its arguments (reference {reference}, candidate {candidate})")]
    InvalidRequest {
        reference: PathBuf,
        candidate: PathBuf,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScavengerError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a round count rejection.
    pub fn invalid_rounds(requested: impl ToString, available: usize) -> Self {
        Self::InvalidRoundCount {
            requested: requested.to_string(),
            available,
        }
    }

    /// Exit status the binary reports for this error.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::EmptyCatalog { .. } | Self::CatalogUnreadable { .. } => {
                ExitStatus::CantFindSamples
            }
            Self::InvalidRoundCount { .. } => ExitStatus::InvalidRoundCount,
            Self::PickerUnavailable(_) => ExitStatus::FilePickerError,
            Self::Config(_)
            | Self::MatcherLaunch { .. }
            | Self::Io { .. }
            | Self::InvalidRequest { .. }
            | Self::Internal(_) => ExitStatus::InternalFault,
        }
    }
}

/// Result type alias for scavenger.
pub type Result<T> = std::result::Result<T, ScavengerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_mapping() {
        let empty = ScavengerError::EmptyCatalog {
            dir: PathBuf::from("objectSamples"),
        };
        assert_eq!(empty.exit_status().code(), 1);

        let rounds = ScavengerError::invalid_rounds(0, 4);
        assert_eq!(rounds.exit_status().code(), 2);

        let picker = ScavengerError::PickerUnavailable("stdin closed".to_string());
        assert_eq!(picker.exit_status().code(), 3);

        let invalid = ScavengerError::InvalidRequest {
            reference: PathBuf::from("a.png"),
            candidate: PathBuf::from("b.png"),
        };
        assert_eq!(invalid.exit_status(), ExitStatus::InternalFault);
    }

    #[test]
    fn test_invalid_rounds_message() {
        let err = ScavengerError::invalid_rounds("abc", 3);
        assert_eq!(
            err.to_string(),
            "Invalid round count 'abc': choose between 1 and 3"
        );
    }
}
