//! Configuration models for scavenger.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! The player resolves these unknowns via config file or CLI flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration for scavenger.
///
/// Every section has defaults, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the challenge images live
    #[serde(default)]
    pub samples: SamplesConfig,

    /// External matcher process
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Reference image display
    #[serde(default)]
    pub display: DisplayConfig,

    /// Game settings
    #[serde(default)]
    pub game: GameSettings,
}

/// Sample catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplesConfig {
    /// Directory holding the challenge images
    #[serde(default = "default_samples_dir")]
    pub dir: PathBuf,
}

fn default_samples_dir() -> PathBuf {
    PathBuf::from("objectSamples")
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            dir: default_samples_dir(),
        }
    }
}

/// Matcher process configuration.
///
/// K_i: The matcher receives `[leading_args..] <reference> <candidate> <artifact>`
/// and reports its verdict only through the exit status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Matcher executable
    #[serde(default = "default_matcher_program")]
    pub program: PathBuf,

    /// Arguments placed before the three positional paths (e.g. a mode switch)
    #[serde(default)]
    pub leading_args: Vec<String>,

    /// Where the matcher writes its match visualization
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,

    /// Liveness tick interval while waiting on the matcher
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Show a spinner while the matcher runs
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_matcher_program() -> PathBuf {
    PathBuf::from("ScreenSearch")
}

fn default_artifact() -> PathBuf {
    PathBuf::from("lastMatch.png")
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            program: default_matcher_program(),
            leading_args: Vec::new(),
            artifact: default_artifact(),
            poll_interval_ms: default_poll_interval_ms(),
            show_progress: true,
        }
    }
}

impl MatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Reference image display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// External viewer command; when unset the image path is printed instead
    #[serde(default)]
    pub viewer: Option<PathBuf>,

    /// Extra arguments for the viewer, placed before the image path
    #[serde(default)]
    pub viewer_args: Vec<String>,

    /// Pause after revealing an image before asking for a guess
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
}

fn default_reveal_delay_ms() -> u64 {
    2000
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            viewer: None,
            viewer_args: Vec::new(),
            reveal_delay_ms: default_reveal_delay_ms(),
        }
    }
}

impl DisplayConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

/// Game settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSettings {
    /// Number of rounds; asked interactively when unset
    #[serde(default)]
    pub rounds: Option<usize>,

    /// Fixed shuffle seed; seeded from the clock when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matcher.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "matcher.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.matcher.program.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "matcher.program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
