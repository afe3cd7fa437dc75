//! Matcher client.
//!
//! Epistemic foundation:
//! - K_i: The matcher is an opaque process; its exit status is the verdict
//! - K_i: A cancelled pick never reaches the matcher and counts as a miss
//! - B_i: The process can be launched (might fail) → Result
//! - I^B: How long a match takes is unknowable → wait with liveness ticks

use crate::models::{MatcherConfig, Result, ScavengerError, Submission, Verdict};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Something that can judge whether two images show the same thing.
#[async_trait]
pub trait Matcher: Send + Sync {
    /// Compare `candidate` against `reference`.
    async fn invoke(&self, reference: &Path, candidate: &Path) -> Result<Verdict>;
}

/// Matcher backed by an external executable.
///
/// Invoked as `program [leading_args..] <reference> <candidate> <artifact>`.
/// stdout and stderr are discarded; only the exit status matters.
pub struct ProcessMatcher {
    program: PathBuf,
    leading_args: Vec<String>,
    artifact: PathBuf,
    poll_interval: Duration,
    show_progress: bool,
}

impl ProcessMatcher {
    /// Create a matcher for `program` with default settings.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::from_config(&MatcherConfig {
            program: program.into(),
            ..MatcherConfig::default()
        })
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        Self {
            program: config.program.clone(),
            leading_args: config.leading_args.clone(),
            artifact: config.artifact.clone(),
            poll_interval: config.poll_interval(),
            show_progress: config.show_progress,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_artifact(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.artifact = artifact.into();
        self
    }

    fn command(&self, reference: &Path, candidate: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg(reference)
            .arg(candidate)
            .arg(&self.artifact)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]") {
            pb.set_style(style);
        }
        pb.set_message("matching");
        pb
    }
}

#[async_trait]
impl Matcher for ProcessMatcher {
    async fn invoke(&self, reference: &Path, candidate: &Path) -> Result<Verdict> {
        let mut child = self
            .command(reference, candidate)
            .spawn()
            .map_err(|e| ScavengerError::MatcherLaunch {
                program: self.program.clone(),
                source: e,
            })?;

        let start = Instant::now();
        let pb = self.spinner();
        let mut ticks = 0u32;

        // No overall timeout: a hung matcher hangs the game.
        let status = loop {
            pb.tick();
            match tokio::time::timeout(self.poll_interval, child.wait()).await {
                Ok(status) => break status,
                Err(_) => ticks += 1,
            }
        };
        pb.finish_and_clear();

        let status = status.map_err(|e| ScavengerError::io("waiting for matcher", e))?;
        let verdict = Verdict::from_exit_code(status.code());

        debug!(
            candidate = %candidate.display(),
            exit_code = ?status.code(),
            verdict = %verdict,
            ticks = ticks,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Matcher finished"
        );

        Ok(verdict)
    }
}

/// Turns a player's submission into a verdict.
#[derive(Clone)]
pub struct MatcherClient {
    matcher: Arc<dyn Matcher>,
}

impl MatcherClient {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }

    /// Challenge the reference image with one submission.
    ///
    /// A cancelled pick yields `NoMatch` without invoking the matcher.
    /// Unknown verdicts are logged and passed through; the round treats them
    /// as a strike.
    pub async fn challenge(&self, submission: &Submission, reference: &Path) -> Result<Verdict> {
        let candidate = match submission {
            Submission::Candidate(path) => path,
            Submission::Cancelled => {
                debug!(reference = %reference.display(), "Pick cancelled, counting as no match");
                return Ok(Verdict::NoMatch);
            }
        };

        let verdict = self.matcher.invoke(reference, candidate).await?;

        if let Verdict::Unknown(code) = verdict {
            warn!(
                exit_code = ?code,
                candidate = %candidate.display(),
                "Unknown matcher result, treating as no match"
            );
        }

        Ok(verdict)
    }
}
