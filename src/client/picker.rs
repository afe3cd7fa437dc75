//! File pickers: where candidate images come from.
//!
//! K_i: Cancelling a pick is a normal outcome, not an error.
//! B_i: The input source stays available → PickerUnavailable when it doesn't.

use crate::client::PromptStream;
use crate::models::{Result, ScavengerError, Submission, Verdict, MAX_ATTEMPTS};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Context for one pick.
#[derive(Debug, Clone, Copy)]
pub struct PickRequest<'a> {
    /// 1-based round number
    pub round: usize,
    pub rounds: usize,
    /// 1-based attempt number within the round
    pub attempt: u8,
    pub reference: &'a Path,
}

/// Source of candidate images.
#[async_trait]
pub trait FilePicker: Send {
    /// Ask for the candidate image of one attempt.
    async fn pick(&mut self, request: &PickRequest<'_>) -> Result<Submission>;

    /// Feedback after the attempt was judged.
    fn acknowledge(&mut self, _attempt: u8, _verdict: Verdict) {}
}

/// Reads candidate paths line by line from a terminal (or any reader).
///
/// A blank line or `skip` cancels the pick. Paths that do not name a file
/// are rejected and the prompt repeats.
pub struct ConsolePicker<R> {
    lines: Lines<R>,
    stream: PromptStream,
}

impl ConsolePicker<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsolePicker<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            stream: PromptStream::default(),
        }
    }

    /// Send prompts and feedback to `stream`.
    pub fn with_stream(mut self, stream: PromptStream) -> Self {
        self.stream = stream;
        self
    }

    /// Next input line; `None` once the input is closed.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .await
            .map_err(|e| ScavengerError::PickerUnavailable(format!("reading input: {e}")))
    }

    fn parse(line: &str) -> Option<PathBuf> {
        let trimmed = line.trim().trim_matches('"');
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("skip") {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> FilePicker for ConsolePicker<R> {
    async fn pick(&mut self, request: &PickRequest<'_>) -> Result<Submission> {
        loop {
            self.stream.write(format_args!(
                "\n  round {}/{}, attempt {}/{}: path to your image (blank to skip): ",
                request.round, request.rounds, request.attempt, MAX_ATTEMPTS
            ));

            let line = self
                .read_line()
                .await?
                .ok_or_else(|| ScavengerError::PickerUnavailable("input closed".to_string()))?;

            match Self::parse(&line) {
                None => return Ok(Submission::Cancelled),
                Some(path) if path.is_file() => return Ok(Submission::Candidate(path)),
                Some(path) => self
                    .stream
                    .write(format_args!("  no such file: {}\n", path.display())),
            }
        }
    }

    fn acknowledge(&mut self, _attempt: u8, verdict: Verdict) {
        self.stream.write(format_args!("  {}\n", feedback(verdict)));
    }
}

/// What the player is told after an attempt is judged.
///
/// An unknown result still costs an attempt, so it is spelled out.
fn feedback(verdict: Verdict) -> String {
    match verdict {
        Verdict::Match => "[MATCH]".to_string(),
        Verdict::NoMatch => "[X]".to_string(),
        Verdict::InvalidRequest => "[BAD ARGS!]".to_string(),
        Verdict::Unknown(_) => {
            format!("[?] the matcher gave an unexpected result ({verdict}); counted as a miss")
        }
    }
}

/// Replays a fixed list of submissions.
///
/// Running out of submissions is treated like a closed input.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    queue: VecDeque<Submission>,
    acknowledged: Vec<(u8, Verdict)>,
}

impl ScriptedPicker {
    pub fn new(submissions: impl IntoIterator<Item = Submission>) -> Self {
        Self {
            queue: submissions.into_iter().collect(),
            acknowledged: Vec::new(),
        }
    }

    /// Build from command-line specs: a path, or `skip` for a cancelled pick.
    pub fn from_specs<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(specs.into_iter().map(|spec| {
            let spec = spec.as_ref().trim();
            if spec.is_empty() || spec.eq_ignore_ascii_case("skip") {
                Submission::Cancelled
            } else {
                Submission::Candidate(PathBuf::from(spec))
            }
        }))
    }

    /// Submissions not yet handed out.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Verdicts seen so far, with their attempt numbers.
    pub fn acknowledged(&self) -> &[(u8, Verdict)] {
        &self.acknowledged
    }
}

#[async_trait]
impl FilePicker for ScriptedPicker {
    async fn pick(&mut self, _request: &PickRequest<'_>) -> Result<Submission> {
        self.queue
            .pop_front()
            .ok_or_else(|| ScavengerError::PickerUnavailable("scripted candidates exhausted".to_string()))
    }

    fn acknowledge(&mut self, attempt: u8, verdict: Verdict) {
        self.acknowledged.push((attempt, verdict));
    }
}
