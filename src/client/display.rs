//! Reference image display.

use crate::client::PromptStream;
use crate::models::{Result, ScavengerError};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Round being shown, for the header line.
#[derive(Debug, Clone, Copy)]
pub struct RoundHeader<'a> {
    /// 1-based round number
    pub round: usize,
    pub rounds: usize,
    pub name: &'a str,
}

/// Surface the reference images are shown on.
pub trait ImageDisplay: Send {
    /// Show the reference image for a round, replacing the previous one.
    fn show(&mut self, header: &RoundHeader<'_>, image: &Path) -> Result<()>;

    /// Release the display. Called once, after the last round.
    fn release(&mut self);
}

fn print_header(stream: PromptStream, header: &RoundHeader<'_>) {
    stream.write(format_args!(
        "\nRound {}/{}: {}\n",
        header.round, header.rounds, header.name
    ));
}

/// Prints the image path instead of opening a window.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    stream: PromptStream,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stream(mut self, stream: PromptStream) -> Self {
        self.stream = stream;
        self
    }
}

impl ImageDisplay for ConsoleDisplay {
    fn show(&mut self, header: &RoundHeader<'_>, image: &Path) -> Result<()> {
        print_header(self.stream, header);
        self.stream
            .write(format_args!("  Find this: {}\n", image.display()));
        Ok(())
    }

    fn release(&mut self) {}
}

/// Opens each reference image in an external viewer.
///
/// The previous viewer is closed before the next one opens; the last one is
/// closed on release (or drop).
pub struct ViewerDisplay {
    program: PathBuf,
    args: Vec<String>,
    stream: PromptStream,
    current: Option<Child>,
}

impl ViewerDisplay {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stream: PromptStream::default(),
            current: None,
        }
    }

    pub fn with_stream(mut self, stream: PromptStream) -> Self {
        self.stream = stream;
        self
    }

    fn close_current(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Err(e) = child.kill() {
                debug!(error = %e, "Viewer already exited");
            }
            if let Err(e) = child.wait() {
                warn!(error = %e, "Failed to reap viewer process");
            }
        }
    }
}

impl ImageDisplay for ViewerDisplay {
    fn show(&mut self, header: &RoundHeader<'_>, image: &Path) -> Result<()> {
        self.close_current();
        print_header(self.stream, header);

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ScavengerError::io(format!("launching viewer {}", self.program.display()), e)
            })?;

        debug!(pid = child.id(), image = %image.display(), "Viewer opened");
        self.current = Some(child);
        Ok(())
    }

    fn release(&mut self) {
        self.close_current();
    }
}

impl Drop for ViewerDisplay {
    fn drop(&mut self) {
        self.close_current();
    }
}
