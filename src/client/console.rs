//! Player-facing console text.
//!
//! K_i: With a JSON report, stdout carries only the report; prompts,
//! round headers and feedback move to stderr.

use std::fmt;
use std::io::Write;
use tracing::debug;

/// Stream that prompts and round headers are written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStream {
    #[default]
    Stdout,
    Stderr,
}

impl PromptStream {
    /// Stream for player text, given whether stdout is reserved for a JSON report.
    pub fn for_report(json: bool) -> Self {
        if json {
            Self::Stderr
        } else {
            Self::Stdout
        }
    }

    /// Write and flush, so a prompt is visible before input is read.
    pub fn write(self, args: fmt::Arguments<'_>) {
        let result = match self {
            Self::Stdout => write_flush(&mut std::io::stdout().lock(), args),
            Self::Stderr => write_flush(&mut std::io::stderr().lock(), args),
        };
        if let Err(e) = result {
            debug!(error = %e, "Console write failed");
        }
    }
}

fn write_flush(out: &mut impl Write, args: fmt::Arguments<'_>) -> std::io::Result<()> {
    out.write_fmt(args)?;
    out.flush()
}
