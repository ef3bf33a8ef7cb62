use std::fmt;
use std::path::PathBuf;

/// Why a block of the source document did not become a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No line in the block contains `-->`.
    NoTimingLine,
    /// The first `-->` line is not `HH:MM:SS.mmm --> HH:MM:SS.mmm`.
    MalformedTiming,
    /// Nothing but the timing line carried any text.
    EmptyText,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            SkipReason::NoTimingLine => "no timing line",
            SkipReason::MalformedTiming => "malformed timing line",
            SkipReason::EmptyText => "no caption text",
        };
        write!(fmt, "{}", msg)
    }
}

/// A dropped block, identified by the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// 1-based line number of the first line of the block.
    pub line: usize,
    pub first_line: String,
    pub reason: SkipReason,
}

impl fmt::Display for Skipped {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "line {}: {} ('{}')",
            self.line, self.reason, self.first_line
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to convert: {} unusable block(s), first at {}", .skipped.len(), first(.skipped))]
    Rejected { skipped: Vec<Skipped> },

    #[error("output would overwrite the input file: '{}'", .0.display())]
    SameFile(PathBuf),
}

fn first(skipped: &[Skipped]) -> String {
    skipped
        .first()
        .map_or_else(|| "<none>".to_string(), |s| s.to_string())
}

pub type Result<T> = std::result::Result<T, Error>;
