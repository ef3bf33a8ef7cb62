use std::fmt;

/// A cue timestamp, kept as the clock fields it was written with.
///
/// The fields are not normalised: `00:75:00.000` stays 75 minutes, so the
/// SRT output is the source timestamp with only its millisecond separator
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
}

impl Timestamp {
    pub fn new(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            millis,
        }
    }
}

/// Renders the WebVTT form, `HH:MM:SS.mmm`.
impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

/// A single timed caption entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Assigned by the processor; `None` straight out of the parser.
    pub sequence_number: Option<usize>,
    /// 1-based line of the source document the cue's block started on.
    pub line: usize,
    pub show_at: Timestamp,
    pub hide_at: Timestamp,
    pub text: Vec<String>,
}

impl Cue {
    pub fn new(show_at: Timestamp, hide_at: Timestamp, text: Vec<String>) -> Self {
        Self {
            sequence_number: None,
            line: 0,
            show_at,
            hide_at,
            text,
        }
    }
}
