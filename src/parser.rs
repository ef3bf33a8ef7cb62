use crate::cue::{Cue, Timestamp};
use crate::error::{SkipReason, Skipped};

use nom::bytes::complete::{tag, take_while_m_n};
use nom::combinator::map_res;
use nom::error::VerboseError;
use nom::IResult;
use tracing::trace;

/// Lines starting with one of these (after trimming) never reach a block.
const HEADER_KEYWORDS: &[&str] = &["WEBVTT", "NOTE", "STYLE", "REGION"];

const TIMING_ARROW: &str = "-->";

const TIMING_SEPARATOR: &str = " --> ";

/// Cues recovered from a document, plus every block that was given up on.
#[derive(Debug, Default)]
pub struct Parsed {
    pub cues: Vec<Cue>,
    pub skipped: Vec<Skipped>,
}

/// A run of lines up to the next empty line. Whitespace-only lines stay in
/// the block they follow.
#[derive(Debug)]
struct Block<'a> {
    line: usize,
    lines: Vec<&'a str>,
}

pub struct Parser;
impl Parser {
    pub fn new() -> Self {
        Self {}
    }

    /// Never fails: blocks that cannot be turned into a cue are recorded in
    /// [`Parsed::skipped`] and left out.
    pub fn parse(&mut self, input: &str) -> Parsed {
        let mut parsed = Parsed::default();
        for block in blocks(input) {
            match cue(&block) {
                Ok(cue) => parsed.cues.push(cue),
                Err(reason) => {
                    trace!(line = block.line, %reason, "dropping block");
                    parsed.skipped.push(Skipped {
                        line: block.line,
                        first_line: block.lines[0].trim().to_string(),
                        reason,
                    });
                }
            }
        }
        parsed
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_header(line: &str) -> bool {
    let line = line.trim();
    HEADER_KEYWORDS.iter().any(|kw| line.starts_with(kw))
}

fn blocks(input: &str) -> Vec<Block<'_>> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);

    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    for (idx, line) in input.lines().enumerate() {
        if is_header(line) {
            continue;
        }
        if line.is_empty() {
            blocks.extend(current.take());
            continue;
        }
        if current.is_none() && line.trim().is_empty() {
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                line: idx + 1,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }
    blocks.extend(current);
    blocks
}

fn cue(block: &Block) -> Result<Cue, SkipReason> {
    let (timing_idx, timing) = block
        .lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.contains(TIMING_ARROW))
        .ok_or(SkipReason::NoTimingLine)?;

    let (show_at, hide_at) = match timing_line(timing) {
        Ok((_, times)) => times,
        Err(_) => return Err(SkipReason::MalformedTiming),
    };

    let text: Vec<String> = block
        .lines
        .iter()
        .enumerate()
        .filter(|(idx, line)| *idx != timing_idx && !line.trim().is_empty())
        .map(|(_, line)| line.to_string())
        .collect();
    if text.is_empty() {
        return Err(SkipReason::EmptyText);
    }

    let mut cue = Cue::new(show_at, hide_at, text);
    cue.line = block.line;
    Ok(cue)
}

/// `HH:MM:SS.mmm --> HH:MM:SS.mmm`, ignoring any cue settings that follow.
fn timing_line(input: &str) -> IResult<&str, (Timestamp, Timestamp), VerboseError<&str>> {
    let (input, show_at) = timestamp(input)?;
    let (input, _) = tag(TIMING_SEPARATOR)(input)?;
    let (input, hide_at) = timestamp(input)?;

    Ok((input, (show_at, hide_at)))
}

fn timestamp(input: &str) -> IResult<&str, Timestamp, VerboseError<&str>> {
    let (input, hours) = digits(input, 2)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = digits(input, 2)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = digits(input, 2)?;
    let (input, _) = tag(".")(input)?;
    let (input, millis) = digits(input, 3)?;

    Ok((input, Timestamp::new(hours, minutes, seconds, millis)))
}

fn digits(input: &str, count: usize) -> IResult<&str, u32, VerboseError<&str>> {
    map_res(
        take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse(),
    )(input)
}
