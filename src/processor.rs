use crate::cue::Cue;
use crate::error::{SkipReason, Skipped};
use crate::parser::Parsed;

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ProcessOpts {
    /// Remove inline WebVTT markup (karaoke timestamps, class and voice
    /// spans). SRT's own `<i>`, `<b>` and `<u>` are left alone.
    pub strip_tags: bool,
}

/// Applies the optional text clean-up, then numbers the surviving cues.
pub fn process(parsed: Parsed, opts: &ProcessOpts) -> Parsed {
    let Parsed { cues, mut skipped } = parsed;

    let cues = if opts.strip_tags {
        let (kept, emptied) = strip_tags(cues);
        skipped.extend(emptied.into_iter().map(|cue| Skipped {
            line: cue.line,
            first_line: format!("{} --> {}", cue.show_at, cue.hide_at),
            reason: SkipReason::EmptyText,
        }));
        skipped.sort_by_key(|s| s.line);
        kept
    } else {
        cues
    };

    Parsed {
        cues: generate_seqnum(cues),
        skipped,
    }
}

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| {
        Regex::new(r"</?(?:c|v|lang|ruby|rt)(?:[.\s][^>]*)?>|<(?:\d+:)?\d{2}:\d{2}\.\d{3}>")
            .expect("tag pattern is valid")
    })
}

fn strip_tags(cues: Vec<Cue>) -> (Vec<Cue>, Vec<Cue>) {
    let regex = tag_regex();
    cues.into_iter()
        .map(|mut cue| {
            cue.text = cue
                .text
                .iter()
                .map(|line| regex.replace_all(line, "").into_owned())
                .filter(|line| !line.trim().is_empty())
                .collect();
            if cue.text.is_empty() {
                trace!(line = cue.line, "cue emptied by tag stripping");
            }
            cue
        })
        .partition(|cue| !cue.text.is_empty())
}

fn generate_seqnum(cues: Vec<Cue>) -> Vec<Cue> {
    let mut seqnum = 0;
    cues.into_iter()
        .map(|mut c| {
            seqnum += 1;
            c.sequence_number = Some(seqnum);
            c
        })
        .collect()
}
