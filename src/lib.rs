//! Convert WebVTT caption documents into SubRip (SRT) subtitles.
//!
//! The conversion is best-effort: blocks that cannot become a cue are left
//! out of the output, and each one is reported in [`Conversion::skipped`].
//!
//! ```
//! let vtt = "WEBVTT\n\n00:00:01.500 --> 00:00:03.250\nHello world\n";
//! let conv = vtt2srt::convert(vtt);
//! assert_eq!(conv.srt, "1\n00:00:01,500 --> 00:00:03,250\nHello world\n");
//! ```

pub mod cue;
pub mod error;
pub mod parser;
pub mod processor;
pub mod serialiser;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use crate::cue::{Cue, Timestamp};
pub use crate::error::{Error, Result, SkipReason, Skipped};
pub use crate::processor::ProcessOpts;

use crate::parser::Parser;

/// The outcome of converting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub srt: String,
    pub cue_count: usize,
    /// Dropped blocks in document order.
    pub skipped: Vec<Skipped>,
}

impl Conversion {
    pub fn is_lossless(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Turns any dropped block into an [`Error::Rejected`].
    pub fn strict(self) -> Result<Self> {
        if self.is_lossless() {
            Ok(self)
        } else {
            Err(Error::Rejected {
                skipped: self.skipped,
            })
        }
    }
}

/// Options for [`convert_file`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOpts {
    pub process: ProcessOpts,
    /// Fail instead of dropping unusable blocks.
    pub strict: bool,
    /// Delete the source document once the SRT file is written.
    pub remove_source: bool,
}

pub fn convert(input: &str) -> Conversion {
    convert_with(input, &ProcessOpts::default())
}

pub fn convert_with(input: &str, opts: &ProcessOpts) -> Conversion {
    let parsed = Parser::new().parse(input);
    let parsed = processor::process(parsed, opts);
    for skipped in &parsed.skipped {
        debug!(line = skipped.line, reason = %skipped.reason, first_line = %skipped.first_line, "skipped block");
    }
    Conversion {
        srt: serialiser::to_string(&parsed.cues),
        cue_count: parsed.cues.len(),
        skipped: parsed.skipped,
    }
}

/// `captions.en.vtt` becomes `captions.en.srt`.
pub fn srt_path(input: &Path) -> PathBuf {
    input.with_extension("srt")
}

/// Converts the file at `input`, writing to `output` or, when that is
/// `None`, to [`srt_path`]. Returns where the result was written.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    opts: &ConvertOpts,
) -> Result<(PathBuf, Conversion)> {
    let output = output.map_or_else(|| srt_path(input), Path::to_path_buf);
    if is_same_file(input, &output) {
        return Err(Error::SameFile(output));
    }

    let data = fs::read_to_string(input).map_err(|source| Error::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let conv = convert_with(&data, &opts.process);
    let conv = if opts.strict { conv.strict()? } else { conv };

    fs::write(&output, &conv.srt).map_err(|source| Error::Io {
        path: output.clone(),
        source,
    })?;
    info!(
        input = %input.display(),
        output = %output.display(),
        cues = conv.cue_count,
        skipped = conv.skipped.len(),
        "converted"
    );

    if opts.remove_source {
        fs::remove_file(input).map_err(|source| Error::Io {
            path: input.to_path_buf(),
            source,
        })?;
        debug!(path = %input.display(), "removed source");
    }

    Ok((output, conv))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "WEBVTT

00:00:00.000 --> 00:00:02.000
First line

NOTE ignore me

00:00:02.000 --> 00:00:04.000
Second line
More text
";

    #[test]
    fn test_end_to_end_example() {
        let conv = convert(EXAMPLE);
        assert_eq!(
            conv.srt,
            "1\n00:00:00,000 --> 00:00:02,000\nFirst line\n\n\
             2\n00:00:02,000 --> 00:00:04,000\nSecond line\nMore text\n"
        );
        assert_eq!(conv.cue_count, 2);
        assert!(conv.is_lossless());
        assert!(!conv.srt.contains("WEBVTT"));
        assert!(!conv.srt.contains("NOTE"));
    }

    #[test]
    fn test_timestamp_separator_swapped() {
        let conv = convert("00:00:01.500 --> 00:00:03.250\nHello world\n");
        assert!(conv
            .srt
            .contains("00:00:01,500 --> 00:00:03,250\nHello world\n"));
    }

    #[test]
    fn test_dropped_blocks_consume_no_index() {
        let input = "WEBVTT\n\n\
                     00:00:01.000 --> 00:00:02.000\none\n\n\
                     NOTE\n\n\
                     STYLE\n\n\
                     REGION\n\n\
                     00:00:02.000 --> 00:00:03.000\n   \n\n\
                     no arrow here\n\n\
                     00:00:03.000 --> 00:00:04.000\ntwo\n";
        let conv = convert(input);
        assert_eq!(
            conv.srt,
            "1\n00:00:01,000 --> 00:00:02,000\none\n\n\
             2\n00:00:03,000 --> 00:00:04,000\ntwo\n"
        );
        let reasons: Vec<_> = conv.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SkipReason::EmptyText, SkipReason::NoTimingLine]);
    }

    #[test]
    fn test_no_usable_cues_is_empty_document() {
        let conv = convert("WEBVTT\n\nNOTE nothing to see\n");
        assert_eq!(conv.srt, "");
        assert_eq!(conv.cue_count, 0);
    }

    #[test]
    fn test_well_formed_cues_map_one_to_one() {
        let mut input = String::from("WEBVTT\n\n");
        for i in 0..25 {
            input.push_str(&format!(
                "00:00:{:02}.000 --> 00:00:{:02}.500\ncue {}\n\n",
                i,
                i,
                i
            ));
        }
        let conv = convert(&input);
        assert_eq!(conv.cue_count, 25);
        let indices: Vec<usize> = conv
            .srt
            .split("\n\n")
            .map(|block| block.lines().next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(indices, (1..=25).collect::<Vec<_>>());
    }

    /// Turns SRT back into dot-delimited cue blocks.
    fn back_to_vtt(srt: &str) -> String {
        let mut vtt = String::from("WEBVTT\n\n");
        for block in srt.split("\n\n") {
            for line in block.lines().skip(1) {
                if line.contains("-->") {
                    vtt.push_str(&line.replace(',', "."));
                } else {
                    vtt.push_str(line);
                }
                vtt.push('\n');
            }
            vtt.push('\n');
        }
        vtt
    }

    #[test]
    fn test_reconversion_keeps_cue_text() {
        let first = convert(EXAMPLE);
        let second = convert(&back_to_vtt(&first.srt));
        assert_eq!(second.srt, first.srt);
        assert!(second.is_lossless());
    }

    #[test]
    fn test_strict_rejects_lossy_conversion() {
        let conv = convert("00:00:01.000 --> 00:00:02.000\n\nstray\n");
        assert!(!conv.is_lossless());
        match conv.strict() {
            Err(Error::Rejected { skipped }) => {
                assert_eq!(skipped.len(), 2);
                assert_eq!(skipped[1].line, 3);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    const AUTO_CAPTIONS: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n\
        00:00:00.030 --> 00:00:02.750 align:start position:0%\n \n\
        hello<00:00:00.359><c> everyone</c>\n\n\
        00:00:02.750 --> 00:00:04.000 align:start position:0%\nplain\n \n";

    #[test]
    fn test_auto_captions_keep_text_after_padding_line() {
        let conv = convert(AUTO_CAPTIONS);
        assert_eq!(conv.cue_count, 2);
        assert_eq!(
            conv.srt,
            "1\n00:00:00,030 --> 00:00:02,750\nhello<00:00:00.359><c> everyone</c>\n\n\
             2\n00:00:02,750 --> 00:00:04,000\nplain\n"
        );
        // Only the `Kind:`/`Language:` header block is dropped.
        assert_eq!(conv.skipped.len(), 1);
        assert_eq!(conv.skipped[0].line, 2);
        assert_eq!(conv.skipped[0].reason, SkipReason::NoTimingLine);
    }

    #[test]
    fn test_auto_captions_with_strip_tags() {
        let conv = convert_with(AUTO_CAPTIONS, &ProcessOpts { strip_tags: true });
        assert!(conv.srt.contains("00:00:00,030 --> 00:00:02,750\nhello everyone\n"));
        assert_eq!(conv.cue_count, 2);
    }

    #[test]
    fn test_convert_with_strip_tags() {
        let opts = ProcessOpts { strip_tags: true };
        let conv = convert_with(
            "00:00:01.000 --> 00:00:02.000 align:start position:0%\nhey<00:00:01.500><c> you</c>\n",
            &opts,
        );
        assert_eq!(conv.srt, "1\n00:00:01,000 --> 00:00:02,000\nhey you\n");
    }

    #[test]
    fn test_srt_path() {
        assert_eq!(
            srt_path(Path::new("/tmp/video.en.vtt")),
            PathBuf::from("/tmp/video.en.srt")
        );
        assert_eq!(srt_path(Path::new("captions")), PathBuf::from("captions.srt"));
    }

    #[test]
    fn test_convert_file_writes_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.en.vtt");
        fs::write(&input, EXAMPLE).unwrap();

        let (output, conv) = convert_file(&input, None, &ConvertOpts::default()).unwrap();

        assert_eq!(output, dir.path().join("clip.en.srt"));
        assert_eq!(fs::read_to_string(&output).unwrap(), conv.srt);
        assert!(input.exists());
    }

    #[test]
    fn test_convert_file_removes_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.vtt");
        let output = dir.path().join("out.srt");
        fs::write(&input, EXAMPLE).unwrap();

        let opts = ConvertOpts {
            remove_source: true,
            ..Default::default()
        };
        convert_file(&input, Some(&output), &opts).unwrap();

        assert!(!input.exists());
        assert!(output.exists());
    }

    #[test]
    fn test_convert_file_strict_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.vtt");
        fs::write(&input, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n\nstray text\n").unwrap();

        let opts = ConvertOpts {
            strict: true,
            remove_source: true,
            ..Default::default()
        };
        let err = convert_file(&input, None, &opts).unwrap_err();

        assert!(matches!(err, Error::Rejected { .. }));
        assert!(!dir.path().join("clip.srt").exists());
        assert!(input.exists());
    }

    #[test]
    fn test_convert_file_refuses_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("already.srt");
        fs::write(&input, EXAMPLE).unwrap();

        let err = convert_file(&input, None, &ConvertOpts::default()).unwrap_err();

        assert!(matches!(err, Error::SameFile(_)));
        assert_eq!(fs::read_to_string(&input).unwrap(), EXAMPLE);
    }

    #[test]
    fn test_convert_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.vtt");

        let err = convert_file(&input, None, &ConvertOpts::default()).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
    }
}
