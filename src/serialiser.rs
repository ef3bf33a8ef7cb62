use crate::cue::{Cue, Timestamp};

use std::io::{self, BufWriter, Write};

/// Writes `cues` as an SRT document.
pub fn serialise<W: Write>(cues: &[Cue], dst: W) -> io::Result<()> {
    let mut writer = BufWriter::new(dst);
    write_subs(&mut writer, cues)?;
    writer.flush()
}

pub fn to_string(cues: &[Cue]) -> String {
    let mut buf = Vec::new();
    serialise(cues, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("cue text is valid UTF-8")
}

/// Cues are separated by one blank line; the document ends with the newline
/// of the last text line.
fn write_subs<W: Write>(buf: &mut W, cues: &[Cue]) -> io::Result<()> {
    for (idx, cue) in cues.iter().enumerate() {
        if idx > 0 {
            writeln!(buf)?;
        }
        write_sub(buf, cue, cue.sequence_number.unwrap_or(idx + 1))?;
    }
    Ok(())
}

fn write_sub<W: Write>(buf: &mut W, cue: &Cue, seqnum: usize) -> io::Result<()> {
    writeln!(buf, "{}", seqnum)?;
    write_ts(buf, cue.show_at)?;
    write!(buf, " --> ")?;
    write_ts(buf, cue.hide_at)?;
    writeln!(buf)?;
    for line in &cue.text {
        writeln!(buf, "{}", line)?;
    }
    Ok(())
}

fn write_ts<W: Write>(buf: &mut W, timestamp: Timestamp) -> io::Result<()> {
    write!(
        buf,
        "{:02}:{:02}:{:02},{:03}",
        timestamp.hours, timestamp.minutes, timestamp.seconds, timestamp.millis
    )
}
