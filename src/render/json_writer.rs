//! JSON and JSON Lines output writers.
//!
//! Each entry serializes with every [`MergedEntry`] field:
//!
//! ```json
//! {"start_time":"2024-03-01T09:00:00","author":"Alice","text":"Hi there","end_time":"2024-03-01T09:00:45","message_count":2}
//! ```

use std::io::{BufWriter, Write};

use crate::error::Result;
use crate::message::MergedEntry;

/// Writes entries as a pretty-printed JSON array.
pub fn write_json<W: Write>(entries: &[MergedEntry], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Converts entries to a pretty-printed JSON array.
pub fn to_json(entries: &[MergedEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Writes entries as JSON Lines, one object per line.
pub fn write_jsonl<W: Write>(entries: &[MergedEntry], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);

    for entry in entries {
        let line = serde_json::to_string(entry)?;
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts entries to a JSON Lines string.
pub fn to_jsonl(entries: &[MergedEntry]) -> Result<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    Ok(out)
}
