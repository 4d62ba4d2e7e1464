//! CSV output writer.

use std::io::Write;

use crate::error::Result;
use crate::message::MergedEntry;

const HEADER: [&str; 5] = ["Start Time", "End Time", "Name", "Messages", "Message"];

/// Writes entries as semicolon-delimited CSV.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Start Time`, `End Time`, `Name`, `Messages`, `Message`
/// - Quoting follows the `csv` crate, so `;`, quotes and newlines in text are safe.
pub fn write_csv<W: Write>(entries: &[MergedEntry], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    writer.write_record(HEADER)?;

    for entry in entries {
        let count = entry.message_count.to_string();
        writer.write_record([
            entry.start_time.as_str(),
            entry.end_time.as_str(),
            entry.author.as_str(),
            count.as_str(),
            entry.text.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts entries to a CSV string.
pub fn to_csv(entries: &[MergedEntry]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(entries, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
