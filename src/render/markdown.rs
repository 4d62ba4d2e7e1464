//! Markdown table output.

use std::io::Write;

use crate::error::Result;
use crate::message::MergedEntry;

const HEADER: &str = "| Start Time | Name | Message |\n";
const SEPARATOR: &str = "|------------|------|---------|\n";

/// Renders entries as a three-column Markdown table, one row per entry.
///
/// Rows keep the order of `entries`. Cells go through [`escape_cell`], so
/// every row parses as exactly three cells.
pub fn to_markdown(entries: &[MergedEntry]) -> String {
    let mut table = String::with_capacity(HEADER.len() + SEPARATOR.len() + entries.len() * 64);

    table.push_str(HEADER);
    table.push_str(SEPARATOR);

    for entry in entries {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&entry.start_time),
            escape_cell(&entry.author),
            escape_cell(&entry.text)
        ));
    }

    table
}

/// Writes the Markdown table for `entries` to `writer`.
pub fn write_markdown<W: Write>(entries: &[MergedEntry], mut writer: W) -> Result<()> {
    writer.write_all(to_markdown(entries).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Neutralizes characters that would break a table row.
///
/// `|` becomes `\|`. Backslashes directly before a pipe are doubled so the
/// pipe stays escaped. Line breaks (`\r\n`, `\n`, `\r`) become one space.
pub fn escape_cell(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut backslashes = 0usize;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                backslashes += 1;
                continue;
            }
            '|' => {
                out.extend(std::iter::repeat_n('\\', backslashes * 2));
                out.push_str("\\|");
            }
            '\r' | '\n' => {
                out.extend(std::iter::repeat_n('\\', backslashes));
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            _ => {
                out.extend(std::iter::repeat_n('\\', backslashes));
                out.push(c);
            }
        }
        backslashes = 0;
    }
    out.extend(std::iter::repeat_n('\\', backslashes));

    out
}
