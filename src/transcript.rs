//! Speaker/text transcripts without timestamps.
//!
//! Some exports list turns as key/value lines instead of timestamped chat
//! lines:
//!
//! ```text
//! speaker: "Alice",
//! text: "Hello there",
//! "speaker": "Bob",
//! "text": "Hi \"Alice\"",
//! ```
//!
//! A `speaker` line sets the pending speaker and the next `text` line emits
//! one turn for it. Consecutive turns of one speaker are merged with the same
//! join rule as chat runs and rendered as a two-column table.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::merge::join_continuation;
use crate::render::escape_cell;

/// One speaker turn, or a merged run of turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: String,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Speaker,
    Text,
}

/// Incremental transcript reader: feed lines, collect turns.
#[derive(Debug, Default)]
pub struct TranscriptParser {
    pending_speaker: Option<String>,
}

impl TranscriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line. Returns a turn when a `text` value completes one.
    pub fn feed(&mut self, line: &str) -> Option<Turn> {
        let (key, value) = parse_key_value(line)?;
        match key {
            Key::Speaker => {
                self.pending_speaker = Some(value);
                None
            }
            Key::Text => self
                .pending_speaker
                .take()
                .map(|speaker| Turn { speaker, text: value }),
        }
    }
}

/// Parses every turn in `input`.
pub fn parse_turns(input: &str) -> Vec<Turn> {
    let mut parser = TranscriptParser::new();
    input.lines().filter_map(|line| parser.feed(line)).collect()
}

/// Merges consecutive turns from the same speaker.
pub fn merge_turns(turns: impl IntoIterator<Item = Turn>) -> Vec<Turn> {
    let mut merged: Vec<Turn> = Vec::new();

    for turn in turns {
        match merged.last_mut() {
            Some(last) if last.speaker == turn.speaker => {
                join_continuation(&mut last.text, &turn.text);
            }
            _ => merged.push(turn),
        }
    }

    merged
}

/// Renders turns as a `| Speaker | Text |` Markdown table.
pub fn to_markdown(turns: &[Turn]) -> String {
    let mut out = String::new();
    out.push_str("| Speaker | Text |\n");
    out.push_str("|---------|------|\n");
    for turn in turns {
        out.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&turn.speaker),
            escape_cell(&turn.text)
        ));
    }
    out
}

/// Writes the Markdown table for `turns` to `writer`.
pub fn write_markdown<W: Write>(turns: &[Turn], mut writer: W) -> Result<()> {
    writer.write_all(to_markdown(turns).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn parse_key_value(line: &str) -> Option<(Key, String)> {
    let trimmed = line.trim();

    let (key, rest) = [
        ("speaker:", Key::Speaker),
        ("\"speaker\":", Key::Speaker),
        ("text:", Key::Text),
        ("\"text\":", Key::Text),
    ]
    .into_iter()
    .find_map(|(prefix, key)| trimmed.strip_prefix(prefix).map(|rest| (key, rest)))?;

    let rest = rest.trim_start().strip_prefix('"')?;
    parse_quoted(rest).map(|value| (key, value))
}

/// Reads a double-quoted value whose opening quote is already consumed.
///
/// Returns `None` if the closing quote is missing.
fn parse_quoted(s: &str) -> Option<String> {
    let mut value = String::new();
    let mut chars = s.chars();

    loop {
        match chars.next()? {
            '"' => return Some(value),
            '\\' => match chars.next()? {
                '"' => value.push('"'),
                'n' => value.push('\n'),
                't' => value.push('\t'),
                '\\' => value.push('\\'),
                other => {
                    value.push('\\');
                    value.push(other);
                }
            },
            c => value.push(c),
        }
    }
}
