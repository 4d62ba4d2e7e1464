//! Conversion pipeline: read lines, classify, merge, render.
//!
//! A pass is strictly sequential. Each line is classified and folded before
//! the next one is read, and rendering starts only after the whole source was
//! read, so a failing read never leaves a half-written table behind.
//!
//! # Example
//!
//! ```rust
//! use convotable::config::PipelineConfig;
//! use convotable::pipeline::convert_reader;
//!
//! let input = "\
//! **2024-03-01T09:00:00 ** Alice:** Good morning everyone
//! **2024-03-01T09:00:45 ** Alice:** Just a quick heads up
//! **2024-03-01T09:01:10 ** Bob:** Morning!
//! ";
//!
//! let mut out = Vec::new();
//! let report = convert_reader(input.as_bytes(), &mut out, &PipelineConfig::new())?;
//!
//! assert_eq!(report.entries, 2);
//! let table = String::from_utf8(out).unwrap();
//! assert!(table.contains("| 2024-03-01T09:00:00 | Alice | Good morning everyone just a quick heads up |"));
//! # Ok::<(), convotable::ConvoError>(())
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{ConvoError, Result};
use crate::format::{OutputFormat, write_to_format};
use crate::matcher::{LineKind, LineMatcher};
use crate::merge::{MergeState, MergeStats};
use crate::message::MergedEntry;
use crate::transcript::{self, TranscriptParser, Turn};

/// Kind of text source being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Timestamped chat lines
    #[default]
    Chat,
    /// `speaker:` / `text:` transcript without timestamps
    Transcript,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Chat => write!(f, "chat"),
            SourceKind::Transcript => write!(f, "transcript"),
        }
    }
}

/// A chat line that had the message shape but an invalid timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the source
    pub line_number: usize,
    /// The rejected timestamp token
    pub timestamp: String,
    /// Why it was rejected
    pub reason: String,
}

/// Counters collected during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Lines read from the source
    pub lines_read: usize,
    /// Lines (or transcript turns) recognized as messages
    pub messages_matched: usize,
    /// Lines dropped for a malformed timestamp
    pub skipped: Vec<SkippedLine>,
    /// Rows produced after merging
    pub entries: usize,
}

impl ConversionReport {
    /// Returns `true` if the pass produced no rows.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn merge_stats(&self) -> MergeStats {
        MergeStats::new(self.messages_matched, self.entries)
    }
}

/// Rows produced by a pass, by source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rows {
    Chat(Vec<MergedEntry>),
    Transcript(Vec<Turn>),
}

/// The result of reading a source, ready to be written.
#[derive(Debug, Clone)]
pub struct Conversion {
    rows: Rows,
    format: OutputFormat,
    report: ConversionReport,
}

impl Conversion {
    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    /// Merged chat entries; empty for transcript sources.
    pub fn entries(&self) -> &[MergedEntry] {
        match &self.rows {
            Rows::Chat(entries) => entries.as_slice(),
            Rows::Transcript(_) => &[],
        }
    }

    pub fn report(&self) -> &ConversionReport {
        &self.report
    }

    pub fn into_report(self) -> ConversionReport {
        self.report
    }

    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }

    /// Writes the rendered rows. Writes nothing when there are no rows.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        match &self.rows {
            Rows::Chat(entries) => write_to_format(entries, writer, self.format),
            Rows::Transcript(turns) => transcript::write_markdown(turns, writer),
        }
    }
}

/// Reads and merges a source file without writing anything.
///
/// Failure to open or read `path` is reported as
/// [`ConvoError::SourceUnavailable`]. The file is closed before returning.
pub fn read_file(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<Conversion> {
    let path = path.as_ref();
    check_supported(config)?;

    let file = File::open(path).map_err(|e| ConvoError::source_unavailable(path, e))?;
    read_pass(BufReader::new(file), config).map_err(|e| ConvoError::source_unavailable(path, e))
}

/// Reads and merges lines from any buffered reader.
pub fn read_source<R: BufRead>(reader: R, config: &PipelineConfig) -> Result<Conversion> {
    check_supported(config)?;
    Ok(read_pass(reader, config)?)
}

/// Converts the file at `path`, writing the rendered table to `writer`.
pub fn convert_file<W: Write>(
    path: impl AsRef<Path>,
    writer: W,
    config: &PipelineConfig,
) -> Result<ConversionReport> {
    let conversion = read_file(path, config)?;
    conversion.write_to(writer)?;
    Ok(conversion.into_report())
}

/// Converts lines from `reader`, writing the rendered table to `writer`.
pub fn convert_reader<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    config: &PipelineConfig,
) -> Result<ConversionReport> {
    let conversion = read_source(reader, config)?;
    conversion.write_to(writer)?;
    Ok(conversion.into_report())
}

fn check_supported(config: &PipelineConfig) -> Result<()> {
    if config.source == SourceKind::Transcript && config.format != OutputFormat::Markdown {
        return Err(ConvoError::Unsupported {
            kind: config.source,
            format: config.format,
        });
    }
    Ok(())
}

fn read_pass<R: BufRead>(reader: R, config: &PipelineConfig) -> io::Result<Conversion> {
    let conversion = match config.source {
        SourceKind::Chat => read_chat(reader, config)?,
        SourceKind::Transcript => read_transcript(reader)?,
    };

    let stats = conversion.report.merge_stats();
    tracing::debug!(
        lines = conversion.report.lines_read,
        messages = stats.messages,
        entries = stats.entries,
        skipped = conversion.report.skipped.len(),
        "Merged {} messages into {} entries ({:.1}% reduction)",
        stats.messages,
        stats.entries,
        stats.compression_ratio()
    );

    Ok(conversion)
}

fn read_chat<R: BufRead>(reader: R, config: &PipelineConfig) -> io::Result<Conversion> {
    let matcher = LineMatcher::with_config(&config.matcher);
    let mut report = ConversionReport::default();
    let mut state = MergeState::new();
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        report.lines_read += 1;

        match matcher.classify(&line) {
            LineKind::Message(msg) => {
                report.messages_matched += 1;
                let (next, closed) = state.push(msg);
                state = next;
                entries.extend(closed);
            }
            LineKind::NoMatch => {}
            LineKind::BadTimestamp { timestamp, error } => {
                tracing::warn!(
                    line = idx + 1,
                    "Skipping line with bad timestamp '{}': {} ({})",
                    timestamp,
                    error,
                    line
                );
                report.skipped.push(SkippedLine {
                    line_number: idx + 1,
                    timestamp,
                    reason: error.to_string(),
                });
            }
        }
    }

    entries.extend(state.finish());
    report.entries = entries.len();

    Ok(Conversion {
        rows: Rows::Chat(entries),
        format: config.format,
        report,
    })
}

fn read_transcript<R: BufRead>(reader: R) -> io::Result<Conversion> {
    let mut report = ConversionReport::default();
    let mut parser = TranscriptParser::new();
    let mut turns = Vec::new();

    for line in reader.lines() {
        let line = line?;
        report.lines_read += 1;
        turns.extend(parser.feed(&line));
    }

    report.messages_matched = turns.len();
    let merged = transcript::merge_turns(turns);
    report.entries = merged.len();

    Ok(Conversion {
        rows: Rows::Transcript(merged),
        format: OutputFormat::Markdown,
        report,
    })
}
