//! Output format selection.
//!
//! The Markdown table is always available. CSV and JSON outputs are gated
//! behind the `csv-output` and `json-output` features.
//!
//! # Example
//!
//! ```rust
//! use convotable::format::{OutputFormat, to_format_string};
//! use convotable::message::{MergedEntry, ParsedMessage};
//!
//! let msg = ParsedMessage::parse("2024-03-01T09:00:00", "Alice", "Hello!").unwrap();
//! let entries = vec![MergedEntry::start(msg)];
//!
//! let table = to_format_string(&entries, OutputFormat::Markdown)?;
//! assert!(table.starts_with("| Start Time | Name | Message |"));
//!
//! let format = OutputFormat::from_path("report.md")?;
//! assert_eq!(format, OutputFormat::Markdown);
//! # Ok::<(), convotable::ConvoError>(())
//! ```

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvoError, Result};
use crate::message::MergedEntry;

/// Output format for merged conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Markdown table `| Start Time | Name | Message |` (default)
    #[default]
    #[cfg_attr(feature = "cli", value(alias = "md"))]
    Markdown,

    /// CSV with semicolon delimiter
    Csv,

    /// JSON array of entries
    Json,

    /// JSON Lines - one entry per line
    #[cfg_attr(feature = "cli", value(alias = "ndjson"))]
    Jsonl,
}

impl OutputFormat {
    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["markdown", "md", "csv", "json", "jsonl", "ndjson"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Markdown,
            OutputFormat::Csv,
            OutputFormat::Json,
            OutputFormat::Jsonl,
        ]
    }

    /// Cargo feature needed to write this format, if any.
    pub fn required_feature(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Markdown => None,
            OutputFormat::Csv => Some("csv-output"),
            OutputFormat::Json | OutputFormat::Jsonl => Some("json-output"),
        }
    }

    /// Detects format from a file path based on extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        ext.parse().map_err(|_| ConvoError::UnknownExtension { extension: ext })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "Markdown"),
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes entries to `writer` in the given format.
pub fn write_to_format<W: Write>(
    entries: &[MergedEntry],
    writer: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Markdown => crate::render::write_markdown(entries, writer),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::render::write_csv(entries, writer),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::render::write_json(entries, writer),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::render::write_jsonl(entries, writer),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Converts entries to a string in the given format.
pub fn to_format_string(entries: &[MergedEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(crate::render::to_markdown(entries)),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::render::to_csv(entries),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::render::to_json(entries),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::render::to_jsonl(entries),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

#[allow(dead_code)]
fn feature_disabled(format: OutputFormat) -> ConvoError {
    ConvoError::FeatureDisabled {
        format,
        feature: format.required_feature().unwrap_or("default"),
    }
}
