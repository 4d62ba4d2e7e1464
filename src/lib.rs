//! # convotable
//!
//! Turns plain-text chat exports into a compact, speaker-by-speaker table.
//!
//! ## Overview
//!
//! A chat export is read line by line. Lines shaped like
//!
//! ```text
//! **2024-03-01T09:00:00 ** Alice:** Good morning everyone
//! ```
//!
//! become messages; everything else is ignored. Consecutive messages from the
//! same author are merged into one paragraph, and the result is rendered as a
//! Markdown table with the columns `Start Time`, `Name` and `Message`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convotable::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let stdout = std::io::stdout();
//!     let report = convert_file("chat.txt", stdout.lock(), &PipelineConfig::new())?;
//!     if report.is_empty() {
//!         eprintln!("No conversations found.");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`matcher`] - classifies one line: message, no match, or bad timestamp
//! - [`merge`] - folds messages into speaker runs ([`MergeState`](merge::MergeState))
//! - [`render`] - Markdown table, plus CSV / JSON / JSONL writers
//! - [`pipeline`] - reads a source and drives the steps above
//! - [`transcript`] - timestamp-less `speaker:` / `text:` transcripts
//! - [`config`] - [`MatcherConfig`](config::MatcherConfig), [`PipelineConfig`](config::PipelineConfig)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) selection
//! - [`error`] - [`ConvoError`], [`Result`]
//! - [`cli`] - command-line arguments and logging setup (`cli` feature)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod matcher;
pub mod merge;
pub mod message;
pub mod pipeline;
pub mod render;
pub mod transcript;

pub use error::{ConvoError, Result};
pub use message::{MergedEntry, ParsedMessage};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use convotable::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ConvoError, Result};
    pub use crate::message::{MergedEntry, ParsedMessage};

    pub use crate::config::{MatcherConfig, PipelineConfig};
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
    pub use crate::matcher::{LineFormat, LineKind, LineMatcher, TimestampError};
    pub use crate::merge::{MergeState, merge_messages};
    pub use crate::pipeline::{
        ConversionReport, SourceKind, convert_file, convert_reader, read_file, read_source,
    };
    pub use crate::render::{to_markdown, write_markdown};
}
