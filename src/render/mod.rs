//! Table renderer and structured output writers.
//!
//! - [`write_markdown`] / [`to_markdown`] - `| Start Time | Name | Message |` table (always available)
//! - [`write_csv`] / [`to_csv`] - semicolon-delimited CSV - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines - requires `json-output` feature
//!
//! Writers take any [`std::io::Write`], so the same entry list can go to
//! stdout, a file, or an in-memory buffer.

mod markdown;

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;

pub use markdown::{escape_cell, to_markdown, write_markdown};

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, to_jsonl, write_json, write_jsonl};
