//! Message records produced by the line matcher and the merge engine.
//!
//! A [`ParsedMessage`] is one recognized chat line. A [`MergedEntry`] is one
//! finished speaker run: every consecutive message from the same author
//! folded into a single paragraph.
//!
//! # Example
//!
//! ```
//! use convotable::message::ParsedMessage;
//!
//! let msg = ParsedMessage::parse("2024-03-01T09:00:00", "Alice", "Good morning").unwrap();
//! assert_eq!(msg.author(), "Alice");
//! assert_eq!(msg.timestamp(), "2024-03-01T09:00:00");
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::matcher::parse_timestamp;

/// One chat line recovered by the matcher.
///
/// `timestamp` is the literal token from the source line and is never
/// reformatted. `time` is the same instant after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Timestamp token exactly as it appeared in the line.
    pub timestamp: String,

    /// Validated local time of `timestamp`.
    pub time: NaiveDateTime,

    /// Speaker name, never empty.
    pub author: String,

    /// Message body.
    pub text: String,
}

impl ParsedMessage {
    /// Builds a message from already-validated parts.
    pub fn new(
        timestamp: impl Into<String>,
        time: NaiveDateTime,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            time,
            author: author.into(),
            text: text.into(),
        }
    }

    /// Builds a message, validating `timestamp` with the matcher's formats.
    ///
    /// Returns `None` if the timestamp is not a valid date/time or the
    /// author is empty.
    pub fn parse(
        timestamp: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<Self> {
        let timestamp = timestamp.into();
        let author = author.into();
        if author.is_empty() {
            return None;
        }
        let time = parse_timestamp(&timestamp).ok()?;
        Some(Self::new(timestamp, time, author, text))
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A finished speaker run, rendered as one table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedEntry {
    /// Timestamp token of the first message in the run.
    pub start_time: String,

    /// Speaker of every message in the run.
    pub author: String,

    /// Punctuation-joined text of the whole run.
    pub text: String,

    /// Timestamp token of the last message folded into the run.
    pub end_time: String,

    /// Number of messages folded into the run.
    pub message_count: usize,
}

impl MergedEntry {
    /// Opens a run from its first message.
    pub fn start(msg: ParsedMessage) -> Self {
        Self {
            end_time: msg.timestamp.clone(),
            start_time: msg.timestamp,
            author: msg.author,
            text: msg.text,
            message_count: 1,
        }
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if more than one message was folded into this entry.
    pub fn is_merged(&self) -> bool {
        self.message_count > 1
    }
}
