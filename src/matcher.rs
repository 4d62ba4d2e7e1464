//! Line matcher for plain-text chat exports.
//!
//! Each input line is classified independently. A line is a message when it
//! carries a timestamp token, an author terminated by a colon, and the rest
//! of the line as text. Supported shapes:
//!
//! - Bold: `**2024-03-01T09:00:00 ** Alice:** Good morning`
//! - Bold with dash: `**2024-03-01T09:00:00 - Alice:** Good morning`
//! - Plain: `2024-03-01T09:00:00 - Alice: Good morning`
//!
//! Leading whitespace is ignored. In the bold shapes anything wrapped in the
//! opening `**` counts as the timestamp token; the plain shape needs a
//! date-like prefix. The token is validated separately, so a line with the
//! right shape but an unusable timestamp (`2024-02-30T09:00:00`,
//! `2024-03-01T9:00`, `yesterday`) is reported as [`LineKind::BadTimestamp`]
//! rather than silently dropped.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, format::ParseErrorKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::message::ParsedMessage;

/// Accepted timestamp layouts, tried in order.
pub const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-like prefix that starts a plain line.
const LOOSE_TIMESTAMP: &str =
    r"\d{4}[-/.]\d{1,2}[-/.]\d{1,2}[T ]\d{1,2}:\d{1,2}(?::\d{1,2})?";

static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(?::\d{2})?$")
        .expect("timestamp shape is valid")
});

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| compile(LineFormat::Bold));
static BOLD_DASH_RE: LazyLock<Regex> = LazyLock::new(|| compile(LineFormat::BoldDash));
static PLAIN_RE: LazyLock<Regex> = LazyLock::new(|| compile(LineFormat::Plain));

fn compile(format: LineFormat) -> Regex {
    let pattern = format.pattern().replace("{TS}", LOOSE_TIMESTAMP);
    Regex::new(&pattern).expect("line format patterns are valid")
}

/// Why a timestamp token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// Not `YYYY-MM-DD`, `T` or space, `HH:MM`, optional `:SS`.
    #[error("expected YYYY-MM-DD HH:MM[:SS] with 'T' or space separator")]
    Shape,
    /// Right shape, but not a real date or time.
    #[error(transparent)]
    Invalid(#[from] chrono::ParseError),
}

/// Accepted line shapes, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum LineFormat {
    /// `**<ts> ** <author>:** <text>`
    Bold,
    /// `**<ts> - <author>:** <text>`
    BoldDash,
    /// `<ts> - <author>: <text>`
    Plain,
}

impl LineFormat {
    /// Regex template for this shape. `{TS}` stands for a date-like prefix.
    pub fn pattern(self) -> &'static str {
        match self {
            LineFormat::Bold => r"^\*\*([^*]+?)[ \t]*\*\*[ \t]*(.+?):\*\*[ \t]?(.+)$",
            LineFormat::BoldDash => r"^\*\*([^*]+?) - (.+?):\*\*[ \t]?(.+)$",
            LineFormat::Plain => r"^({TS}) - (.+?): (.+)$",
        }
    }

    /// Returns all shapes in matching order.
    pub fn all() -> &'static [LineFormat] {
        &[LineFormat::Bold, LineFormat::BoldDash, LineFormat::Plain]
    }

    fn regex(self) -> &'static Regex {
        match self {
            LineFormat::Bold => &*BOLD_RE,
            LineFormat::BoldDash => &*BOLD_DASH_RE,
            LineFormat::Plain => &*PLAIN_RE,
        }
    }
}

impl std::fmt::Display for LineFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineFormat::Bold => write!(f, "bold"),
            LineFormat::BoldDash => write!(f, "bold-dash"),
            LineFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// The line is a chat message.
    Message(ParsedMessage),
    /// The line does not have the shape of a chat message.
    NoMatch,
    /// The line has the right shape but its timestamp is not a valid date/time.
    BadTimestamp {
        /// The offending timestamp token
        timestamp: String,
        /// Why it was rejected
        error: TimestampError,
    },
}

impl LineKind {
    pub fn is_message(&self) -> bool {
        matches!(self, LineKind::Message(_))
    }
}

/// Classifies lines against a set of enabled [`LineFormat`]s.
///
/// # Example
///
/// ```
/// use convotable::matcher::{LineKind, LineMatcher};
///
/// let matcher = LineMatcher::new();
/// let kind = matcher.classify("**2024-03-01T09:00:00 ** Alice:** Good morning");
/// let LineKind::Message(msg) = kind else { panic!("expected a message") };
/// assert_eq!(msg.author, "Alice");
/// assert_eq!(msg.text, "Good morning");
///
/// assert_eq!(matcher.classify("just some prose"), LineKind::NoMatch);
/// ```
#[derive(Debug, Clone)]
pub struct LineMatcher {
    formats: Vec<LineFormat>,
}

impl LineMatcher {
    /// Creates a matcher accepting every supported shape.
    pub fn new() -> Self {
        Self::with_config(&MatcherConfig::default())
    }

    /// Creates a matcher from configuration.
    pub fn with_config(config: &MatcherConfig) -> Self {
        Self {
            formats: config.formats.clone(),
        }
    }

    /// Enabled shapes, in matching order.
    pub fn formats(&self) -> &[LineFormat] {
        &self.formats
    }

    /// Classifies one line. Never fails.
    pub fn classify(&self, line: &str) -> LineKind {
        let line = line.trim_start();
        let Some(caps) = self
            .formats
            .iter()
            .find_map(|format| format.regex().captures(line))
        else {
            return LineKind::NoMatch;
        };

        let timestamp = &caps[1];
        match parse_timestamp(timestamp) {
            Ok(time) => LineKind::Message(ParsedMessage::new(timestamp, time, &caps[2], &caps[3])),
            Err(error) => LineKind::BadTimestamp {
                timestamp: timestamp.to_string(),
                error,
            },
        }
    }
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies one line with every shape enabled.
pub fn classify(line: &str) -> LineKind {
    LineMatcher::new().classify(line)
}

/// Parses a timestamp token into a local date/time.
///
/// The token must have the `YYYY-MM-DD[T ]HH:MM[:SS]` shape with two-digit
/// fields; each of [`TIMESTAMP_FORMATS`] is then tried in turn.
pub fn parse_timestamp(token: &str) -> Result<NaiveDateTime, TimestampError> {
    if !TIMESTAMP_SHAPE.is_match(token) {
        return Err(TimestampError::Shape);
    }

    let mut first_error = None;
    for format in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(token, format) {
            Ok(time) => return Ok(time),
            // Right layout, impossible value
            Err(e)
                if matches!(
                    e.kind(),
                    ParseErrorKind::OutOfRange | ParseErrorKind::Impossible
                ) =>
            {
                return Err(e.into());
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(first_error.map_or(TimestampError::Shape, TimestampError::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(line: &str) -> ParsedMessage {
        match classify(line) {
            LineKind::Message(msg) => msg,
            other => panic!("expected message for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_bold_line() {
        let msg = message("**2024-03-01T09:00:00 ** Alice:** Good morning everyone");
        assert_eq!(msg.timestamp, "2024-03-01T09:00:00");
        assert_eq!(msg.author, "Alice");
        assert_eq!(msg.text, "Good morning everyone");
    }

    #[test]
    fn test_bold_line_keeps_inner_punctuation() {
        let msg = message("**2024-03-01T09:01:10 ** Bob:** Morning! I'll be a few minutes late");
        assert_eq!(msg.author, "Bob");
        assert_eq!(msg.text, "Morning! I'll be a few minutes late");
    }

    #[test]
    fn test_bold_dash_line() {
        let msg = message("**2024-05-01T12:00:00 - Alice:** Hello, how are you?");
        assert_eq!(msg.timestamp, "2024-05-01T12:00:00");
        assert_eq!(msg.author, "Alice");
        assert_eq!(msg.text, "Hello, how are you?");
    }

    #[test]
    fn test_plain_line() {
        let msg = message("2024-05-01T12:00:00 - Alice: Hello, how are you?");
        assert_eq!(msg.author, "Alice");
        assert_eq!(msg.text, "Hello, how are you?");
    }

    #[test]
    fn test_author_stops_at_first_terminator() {
        let msg = message("2024-05-01T12:00:00 - Alice: Re: the plan");
        assert_eq!(msg.author, "Alice");
        assert_eq!(msg.text, "Re: the plan");
    }

    #[test]
    fn test_author_with_spaces() {
        let msg = message("**2024-03-01T09:00:00 ** Mary Jane:** hi");
        assert_eq!(msg.author, "Mary Jane");
    }

    #[test]
    fn test_timestamp_without_seconds() {
        let msg = message("**2024-03-01T09:00 ** Alice:** hi");
        assert_eq!(msg.timestamp, "2024-03-01T09:00");
        assert_eq!(msg.time.to_string(), "2024-03-01 09:00:00");
    }

    #[test]
    fn test_timestamp_with_space_separator() {
        let msg = message("2024-03-01 09:00:30 - Alice: hi");
        assert_eq!(msg.timestamp, "2024-03-01 09:00:30");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify(""), LineKind::NoMatch);
        assert_eq!(classify("Just chatting"), LineKind::NoMatch);
        assert_eq!(classify("**Agenda**"), LineKind::NoMatch);
        assert_eq!(classify("**2024-03-01T09:00:00 ** Alice** no colon"), LineKind::NoMatch);
        assert_eq!(classify("**2024-03-01T09:00:00 ** Alice:**"), LineKind::NoMatch);
        assert_eq!(classify("Note - Alice: not a timestamp"), LineKind::NoMatch);
    }

    #[test]
    fn test_leading_whitespace_is_ignored() {
        let msg = message("  2024-05-01T12:00:00 - Alice: indented");
        assert_eq!(msg.author, "Alice");
        assert_eq!(msg.text, "indented");

        let msg = message("\t**2024-03-01T09:00:00 ** Alice:** hi ");
        assert_eq!(msg.timestamp, "2024-03-01T09:00:00");
        assert_eq!(msg.text, "hi ");
    }

    #[test]
    fn test_bad_timestamp() {
        let kind = classify("**2024-02-30T09:00:00 ** Alice:** Hello");
        match kind {
            LineKind::BadTimestamp { timestamp, .. } => {
                assert_eq!(timestamp, "2024-02-30T09:00:00");
            }
            other => panic!("expected bad timestamp, got {other:?}"),
        }

        assert!(matches!(
            classify("2024-01-01T25:00:00 - Bob: late"),
            LineKind::BadTimestamp { .. }
        ));
    }

    #[test]
    fn test_malformed_bold_timestamp_is_reported() {
        for (line, token) in [
            ("**2024-03-01T9:00:00 ** Alice:** hi", "2024-03-01T9:00:00"),
            ("**2024/03/01 09:00 ** Alice:** hi", "2024/03/01 09:00"),
            ("**yesterday ** Alice:** hi", "yesterday"),
            ("**2024-05-01 9:00 - Bob:** hi", "2024-05-01 9:00"),
        ] {
            match classify(line) {
                LineKind::BadTimestamp { timestamp, error } => {
                    assert_eq!(timestamp, token);
                    assert_eq!(error, TimestampError::Shape);
                }
                other => panic!("expected bad timestamp for {line:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_plain_timestamp_is_reported() {
        assert!(matches!(
            classify("2024-5-01T12:00:00 - Alice: hi"),
            LineKind::BadTimestamp { .. }
        ));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let matcher = LineMatcher::new();
        for line in [
            "**2024-03-01T09:00:00 ** Alice:** Good morning",
            "**2024-02-30T09:00:00 ** Alice:** Hello",
            "nothing here",
        ] {
            assert_eq!(matcher.classify(line), matcher.classify(line));
        }
    }

    #[test]
    fn test_restricted_formats() {
        let matcher = LineMatcher::with_config(&MatcherConfig::only(LineFormat::Bold));
        assert_eq!(matcher.formats(), &[LineFormat::Bold]);
        assert!(matcher.classify("**2024-03-01T09:00:00 ** Alice:** hi").is_message());
        assert_eq!(
            matcher.classify("2024-05-01T12:00:00 - Alice: hi"),
            LineKind::NoMatch
        );
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-03-01T09:00:00").is_ok());
        assert!(parse_timestamp("2024-03-01 09:00").is_ok());
        assert!(parse_timestamp("2024-02-29T09:00:00").is_ok());
        assert!(parse_timestamp("2023-02-29T09:00:00").is_err());
        assert!(parse_timestamp("2024-03-01T09:60:00").is_err());
        assert_eq!(parse_timestamp("2024-03-01T9:00"), Err(TimestampError::Shape));
        assert_eq!(parse_timestamp(""), Err(TimestampError::Shape));
    }

    #[test]
    fn test_parse_timestamp_tries_every_layout() {
        for token in [
            "2024-03-01T09:00:30",
            "2024-03-01T09:00",
            "2024-03-01 09:00:30",
            "2024-03-01 09:00",
        ] {
            let time = parse_timestamp(token).unwrap();
            assert_eq!(time.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 09:00");
        }
    }

    #[test]
    fn test_impossible_date_keeps_chrono_reason() {
        match parse_timestamp("2024-02-30T09:00:00") {
            Err(TimestampError::Invalid(e)) => assert!(matches!(
                e.kind(),
                ParseErrorKind::OutOfRange | ParseErrorKind::Impossible
            )),
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn test_line_format_display() {
        assert_eq!(LineFormat::Bold.to_string(), "bold");
        assert_eq!(LineFormat::BoldDash.to_string(), "bold-dash");
        assert_eq!(LineFormat::Plain.to_string(), "plain");
    }
}
