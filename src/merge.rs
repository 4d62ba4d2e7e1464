//! Merge engine: folds consecutive messages from one author into a single entry.
//!
//! The fold state is an explicit [`MergeState`] value. Each
//! [`push`](MergeState::push) consumes the state and returns the next one,
//! together with the entry that was closed by an author change, if any.
//!
//! # Join rule
//!
//! A continuation is appended after a single space. If the run's text so far
//! ends (ignoring trailing whitespace) with `.`, `!` or `?`, the first letter
//! of the continuation is upper-cased; otherwise it is lower-cased. Only one
//! leading ASCII letter is ever touched.
//!
//! ```
//! use convotable::merge::merge_messages;
//! use convotable::message::ParsedMessage;
//!
//! let messages = vec![
//!     ParsedMessage::parse("2024-03-01T09:00:00", "Alice", "Good morning everyone").unwrap(),
//!     ParsedMessage::parse("2024-03-01T09:00:45", "Alice", "Just a quick heads up").unwrap(),
//! ];
//! let merged = merge_messages(messages);
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].text, "Good morning everyone just a quick heads up");
//! ```

use crate::message::{MergedEntry, ParsedMessage};

/// Characters that end a sentence for the join rule.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Accumulator threaded through the merge fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeState {
    open: Option<MergedEntry>,
}

impl MergeState {
    /// Creates a state with no open run.
    pub fn new() -> Self {
        Self::default()
    }

    /// The run currently being accumulated.
    pub fn open_run(&self) -> Option<&MergedEntry> {
        self.open.as_ref()
    }

    /// Folds one message into the state.
    ///
    /// Returns the updated state and, when `msg` starts a new speaker run,
    /// the finished previous entry.
    #[must_use]
    pub fn push(self, msg: ParsedMessage) -> (Self, Option<MergedEntry>) {
        match self.open {
            Some(mut run) if run.author == msg.author => {
                join_continuation(&mut run.text, &msg.text);
                run.end_time = msg.timestamp;
                run.message_count += 1;
                (Self { open: Some(run) }, None)
            }
            Some(run) => (
                Self {
                    open: Some(MergedEntry::start(msg)),
                },
                Some(run),
            ),
            None => (
                Self {
                    open: Some(MergedEntry::start(msg)),
                },
                None,
            ),
        }
    }

    /// Closes the open run, if any. Call once the input is exhausted.
    pub fn finish(self) -> Option<MergedEntry> {
        self.open
    }
}

/// Merges an ordered sequence of messages into speaker runs.
pub fn merge_messages(messages: impl IntoIterator<Item = ParsedMessage>) -> Vec<MergedEntry> {
    let mut merged = Vec::new();
    let mut state = MergeState::new();

    for msg in messages {
        let (next, closed) = state.push(msg);
        state = next;
        merged.extend(closed);
    }

    merged.extend(state.finish());
    merged
}

/// Appends `next` to `acc` using the terminal-punctuation join rule.
pub fn join_continuation(acc: &mut String, next: &str) {
    let ends_sentence = acc
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| TERMINAL_PUNCTUATION.contains(&c));

    acc.push(' ');
    if ends_sentence {
        acc.push_str(&capitalize_first(next));
    } else {
        acc.push_str(&lowercase_first(next));
    }
}

/// Upper-cases the first character if it is an ASCII letter.
pub fn capitalize_first(s: &str) -> String {
    map_first(s, |c| c.to_ascii_uppercase())
}

/// Lower-cases the first character if it is an ASCII letter.
pub fn lowercase_first(s: &str) -> String {
    map_first(s, |c| c.to_ascii_lowercase())
}

fn map_first(s: &str, f: impl Fn(char) -> char) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.push(f(first));
            out.push_str(chars.as_str());
            out
        }
    }
}

/// Statistics about a merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Messages fed into the fold
    pub messages: usize,
    /// Entries it produced
    pub entries: usize,
}

impl MergeStats {
    pub fn new(messages: usize, entries: usize) -> Self {
        Self { messages, entries }
    }

    /// Percentage of rows saved by merging (0.0 - 100.0).
    #[allow(clippy::cast_precision_loss)]
    pub fn compression_ratio(&self) -> f64 {
        if self.messages == 0 {
            return 0.0;
        }
        (1.0 - (self.entries as f64 / self.messages as f64)) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(ts: &str, author: &str, text: &str) -> ParsedMessage {
        ParsedMessage::parse(ts, author, text).unwrap()
    }

    #[test]
    fn test_standup_scenario() {
        let merged = merge_messages(vec![
            msg("2024-03-01T09:00:00", "Alice", "Good morning everyone"),
            msg("2024-03-01T09:00:45", "Alice", "Just a quick heads up about today's standup"),
            msg("2024-03-01T09:01:10", "Bob", "Morning! I'll be a few minutes late"),
            msg("2024-03-01T09:05:00", "Alice", "No worries, we'll wait"),
        ]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].start_time, "2024-03-01T09:00:00");
        assert_eq!(merged[0].author, "Alice");
        assert_eq!(
            merged[0].text,
            "Good morning everyone just a quick heads up about today's standup"
        );
        assert_eq!(merged[0].end_time, "2024-03-01T09:00:45");
        assert_eq!(merged[0].message_count, 2);

        assert_eq!(merged[1].start_time, "2024-03-01T09:01:10");
        assert_eq!(merged[1].author, "Bob");
        assert_eq!(merged[1].text, "Morning! I'll be a few minutes late");

        assert_eq!(merged[2].start_time, "2024-03-01T09:05:00");
        assert_eq!(merged[2].author, "Alice");
        assert_eq!(merged[2].text, "No worries, we'll wait");
    }

    #[test]
    fn test_terminal_punctuation_capitalizes() {
        for end in [".", "!", "?"] {
            let merged = merge_messages(vec![
                msg("2024-03-01T09:00:00", "Alice", &format!("Done{end}")),
                msg("2024-03-01T09:00:01", "Alice", "next thing"),
            ]);
            assert_eq!(merged[0].text, format!("Done{end} Next thing"));
        }
    }

    #[test]
    fn test_trailing_whitespace_ignored() {
        let merged = merge_messages(vec![
            msg("2024-03-01T09:00:00", "Alice", "Finished.   "),
            msg("2024-03-01T09:00:01", "Alice", "moving on"),
        ]);
        assert_eq!(merged[0].text, "Finished.    Moving on");
    }

    #[test]
    fn test_non_terminal_lowercases_only_first_letter() {
        let merged = merge_messages(vec![
            msg("2024-03-01T09:00:00", "Alice", "See the list,"),
            msg("2024-03-01T09:00:01", "Alice", "The NASA Report"),
        ]);
        assert_eq!(merged[0].text, "See the list, the NASA Report");
    }

    #[test]
    fn test_non_letter_first_char_unchanged() {
        let merged = merge_messages(vec![
            msg("2024-03-01T09:00:00", "Alice", "Numbers:"),
            msg("2024-03-01T09:00:01", "Alice", "42 items"),
            msg("2024-03-01T09:00:02", "Alice", "Élan vital"),
        ]);
        assert_eq!(merged[0].text, "Numbers: 42 items Élan vital");
    }

    #[test]
    fn test_empty_text_is_appended() {
        let mut text = String::from("Hello");
        join_continuation(&mut text, "");
        assert_eq!(text, "Hello ");
        join_continuation(&mut text, "World");
        assert_eq!(text, "Hello  world");
    }

    #[test]
    fn test_author_change_closes_run() {
        let state = MergeState::new();
        let (state, closed) = state.push(msg("2024-03-01T09:00:00", "Alice", "Hi"));
        assert!(closed.is_none());
        let (state, closed) = state.push(msg("2024-03-01T09:00:01", "Alice", "there"));
        assert!(closed.is_none());
        let (state, closed) = state.push(msg("2024-03-01T09:00:02", "Bob", "Hey"));

        let closed = closed.expect("Alice's run closes");
        assert_eq!(closed.author, "Alice");
        assert_eq!(closed.text, "Hi there");
        assert_eq!(state.open_run().map(|r| r.author.as_str()), Some("Bob"));

        let last = state.finish().expect("Bob's run flushes");
        assert_eq!(last.text, "Hey");
    }

    #[test]
    fn test_author_comparison_is_exact() {
        let merged = merge_messages(vec![
            msg("2024-03-01T09:00:00", "alice", "one"),
            msg("2024-03-01T09:00:01", "Alice", "two"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_messages(Vec::new()).is_empty());
        assert!(MergeState::new().finish().is_none());
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(capitalize_first("hello"), "Hello");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("ünïcode"), "ünïcode");
        assert_eq!(lowercase_first("Hello World"), "hello World");
        assert_eq!(lowercase_first("!Bang"), "!Bang");
    }

    #[test]
    fn test_merge_stats() {
        let stats = MergeStats::new(4, 3);
        assert!((stats.compression_ratio() - 25.0).abs() < f64::EPSILON);
        assert!(MergeStats::new(0, 0).compression_ratio().abs() < f64::EPSILON);
    }
}
