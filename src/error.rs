//! Unified error types for convotable.
//!
//! Only conditions that abort a conversion are errors. Lines that fail to
//! match the chat grammar, or match it with an invalid timestamp, are data
//! and surface as [`LineKind`](crate::matcher::LineKind) values instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::OutputFormat;
use crate::pipeline::SourceKind;

/// A specialized [`Result`] type for convotable operations.
///
/// # Example
///
/// ```rust
/// use convotable::error::Result;
/// use convotable::MergedEntry;
///
/// fn my_function() -> Result<Vec<MergedEntry>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ConvoError>;

/// The error type for all convotable operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvoError {
    /// The input source could not be opened or read.
    ///
    /// This is the only fatal condition of a conversion pass. Nothing is
    /// written to the destination when it occurs.
    #[error("Cannot read '{}': {source}", path.display())]
    SourceUnavailable {
        /// Path of the source that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred while writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested output format is not available for this source kind.
    #[error("{format} output is not supported for {kind} sources")]
    Unsupported {
        /// Source kind being converted
        kind: SourceKind,
        /// Format that was requested
        format: OutputFormat,
    },

    /// An output path has an extension no format is known for.
    #[error("Unknown file extension: '.{extension}'. Expected one of: md, csv, json, jsonl")]
    UnknownExtension {
        /// The lower-cased extension, without dot
        extension: String,
    },

    /// The requested output format was compiled out.
    #[error("{format} output requires the '{feature}' feature to be enabled")]
    FeatureDisabled {
        /// Format that was requested
        format: OutputFormat,
        /// Cargo feature that provides it
        feature: &'static str,
    },
}

impl ConvoError {
    /// Creates a source-unavailable error for `path`.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvoError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the input source could not be read.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, ConvoError::SourceUnavailable { .. })
    }

    /// Returns `true` if this is an output I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, ConvoError::Io(_))
    }

    /// Returns `true` if the format/source combination was rejected.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ConvoError::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        let err = ConvoError::source_unavailable("missing/chat.txt", io_err);
        let display = err.to_string();
        assert!(display.contains("missing/chat.txt"));
        assert!(display.contains("No such file or directory"));
        assert!(err.is_source_unavailable());
        assert!(!err.is_io());
    }

    #[test]
    fn test_source_unavailable_keeps_source() {
        use std::error::Error as _;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ConvoError::source_unavailable("chat.txt", io_err);
        let source = err.source().expect("source error");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn test_io_error_from() {
        let err: ConvoError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(err.is_io());
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_unsupported_display() {
        let err = ConvoError::Unsupported {
            kind: SourceKind::Transcript,
            format: OutputFormat::Csv,
        };
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "CSV output is not supported for transcript sources"
        );
    }
}
