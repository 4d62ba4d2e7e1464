//! Configuration types for matching and conversion.
//!
//! These structs carry no CLI framework dependencies and follow the builder
//! style: start from `new()` and chain `with_*` calls.
//!
//! # Example
//!
//! ```rust
//! use convotable::config::{MatcherConfig, PipelineConfig};
//! use convotable::format::OutputFormat;
//! use convotable::matcher::LineFormat;
//!
//! let config = PipelineConfig::new()
//!     .with_format(OutputFormat::Markdown)
//!     .with_matcher(MatcherConfig::only(LineFormat::Bold));
//!
//! assert_eq!(config.matcher.formats, vec![LineFormat::Bold]);
//! ```

use serde::{Deserialize, Serialize};

use crate::format::OutputFormat;
use crate::matcher::LineFormat;
use crate::pipeline::SourceKind;

/// Which line shapes the matcher accepts.
///
/// Shapes are tried in the order listed; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Enabled shapes (default: all of them)
    pub formats: Vec<LineFormat>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            formats: LineFormat::all().to_vec(),
        }
    }
}

impl MatcherConfig {
    /// Creates a configuration accepting every shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration accepting a single shape.
    pub fn only(format: LineFormat) -> Self {
        Self {
            formats: vec![format],
        }
    }

    /// Replaces the enabled shapes.
    ///
    /// Duplicates are dropped while keeping first-seen order. An empty list
    /// falls back to every shape.
    #[must_use]
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = LineFormat>) -> Self {
        let mut selected: Vec<LineFormat> = Vec::new();
        for format in formats {
            if !selected.contains(&format) {
                selected.push(format);
            }
        }
        self.formats = if selected.is_empty() {
            LineFormat::all().to_vec()
        } else {
            selected
        };
        self
    }
}

/// Settings for one conversion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Kind of input being read (default: timestamped chat lines)
    pub source: SourceKind,

    /// Output format (default: Markdown table)
    pub format: OutputFormat,

    /// Line matcher settings, used for chat sources
    pub matcher: MatcherConfig,
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source kind.
    #[must_use]
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the matcher configuration.
    #[must_use]
    pub fn with_matcher(mut self, matcher: MatcherConfig) -> Self {
        self.matcher = matcher;
        self
    }
}
