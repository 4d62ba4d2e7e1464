//! Command-line interface definition using clap.
//!
//! [`Args`] maps straight onto a [`PipelineConfig`] and a [`LogPreset`].
//! Logging is initialized by [`init_logging`]; all diagnostics go to
//! stderr so the table on stdout stays clean.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{MatcherConfig, PipelineConfig};
use crate::format::OutputFormat;
use crate::matcher::LineFormat;
use crate::pipeline::SourceKind;

/// Default input path when none is given.
pub const DEFAULT_INPUT: &str = "./output.txt";

/// Merge a plain-text chat export into a speaker-by-speaker Markdown table.
#[derive(Parser, Debug, Clone)]
#[command(name = "convotable")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    convotable chat.txt
    convotable chat.txt -o chat.md
    convotable chat.txt -o chat.csv
    convotable chat.txt --format jsonl
    convotable chat.txt --line-format bold
    convotable transcript.txt --source transcript")]
pub struct Args {
    /// Path to the chat export
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: from the --output extension, else markdown]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Kind of input
    #[arg(short, long, value_enum, default_value_t = SourceKind::Chat)]
    pub source: SourceKind,

    /// Only accept these line shapes (repeatable; default: all)
    #[arg(long = "line-format", value_enum, value_name = "SHAPE")]
    pub line_formats: Vec<LineFormat>,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Builds the pipeline configuration from the parsed flags.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_source(self.source)
            .with_format(self.output_format())
            .with_matcher(MatcherConfig::new().with_formats(self.line_formats.iter().copied()))
    }

    /// Resolves the output format: `-f` wins, then the `-o` extension.
    ///
    /// An output file with an unknown extension (`notes.txt`) gets Markdown.
    pub fn output_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }
        self.output
            .as_deref()
            .and_then(|path| match OutputFormat::from_path(path) {
                Ok(format) => Some(format),
                Err(e) => {
                    tracing::debug!("{}; writing Markdown", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Picks the logging preset from `-q` / `-v`.
    pub fn log_preset(&self) -> LogPreset {
        if self.quiet {
            return LogPreset::Quiet;
        }
        match self.verbose {
            0 => LogPreset::Normal,
            1 => LogPreset::Verbose,
            _ => LogPreset::Debug,
        }
    }
}

/// Logging presets selected by CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Errors only
    Quiet,
    /// Warnings, including skipped lines (default)
    #[default]
    Normal,
    /// Informational progress
    Verbose,
    /// Everything, including pass statistics
    Debug,
}

impl LogPreset {
    /// Filter directive for this preset.
    pub fn directive(self) -> &'static str {
        match self {
            LogPreset::Quiet => "convotable=error",
            LogPreset::Normal => "convotable=warn",
            LogPreset::Verbose => "convotable=info",
            LogPreset::Debug => "convotable=debug",
        }
    }

    /// Builds the filter: `RUST_LOG` wins, otherwise the preset.
    pub fn build_filter(self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::new(self.directive())
    }
}

/// Initializes the stderr tracing subscriber.
pub fn init_logging(preset: LogPreset) {
    tracing_subscriber::fmt()
        .with_env_filter(preset.build_filter())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
