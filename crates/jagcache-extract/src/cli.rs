//! Command-line configuration.
//!
//! Options can be provided via:
//! - CLI arguments (`--cache-dir`, `--output`, etc.)
//! - Environment variables (`JAGCACHE_CACHE_DIR`, `JAGCACHE_OUTPUT_DIR`)
//! - A JSON options file (`--config`)
//! - Default values
//!
//! Command-line values win over the options file, which wins over defaults.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use jagcache_storage::{ExtractOptions, StorageError};
use std::path::PathBuf;
use tracing::Level;

/// Top-level command line
#[derive(Debug, Parser)]
#[command(
    name = "jagcache-extract",
    about = "Extract sound effects from a flat indexed game cache into WAV files",
    version
)]
pub struct Cli {
    /// Set the logging level (overridden by RUST_LOG)
    #[arg(short, long, value_enum, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Output format
    #[arg(short = 'f', long, value_enum, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract sounds from one category or every configured category
    Extract(ExtractArgs),

    /// Compare the samples of two WAV files
    Compare(CompareArgs),
}

/// Arguments for `extract`
#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("selection").required(true).args(["all", "index"])))]
pub struct ExtractArgs {
    /// Extract every configured category
    #[arg(short, long)]
    pub all: bool,

    /// Extract a single category
    #[arg(short, long, value_name = "CATEGORY")]
    pub index: Option<u32>,

    /// Categories processed by --all (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "LIST", conflicts_with = "index")]
    pub categories: Option<Vec<u32>>,

    /// Cache directory holding the index and data files
    #[arg(short, long, env = "JAGCACHE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output root; each category is written to idx<N>/ below it
    #[arg(short, long, env = "JAGCACHE_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Sample rate written into the WAV headers
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// JSON options file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ExtractArgs {
    /// Build extraction options from the options file and arguments
    pub fn to_options(&self) -> Result<ExtractOptions, StorageError> {
        let mut options = match &self.config {
            Some(path) => ExtractOptions::load(path)?,
            None => ExtractOptions::default(),
        };

        if let Some(cache_dir) = &self.cache_dir {
            options = options.with_cache_dir(cache_dir);
        }
        if let Some(output) = &self.output {
            options = options.with_output_dir(output);
        }
        if let Some(sample_rate) = self.sample_rate {
            options = options.with_sample_rate(sample_rate);
        }
        if let Some(index) = self.index {
            options = options.with_categories(vec![index]);
        } else if let Some(categories) = &self.categories {
            options = options.with_categories(categories.clone());
        }

        options.validate()?;
        Ok(options)
    }
}

/// Arguments for `compare`
#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    /// First WAV file
    pub first: PathBuf,

    /// Second WAV file
    pub second: PathBuf,
}

/// Logging level
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Per-archive detail
    Debug,
    /// Per-category progress
    Info,
    /// Archive failures only
    Warn,
    /// Fatal errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Format of the report printed to stdout
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Pretty-printed JSON
    Json,
}
