//! Subcommand handlers

use crate::cli::{Cli, Commands, CompareArgs, ExtractArgs, OutputFormat};
use crate::output::{ComparisonView, SummaryView};
use anyhow::{Context, Result};
use jagcache_formats::wav;
use jagcache_storage::Extractor;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, info};

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked
    Success,
    /// The command ran but its result is negative
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Failure => Self::FAILURE,
        }
    }
}

/// Dispatch a parsed command line, writing the report to `out`
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome> {
    match &cli.command {
        Commands::Extract(args) => extract(args, cli.format, out),
        Commands::Compare(args) => compare(args, cli.format, out),
    }
}

/// Run `extract`.
///
/// With `--index` any category error is returned. With `--all` category
/// errors are reported and the run fails only when no category could be
/// processed.
pub fn extract(args: &ExtractArgs, format: OutputFormat, out: &mut impl Write) -> Result<Outcome> {
    let options = args.to_options().context("Invalid extraction options")?;
    debug!("Extraction options: {:?}", options);
    info!(
        "Extracting from {} into {}",
        options.cache_dir.display(),
        options.output_dir.display()
    );

    let extractor = Extractor::new(options)?;

    if let Some(category) = args.index {
        let report = extractor
            .extract_category(category)
            .with_context(|| format!("Failed to extract index {category}"))?;
        SummaryView::from_report(&report).write(out, format)?;
        return Ok(Outcome::Success);
    }

    let summary = extractor.extract_all().context("Extraction failed")?;
    SummaryView::from_summary(&summary).write(out, format)?;

    if summary.nothing_processed() {
        Ok(Outcome::Failure)
    } else {
        Ok(Outcome::Success)
    }
}

/// Run `compare`; succeeds only when both files hold identical samples
pub fn compare(args: &CompareArgs, format: OutputFormat, out: &mut impl Write) -> Result<Outcome> {
    let result = wav::compare(&args.first, &args.second);
    ComparisonView::new(&args.first, &args.second, result).write(out, format)?;

    if result.equal {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::Failure)
    }
}
