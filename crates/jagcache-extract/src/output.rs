//! Report rendering for the command line

use crate::cli::OutputFormat;
use jagcache_formats::SampleComparison;
use jagcache_storage::{CategoryReport, ExtractedAsset, ExtractionSummary, StorageError};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Archive failure as shown to the user
#[derive(Debug, Serialize)]
pub struct FailureView {
    /// Archive position within the category
    pub archive: usize,
    /// Error message
    pub message: String,
}

/// One category's outcome as shown to the user
#[derive(Debug, Serialize)]
pub struct CategoryView<'a> {
    /// Category identifier
    pub category: u32,
    /// Error that stopped the category, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Archive count from the index table
    pub archives: u32,
    /// Index table layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Number of samples written
    pub extracted: usize,
    /// Archives skipped because their size is zero
    pub skipped_empty: usize,
    /// Archive failures
    pub failures: Vec<FailureView>,
    /// Written samples
    pub assets: Vec<&'a ExtractedAsset>,
}

impl<'a> CategoryView<'a> {
    /// View of a processed category
    pub fn from_report(report: &'a CategoryReport) -> Self {
        Self {
            category: report.category,
            error: None,
            archives: report.declared_count,
            layout: Some(report.layout.to_string()),
            extracted: report.extracted_count(),
            skipped_empty: report.skipped_empty,
            failures: report
                .failures()
                .map(|e| FailureView {
                    archive: e.archive(),
                    message: e.to_string(),
                })
                .collect(),
            assets: report.assets().collect(),
        }
    }

    /// View of a category that could not be processed
    pub fn from_error(category: u32, error: &StorageError) -> Self {
        Self {
            category,
            error: Some(error.to_string()),
            archives: 0,
            layout: None,
            extracted: 0,
            skipped_empty: 0,
            failures: Vec::new(),
            assets: Vec::new(),
        }
    }
}

/// Whole-run report
#[derive(Debug, Serialize)]
pub struct SummaryView<'a> {
    /// Per-category views in run order
    pub categories: Vec<CategoryView<'a>>,
    /// Samples written across all categories
    pub total_extracted: usize,
}

impl<'a> SummaryView<'a> {
    /// View of a full run
    pub fn from_summary(summary: &'a ExtractionSummary) -> Self {
        Self {
            categories: summary
                .categories
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(report) => CategoryView::from_report(report),
                    Err(e) => CategoryView::from_error(outcome.category, e),
                })
                .collect(),
            total_extracted: summary.total_extracted(),
        }
    }

    /// View of a single-category run
    pub fn from_report(report: &'a CategoryReport) -> Self {
        Self {
            total_extracted: report.extracted_count(),
            categories: vec![CategoryView::from_report(report)],
        }
    }

    /// Write the report in the requested format
    pub fn write(&self, out: &mut impl Write, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(out),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)
            }
        }
    }

    fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        for view in &self.categories {
            if let Some(error) = &view.error {
                writeln!(out, "Index {}: {}", view.category, error)?;
                continue;
            }

            writeln!(
                out,
                "Index {}: {} archives ({} layout)",
                view.category,
                view.archives,
                view.layout.as_deref().unwrap_or("unknown")
            )?;
            for failure in &view.failures {
                writeln!(
                    out,
                    "  Error processing archive {}: {}",
                    failure.archive, failure.message
                )?;
            }
            write!(out, "Index {}: extracted {} sounds", view.category, view.extracted)?;
            if view.skipped_empty > 0 {
                write!(out, " ({} empty archives skipped)", view.skipped_empty)?;
            }
            writeln!(out)?;
        }

        if self.categories.len() > 1 {
            writeln!(out, "Total extracted: {} sounds", self.total_extracted)?;
        }
        Ok(())
    }
}

/// Comparison result as shown to the user
#[derive(Debug, Serialize)]
pub struct ComparisonView<'a> {
    /// First file
    pub first: &'a Path,
    /// Second file
    pub second: &'a Path,
    /// Whether both files hold identical samples
    pub equal: bool,
    /// Largest per-byte difference, -1 when incomparable
    pub max_difference: i32,
}

impl<'a> ComparisonView<'a> {
    /// View of a comparison between two files
    pub const fn new(first: &'a Path, second: &'a Path, result: SampleComparison) -> Self {
        Self {
            first,
            second,
            equal: result.equal,
            max_difference: result.max_difference,
        }
    }

    /// Write the result in the requested format
    pub fn write(&self, out: &mut impl Write, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Text => {
                let name = self
                    .first
                    .file_name()
                    .map_or_else(|| self.first.display().to_string(), |n| n.to_string_lossy().into_owned());
                if self.equal {
                    writeln!(out, "MATCH: {name}")
                } else if self.max_difference == SampleComparison::INCOMPARABLE.max_difference {
                    writeln!(out, "INCOMPARABLE: {name} ({})", self.second.display())
                } else {
                    writeln!(out, "MISMATCH: {name} (diff: {})", self.max_difference)
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)
            }
        }
    }
}
