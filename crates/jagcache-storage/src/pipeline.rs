//! Category extraction pipeline
//!
//! For each category the pipeline decodes the index table, derives archive
//! offsets and then walks the archives in index order:
//!
//! ```text
//! read -> decompress -> frame -> write idx<c>_archive<i>_entry<j>.wav
//! ```
//!
//! Failures reading or decoding one archive are recorded in the category
//! report and the walk continues with the next archive. Only a missing data
//! file, a missing index file or an unusable output directory stop a
//! category.

use crate::cache_files::{DataFile, load_index};
use crate::config::ExtractOptions;
use crate::error::{ArchiveError, StorageError};
use jagcache_formats::archive::{decompress, offsets_of};
use jagcache_formats::frame::frame;
use jagcache_formats::{IndexLayout, wav};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One sample written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedAsset {
    /// Category the sample came from
    pub category: u32,
    /// Archive position within the category
    pub archive: usize,
    /// Sub-payload position within the archive
    pub entry: usize,
    /// Written WAV file
    pub path: PathBuf,
    /// Number of 8-bit samples written
    pub sample_count: usize,
}

/// File name for an extracted sample
pub fn asset_file_name(category: u32, archive: usize, entry: usize) -> String {
    format!("idx{category}_archive{archive}_entry{entry}.wav")
}

/// Outcome of extracting one category
#[derive(Debug)]
pub struct CategoryReport {
    /// Category identifier
    pub category: u32,
    /// Archive count recorded in the index table
    pub declared_count: u32,
    /// Index table layout
    pub layout: IndexLayout,
    /// Directory the samples were written to
    pub output_dir: PathBuf,
    /// Archives skipped because their size is zero
    pub skipped_empty: usize,
    /// Written samples and archive failures, in archive then entry order
    pub results: Vec<Result<ExtractedAsset, ArchiveError>>,
}

impl CategoryReport {
    /// Successfully written samples
    pub fn assets(&self) -> impl Iterator<Item = &ExtractedAsset> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Archive failures
    pub fn failures(&self) -> impl Iterator<Item = &ArchiveError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Number of samples written
    pub fn extracted_count(&self) -> usize {
        self.assets().count()
    }

    /// Number of archives that failed
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Outcome of one category in a full run
#[derive(Debug)]
pub struct CategoryOutcome {
    /// Category identifier
    pub category: u32,
    /// Report, or the error that stopped the category
    pub result: Result<CategoryReport, StorageError>,
}

/// Outcome of a full run over the configured categories
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    /// Per-category outcomes in run order
    pub categories: Vec<CategoryOutcome>,
}

impl ExtractionSummary {
    /// Reports of categories that were processed
    pub fn reports(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter_map(|c| c.result.as_ref().ok())
    }

    /// Samples written across all categories
    pub fn total_extracted(&self) -> usize {
        self.reports().map(CategoryReport::extracted_count).sum()
    }

    /// Number of categories that were processed
    pub fn processed_count(&self) -> usize {
        self.reports().count()
    }

    /// Whether no category could be processed
    pub fn nothing_processed(&self) -> bool {
        self.processed_count() == 0
    }
}

/// Runs extraction over a cache directory
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor after validating `options`
    pub fn new(options: ExtractOptions) -> Result<Self, StorageError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options this extractor runs with
    pub const fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract every configured category.
    ///
    /// A missing data file fails the run before any category starts.
    /// Any other category error is recorded and the run moves on.
    pub fn extract_all(&self) -> Result<ExtractionSummary, StorageError> {
        let data = DataFile::open(self.options.data_path())?;
        let mut summary = ExtractionSummary::default();

        for &category in &self.options.categories {
            let result = self.extract_with(&data, category);
            match &result {
                Ok(report) => info!(
                    "Index {}: extracted {} sounds",
                    category,
                    report.extracted_count()
                ),
                Err(e) => warn!("Index {}: {}", category, e),
            }
            summary.categories.push(CategoryOutcome { category, result });
        }

        info!("Total extracted: {} sounds", summary.total_extracted());
        Ok(summary)
    }

    /// Extract a single category
    pub fn extract_category(&self, category: u32) -> Result<CategoryReport, StorageError> {
        let data = DataFile::open(self.options.data_path())?;
        self.extract_with(&data, category)
    }

    fn extract_with(&self, data: &DataFile, category: u32) -> Result<CategoryReport, StorageError> {
        let table = load_index(self.options.index_path(category))?;
        let offsets = offsets_of(table.sizes());
        info!("Index {}: {} archives", category, table.declared_count());

        let output_dir = self.options.category_dir(category);
        fs::create_dir_all(&output_dir).map_err(|source| StorageError::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;

        let mut report = CategoryReport {
            category,
            declared_count: table.declared_count(),
            layout: table.layout(),
            output_dir,
            skipped_empty: 0,
            results: Vec::new(),
        };

        for ((archive, size), offset) in table.entries().zip(offsets) {
            if size == 0 {
                debug!("Archive {} is empty, skipping", archive);
                report.skipped_empty += 1;
                continue;
            }
            self.extract_archive(data, &mut report, archive, offset, usize::from(size));
        }

        Ok(report)
    }

    fn extract_archive(
        &self,
        data: &DataFile,
        report: &mut CategoryReport,
        archive: usize,
        offset: u64,
        size: usize,
    ) {
        let decompressed = match read_and_decompress(data, archive, offset, size) {
            Ok(decompressed) => decompressed,
            Err(e) => {
                warn!("Error processing archive {}: {}", archive, e);
                report.results.push(Err(e));
                return;
            }
        };

        for (entry, samples) in frame(&decompressed).enumerate() {
            if samples.is_empty() {
                continue;
            }
            match self.write_asset(&report.output_dir, report.category, archive, entry, samples) {
                Ok(asset) => report.results.push(Ok(asset)),
                Err(e) => {
                    warn!("Error processing archive {}: {}", archive, e);
                    report.results.push(Err(e));
                    return;
                }
            }
        }
    }

    fn write_asset(
        &self,
        output_dir: &Path,
        category: u32,
        archive: usize,
        entry: usize,
        samples: &[u8],
    ) -> Result<ExtractedAsset, ArchiveError> {
        let path = output_dir.join(asset_file_name(category, archive, entry));
        match wav::write_wav(samples, &path, self.options.sample_rate) {
            Ok(()) => Ok(ExtractedAsset {
                category,
                archive,
                entry,
                path,
                sample_count: samples.len(),
            }),
            Err(source) => Err(ArchiveError::Write {
                archive,
                entry,
                path,
                source,
            }),
        }
    }
}

fn read_and_decompress(
    data: &DataFile,
    archive: usize,
    offset: u64,
    size: usize,
) -> Result<Vec<u8>, ArchiveError> {
    let raw = data
        .read_archive(offset, size)
        .map_err(|source| ArchiveError::Read { archive, source })?;
    decompress(&raw).map_err(|source| ArchiveError::Decode { archive, source })
}
