//! On-disk cache access and audio extraction.
//!
//! A cache directory holds one index file per category and a single shared
//! data file:
//!
//! ```text
//! <cache>/main_file_cache.dat2      archives, back to back, in index order
//! <cache>/main_file_cache.idx<N>    size table for category N
//! ```
//!
//! [`Extractor`] walks a category's archives and writes every sample it
//! finds as `<output>/idx<N>/idx<N>_archive<i>_entry<j>.wav`.
//!
//! # Example
//!
//! ```rust,no_run
//! use jagcache_storage::{ExtractOptions, Extractor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ExtractOptions::new("~/.runelite/jagexcache/oldschool/LIVE")
//!     .with_output_dir("extracted");
//! let extractor = Extractor::new(options)?;
//!
//! let report = extractor.extract_category(14)?;
//! println!("Extracted {} sounds", report.extracted_count());
//! for failure in report.failures() {
//!     println!("  {failure}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Index and data file access
pub mod cache_files;

// Extraction options
pub mod config;

mod error;

// Extraction pipeline
pub mod pipeline;

pub use cache_files::{DataFile, load_index};
pub use config::{CacheLayout, ExtractOptions};
pub use error::{ArchiveError, CacheFileKind, ReadError, StorageError};
pub use pipeline::{
    CategoryOutcome, CategoryReport, ExtractedAsset, ExtractionSummary, Extractor,
    asset_file_name,
};

/// Version information for the storage crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
