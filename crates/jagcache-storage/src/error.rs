//! Storage and extraction error types

use jagcache_formats::FormatError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of cache file a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFileKind {
    /// Per-category size table
    Index,
    /// Shared archive data file
    Data,
}

impl fmt::Display for CacheFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("Index"),
            Self::Data => f.write_str("Data"),
        }
    }
}

/// Errors that stop a whole category (or run) before archives are processed
#[derive(Debug, Error)]
pub enum StorageError {
    /// A required cache file does not exist
    #[error("{kind} file not found: {}", path.display())]
    NotFound {
        /// Which cache file is missing
        kind: CacheFileKind,
        /// Path that was probed
        path: PathBuf,
    },

    /// A cache file exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The output directory for a category could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDirectory {
        /// Directory being created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Options file could not be parsed
    #[error("Invalid options file {}: {source}", path.display())]
    OptionsFile {
        /// Options file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Options failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Whether this error reports a missing cache file
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure reading an archive's bytes from the data file
#[derive(Debug, Error)]
pub enum ReadError {
    /// The data file ends before the archive does
    #[error("truncated read at offset {offset}: expected {expected} bytes, got {actual}")]
    TruncatedRead {
        /// Archive offset in the data file
        offset: u64,
        /// Bytes the index table promised
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure confined to one archive; extraction continues with the next one
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Raw bytes could not be read
    #[error("archive {archive}: {source}")]
    Read {
        /// Archive position within the category
        archive: usize,
        /// Read failure
        #[source]
        source: ReadError,
    },

    /// Raw bytes could not be decoded
    #[error("archive {archive}: {source}")]
    Decode {
        /// Archive position within the category
        archive: usize,
        /// Decode failure
        #[source]
        source: FormatError,
    },

    /// An extracted sample could not be written
    #[error("archive {archive} entry {entry}: failed to write {}: {source}", path.display())]
    Write {
        /// Archive position within the category
        archive: usize,
        /// Sub-payload position within the archive
        entry: usize,
        /// Destination file
        path: PathBuf,
        /// Write failure
        #[source]
        source: FormatError,
    },
}

impl ArchiveError {
    /// Archive position the failure belongs to
    pub const fn archive(&self) -> usize {
        match self {
            Self::Read { archive, .. } | Self::Decode { archive, .. } | Self::Write { archive, .. } => {
                *archive
            }
        }
    }
}
