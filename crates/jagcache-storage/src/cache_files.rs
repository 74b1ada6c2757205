//! Index and data file access
//!
//! Files are opened for the duration of a single read and closed on every
//! exit path, so one failed archive never leaves a handle behind.

use crate::error::{CacheFileKind, ReadError, StorageError};
use jagcache_formats::IndexTable;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load and decode a category's index file
///
/// A missing file is reported as [`StorageError::NotFound`]. The contents
/// themselves never fail to decode.
pub fn load_index(path: impl AsRef<Path>) -> Result<IndexTable, StorageError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| not_found_or(CacheFileKind::Index, path, source))?;
    let table = IndexTable::decode(&bytes);
    debug!(
        "Decoded {} ({} bytes, {} layout, {} archives)",
        path.display(),
        bytes.len(),
        table.layout(),
        table.len()
    );
    Ok(table)
}

/// Shared data file holding every archive back to back
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
    len: u64,
}

impl DataFile {
    /// Check that the data file exists and record its length
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let metadata =
            fs::metadata(path).map_err(|source| not_found_or(CacheFileKind::Data, path, source))?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound {
                kind: CacheFileKind::Data,
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            len: metadata.len(),
        })
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the data file when it was opened
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the data file was empty when it was opened
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read exactly `size` bytes at `offset`
    ///
    /// Ranges past the length recorded by [`DataFile::open`] fail without
    /// touching the file.
    pub fn read_archive(&self, offset: u64, size: usize) -> Result<Vec<u8>, ReadError> {
        let available = self.len.saturating_sub(offset);
        if size as u64 > available {
            return Err(ReadError::TruncatedRead {
                offset,
                expected: size,
                actual: available as usize,
            });
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut data = Vec::with_capacity(size);
        file.take(size as u64).read_to_end(&mut data)?;

        if data.len() < size {
            return Err(ReadError::TruncatedRead {
                offset,
                expected: size,
                actual: data.len(),
            });
        }
        Ok(data)
    }
}

fn not_found_or(kind: CacheFileKind, path: &Path, source: io::Error) -> StorageError {
    if source.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound {
            kind,
            path: path.to_path_buf(),
        }
    } else {
        StorageError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
