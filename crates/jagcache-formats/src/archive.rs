//! Archive blobs stored in the shared data file
//!
//! Each archive is laid out as:
//!
//! ```text
//! +--------+--------+----------------------+
//! | size   | unused | zlib stream          |
//! | u24 LE | 3 B    | remaining bytes      |
//! +--------+--------+----------------------+
//! ```
//!
//! The advertised size is a hint only. Real caches contain archives whose
//! inflated length differs from it, so a mismatch is logged and ignored.

use crate::error::{FormatError, Result};
use binrw::{BinRead, BinWrite};
use flate2::read::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::{Cursor, Read};
use tracing::debug;

/// Size of the fixed archive header
pub const ARCHIVE_HEADER_SIZE: usize = 6;

/// Upper bound on the inflated size of one archive (64 MiB)
///
/// Four times the largest size a 24-bit header can advertise. Guards against
/// compression bombs in corrupt caches.
pub const MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Output buffer growth step while inflating
const CHUNK_SIZE: usize = 8192;

/// Largest value the 24-bit size field can hold
const MAX_ADVERTISED_SIZE: u32 = 0x00FF_FFFF;

/// Fixed 6-byte archive header
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ArchiveHeader {
    /// Advertised decompressed size (24-bit LE)
    pub size_bytes: [u8; 3],
    /// Bytes not used by the extractor
    pub reserved: [u8; 3],
}

impl ArchiveHeader {
    /// Create a header advertising `size` decompressed bytes
    ///
    /// Sizes beyond 24 bits are clamped to the field maximum.
    pub fn new(size: usize) -> Self {
        let size = u32::try_from(size)
            .unwrap_or(MAX_ADVERTISED_SIZE)
            .min(MAX_ADVERTISED_SIZE);
        let [b0, b1, b2, _] = size.to_le_bytes();
        Self {
            size_bytes: [b0, b1, b2],
            reserved: [0; 3],
        }
    }

    /// Parse the header from the start of a raw archive
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < ARCHIVE_HEADER_SIZE {
            return Err(FormatError::ArchiveTooShort {
                len: data.len(),
                min: ARCHIVE_HEADER_SIZE,
            });
        }
        Ok(Self::read(&mut Cursor::new(&data[..ARCHIVE_HEADER_SIZE]))?)
    }

    /// Decompressed size advertised by the header
    pub const fn advertised_size(&self) -> u32 {
        u32::from_le_bytes([self.size_bytes[0], self.size_bytes[1], self.size_bytes[2], 0])
    }
}

/// Compute archive offsets from sizes.
///
/// Archives are stored back to back in index order, so each offset is the
/// sum of every preceding size.
pub fn offsets_of(sizes: &[u16]) -> Vec<u64> {
    sizes
        .iter()
        .scan(0u64, |next, &size| {
            let offset = *next;
            *next += u64::from(size);
            Some(offset)
        })
        .collect()
}

/// Decompress a raw archive, skipping its 6-byte header
///
/// Bytes after the end of the zlib stream are ignored. A stream that ends
/// before its terminator is reported as corrupt.
pub fn decompress(raw: &[u8]) -> Result<Vec<u8>> {
    decompress_with_limit(raw, MAX_DECOMPRESSED_SIZE)
}

/// Decompress a raw archive, failing once the output grows past `limit`
pub fn decompress_with_limit(raw: &[u8], limit: usize) -> Result<Vec<u8>> {
    let header = ArchiveHeader::parse(raw)?;
    let input = &raw[ARCHIVE_HEADER_SIZE..];
    let mut inflater = Decompress::new(true);
    let mut decompressed = Vec::with_capacity(CHUNK_SIZE);

    loop {
        if decompressed.len() == decompressed.capacity() {
            decompressed.reserve(CHUNK_SIZE);
        }

        // Streaming inflate: the output buffer grows between calls
        let consumed = inflater.total_in() as usize;
        let produced = decompressed.len();
        let status = inflater
            .decompress_vec(&input[consumed..], &mut decompressed, FlushDecompress::None)
            .map_err(|e| FormatError::DecompressionFailed(e.to_string()))?;

        if decompressed.len() > limit {
            return Err(FormatError::DecompressionFailed(format!(
                "decompressed size exceeds limit of {limit} bytes"
            )));
        }

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() as usize == consumed && decompressed.len() == produced;
                if stalled && decompressed.len() < decompressed.capacity() {
                    return Err(FormatError::DecompressionFailed(format!(
                        "truncated zlib stream after {} input bytes",
                        inflater.total_in()
                    )));
                }
            }
        }
    }

    let advertised = header.advertised_size() as usize;
    if advertised != decompressed.len() {
        debug!(
            "Advertised size {} differs from decompressed size {}",
            advertised,
            decompressed.len()
        );
    }

    Ok(decompressed)
}

/// Build a raw archive from decompressed bytes.
///
/// Writes a header advertising the input length followed by a zlib stream.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(ARCHIVE_HEADER_SIZE + data.len() / 2));
    ArchiveHeader::new(data.len()).write(&mut cursor)?;
    let mut archive = cursor.into_inner();

    let mut encoder = ZlibEncoder::new(data, Compression::default());
    encoder
        .read_to_end(&mut archive)
        .map_err(|e| FormatError::CompressionFailed(e.to_string()))?;

    Ok(archive)
}
