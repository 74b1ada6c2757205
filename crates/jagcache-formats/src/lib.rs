//! Binary codecs for flat indexed game caches
//!
#![allow(clippy::cast_possible_truncation)] // Stream counters fit in usize
#![allow(clippy::cast_possible_wrap)] // Signed length prefixes
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
//! This crate implements the byte-level formats needed to turn a cache
//! category into audio files:
//!
//! - **Index**: per-category size tables, in both the declared-count layout
//!   and the legacy flat layout
//! - **Archive**: the 6-byte archive header and zlib payload of each blob in
//!   the shared data file
//! - **Frame**: length-prefixed sub-payloads inside a decompressed archive
//! - **Wav**: mono 8-bit PCM containers for extracted samples
//!
//! # Example
//!
//! ```
//! use jagcache_formats::{archive, frame, index};
//!
//! let table = index::decode(&[0x02, 0, 0, 0, 0x0A, 0, 0x14, 0]);
//! assert_eq!(table.sizes(), &[10, 20]);
//! assert_eq!(archive::offsets_of(table.sizes()), vec![0, 10]);
//!
//! let payloads: Vec<&[u8]> = frame::frame(&[0, 0, 0, 0, 0x03, 0, 0x41, 0x42, 0x43]).collect();
//! assert_eq!(payloads, vec![&b"ABC"[..]]);
//! ```
//!
//! Every codec that reads untrusted bytes is lenient where the cache format
//! is: index tables and framing never fail, only archive decompression does.

#![warn(missing_docs)]

/// Archive header, decompression and archive building
pub mod archive;
mod error;
/// Sub-payload framing inside decompressed archives
pub mod frame;
/// Per-category index tables
pub mod index;
/// Mono 8-bit PCM WAV containers
pub mod wav;

pub use archive::{ArchiveHeader, MAX_DECOMPRESSED_SIZE};
pub use error::{FormatError, Result};
pub use frame::{FrameBuilder, Frames};
pub use index::{IndexLayout, IndexTable};
pub use wav::{DEFAULT_SAMPLE_RATE, SampleComparison, WavData};
