//! Format error types

use thiserror::Error;

/// Errors produced while decoding or encoding cache formats
#[derive(Debug, Error)]
pub enum FormatError {
    /// Raw archive is shorter than its fixed header
    #[error("archive data too short: {len} bytes (header needs {min})")]
    ArchiveTooShort {
        /// Length of the raw archive
        len: usize,
        /// Minimum length required
        min: usize,
    },

    /// Compressed payload could not be inflated
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// Compressed payload could not be produced
    #[error("compression failed: {0}")]
    CompressionFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV container error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for format operations
pub type Result<T> = std::result::Result<T, FormatError>;
