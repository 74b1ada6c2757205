//! A decompressed archive carries a 4-byte header followed by sample
//! payloads, each prefixed with an i16 LE length:
//!
//! ```text
//! +--------+-------+-----------+-------+-----------+-----
//! | header | len 0 | payload 0 | len 1 | payload 1 | ...
//! | 4 B    | i16   | len 0 B   | i16   | len 1 B   |
//! +--------+-------+-----------+-------+-----------+-----
//! ```
//!
//! There is no payload count. Iteration ends at the first non-positive
//! length, or when the bytes left cannot hold the next length or payload.
//! Neither condition is an error: a truncated trailing payload is dropped.

use std::iter::FusedIterator;

/// Bytes skipped at the start of every decompressed archive
pub const FRAME_HEADER_SIZE: usize = 4;

/// Width of the length prefix in front of each payload
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Split a decompressed archive into its sub-payloads
pub fn frame(data: &[u8]) -> Frames<'_> {
    Frames::new(data)
}

/// Lazy iterator over the sub-payloads of a decompressed archive
///
/// A clone continues from the same position. Call [`frame`] again to start
/// over from the first payload.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    data: &'a [u8],
    cursor: usize,
    done: bool,
}

impl<'a> Frames<'a> {
    /// Start framing at the first payload after the header
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: FRAME_HEADER_SIZE,
            done: data.len() < FRAME_HEADER_SIZE,
        }
    }

    /// Byte position of the next length prefix
    pub const fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(prefix) = self
            .data
            .get(self.cursor..self.cursor + LENGTH_PREFIX_SIZE)
        else {
            self.done = true;
            return None;
        };
        let length = i16::from_le_bytes([prefix[0], prefix[1]]);

        if length <= 0 {
            self.done = true;
            return None;
        }

        let start = self.cursor + LENGTH_PREFIX_SIZE;
        let end = start + length as usize;
        let Some(payload) = self.data.get(start..end) else {
            self.done = true;
            return None;
        };

        self.cursor = end;
        Some(payload)
    }
}

impl FusedIterator for Frames<'_> {}

/// Builder for decompressed archive bodies
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    header: [u8; FRAME_HEADER_SIZE],
    payloads: Vec<Vec<u8>>,
}

impl FrameBuilder {
    /// Create a builder with a zeroed header
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 4 header bytes
    #[must_use]
    pub const fn header(mut self, header: [u8; FRAME_HEADER_SIZE]) -> Self {
        self.header = header;
        self
    }

    /// Append a payload
    ///
    /// Payloads longer than `i16::MAX` cannot be framed and are truncated.
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        let mut payload = payload.into();
        payload.truncate(i16::MAX as usize);
        self.payloads.push(payload);
        self
    }

    /// Serialize header and payloads
    pub fn build(&self) -> Vec<u8> {
        let body: usize = self
            .payloads
            .iter()
            .map(|p| LENGTH_PREFIX_SIZE + p.len())
            .sum();
        let mut out = Vec::with_capacity(FRAME_HEADER_SIZE + body);
        out.extend_from_slice(&self.header);
        for payload in &self.payloads {
            out.extend_from_slice(&(payload.len() as i16).to_le_bytes());
            out.extend_from_slice(payload);
        }
        out
    }
}
