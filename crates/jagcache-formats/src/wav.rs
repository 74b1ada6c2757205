//! Extracted samples are stored as mono 8-bit unsigned PCM. The sample
//! bytes from the cache are written verbatim after a standard RIFF/WAVE
//! header, with no resampling or conversion.

use crate::error::Result;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tracing::warn;

/// Sample rate of cache sound effects
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Container parameters for extracted samples
pub const fn pcm8_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 8,
        sample_format: SampleFormat::Int,
    }
}

/// Write raw unsigned 8-bit samples as a WAV file, replacing any existing file
pub fn write_wav(samples: &[u8], destination: impl AsRef<Path>, sample_rate: u32) -> Result<()> {
    let file = File::create(destination)?;
    write_wav_to(samples, BufWriter::new(file), sample_rate)
}

/// Write raw unsigned 8-bit samples as a WAV stream
pub fn write_wav_to<W: Write + Seek>(samples: &[u8], writer: W, sample_rate: u32) -> Result<()> {
    let mut wav = WavWriter::new(writer, pcm8_spec(sample_rate))?;
    // hound takes 8-bit samples as i8 and stores them offset by 128
    for &sample in samples {
        wav.write_sample((sample ^ 0x80) as i8)?;
    }
    wav.finalize()?;
    Ok(())
}

/// Decoded WAV container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavData {
    /// Channel count
    pub channels: u16,
    /// Bytes per sample
    pub sample_width: u16,
    /// Frames per second
    pub sample_rate: u32,
    /// Sample bytes exactly as stored in the data chunk
    pub samples: Vec<u8>,
}

/// Read a WAV file
pub fn read_wav(path: impl AsRef<Path>) -> Result<WavData> {
    let file = File::open(path)?;
    read_wav_from(BufReader::new(file))
}

/// Read a WAV stream
pub fn read_wav_from<R: Read>(reader: R) -> Result<WavData> {
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();
    let sample_width = spec.bits_per_sample.div_ceil(8);

    let mut samples = Vec::with_capacity(reader.len() as usize * usize::from(sample_width));
    match (spec.sample_format, sample_width) {
        (SampleFormat::Int, 1) => {
            for sample in reader.samples::<i8>() {
                samples.push((sample? as u8) ^ 0x80);
            }
        }
        (SampleFormat::Int, 2) => {
            for sample in reader.samples::<i16>() {
                samples.extend_from_slice(&sample?.to_le_bytes());
            }
        }
        (SampleFormat::Int, width) => {
            let width = usize::from(width);
            for sample in reader.samples::<i32>() {
                samples.extend_from_slice(&sample?.to_le_bytes()[..width]);
            }
        }
        (SampleFormat::Float, _) => {
            for sample in reader.samples::<f32>() {
                samples.extend_from_slice(&sample?.to_le_bytes());
            }
        }
    }

    Ok(WavData {
        channels: spec.channels,
        sample_width,
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Outcome of comparing the samples of two WAV files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleComparison {
    /// Whether both files hold identical sample bytes
    pub equal: bool,
    /// Largest absolute per-byte difference, or -1 when the files cannot be
    /// compared
    pub max_difference: i32,
}

impl SampleComparison {
    /// Result for files with different layouts or lengths
    pub const INCOMPARABLE: Self = Self {
        equal: false,
        max_difference: -1,
    };

    /// Compare two decoded containers byte by byte
    pub fn between(a: &WavData, b: &WavData) -> Self {
        if a.channels != b.channels
            || a.sample_width != b.sample_width
            || a.samples.len() != b.samples.len()
        {
            return Self::INCOMPARABLE;
        }

        let max_difference = a
            .samples
            .iter()
            .zip(&b.samples)
            .map(|(&x, &y)| i32::from(x.abs_diff(y)))
            .max()
            .unwrap_or(0);

        Self {
            equal: max_difference == 0,
            max_difference,
        }
    }

    /// Whether the files could be compared at all
    pub const fn is_comparable(&self) -> bool {
        self.max_difference >= 0
    }
}

/// Compare the sample data of two WAV files.
///
/// Files that cannot be read compare as [`SampleComparison::INCOMPARABLE`].
pub fn compare(a: impl AsRef<Path>, b: impl AsRef<Path>) -> SampleComparison {
    let (a, b) = (a.as_ref(), b.as_ref());
    match (read_wav(a), read_wav(b)) {
        (Ok(a), Ok(b)) => SampleComparison::between(&a, &b),
        (Err(e), _) | (_, Err(e)) => {
            warn!(
                "Error comparing {} with {}: {}",
                a.display(),
                b.display(),
                e
            );
            SampleComparison::INCOMPARABLE
        }
    }
}
