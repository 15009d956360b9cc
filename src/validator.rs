//! Binary file validation.
//!
//! Walks a length-indicated file frame by frame and reports what it found.
//! The format has no checksums or record count, so the only damage that can
//! be detected is a file that ends inside a frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use length_indicated::validator::FrameValidator;
//! use std::path::Path;
//!
//! let stats = FrameValidator::new().validate(Path::new("people.bin"))?;
//!
//! println!("Frames: {}", stats.total_frames);
//! println!("Valid: {}", stats.is_valid());
//! ```

use std::fmt;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::decoder::FrameReader;
use crate::error::{LengthIndicatedError, Result};

/// Where and how a file was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedAt {
    /// Byte offset of the damaged frame.
    pub offset: u64,
    /// Bytes the frame still required at the cut.
    pub expected: u64,
    /// Bytes that were present.
    pub actual: u64,
}

/// Statistics collected during validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationStats {
    /// Number of complete frames.
    pub total_frames: u64,
    /// Complete frames with a zero-length payload.
    pub blank_frames: u64,
    /// Sum of complete payload lengths.
    pub payload_bytes: u64,
    /// Bytes covered by complete frames.
    pub bytes_scanned: u64,
    /// Size in bytes of the largest complete payload.
    pub largest_payload: usize,
    /// Set when the file ends inside a frame.
    pub truncated: Option<TruncatedAt>,
}

impl ValidationStats {
    /// Returns true if every byte of the file belongs to a complete frame.
    pub fn is_valid(&self) -> bool {
        self.truncated.is_none()
    }
}

impl fmt::Display for ValidationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Length-Indicated Validation Report")?;
        writeln!(f, "==================================")?;
        writeln!(
            f,
            "Status: {}",
            if self.is_valid() { "VALID" } else { "TRUNCATED" }
        )?;
        writeln!(f)?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Total frames:      {:>10}", self.total_frames)?;
        writeln!(f, "  Blank frames:      {:>10}", self.blank_frames)?;
        writeln!(f, "  Payload bytes:     {:>10}", self.payload_bytes)?;
        writeln!(f, "  Bytes scanned:     {:>10}", self.bytes_scanned)?;
        writeln!(f, "  Largest payload:   {:>10} bytes", self.largest_payload)?;

        if let Some(cut) = &self.truncated {
            writeln!(f)?;
            writeln!(f, "Truncated frame:")?;
            writeln!(f, "  Offset:            {:>10}", cut.offset)?;
            writeln!(f, "  Expected bytes:    {:>10}", cut.expected)?;
            writeln!(f, "  Available bytes:   {:>10}", cut.actual)?;
        }

        Ok(())
    }
}

/// Validator for length-indicated binary files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameValidator;

impl FrameValidator {
    /// Creates a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validate the file at `path`.
    ///
    /// A truncated file is reported through [`ValidationStats::truncated`],
    /// not as an error. Errors are reserved for files that cannot be opened
    /// or read.
    pub fn validate(&self, path: &Path) -> Result<ValidationStats> {
        let stats = self.validate_frames(FrameReader::open(path)?)?;
        debug!(
            path = %path.display(),
            frames = stats.total_frames,
            valid = stats.is_valid(),
            "validation complete"
        );
        Ok(stats)
    }

    /// Validate a stream positioned at its first frame.
    pub fn validate_reader<R: Read>(&self, reader: R) -> Result<ValidationStats> {
        self.validate_frames(FrameReader::new(reader))
    }

    fn validate_frames<R: Read>(&self, mut frames: FrameReader<R>) -> Result<ValidationStats> {
        let mut stats = ValidationStats::default();

        loop {
            match frames.read_next() {
                Ok(Some(record)) => {
                    stats.total_frames += 1;
                    if record.is_empty() {
                        stats.blank_frames += 1;
                    }
                    stats.payload_bytes += record.len() as u64;
                    stats.largest_payload = stats.largest_payload.max(record.len());
                }
                Ok(None) => break,
                Err(LengthIndicatedError::TruncatedFrame {
                    offset,
                    expected,
                    actual,
                }) => {
                    stats.truncated = Some(TruncatedAt {
                        offset,
                        expected,
                        actual,
                    });
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        stats.bytes_scanned = frames.offset();
        Ok(stats)
    }
}
