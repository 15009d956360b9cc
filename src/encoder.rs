//! Text to length-indicated conversion.
//!
//! [`convert_to_length_indicated`] reads a newline-delimited text file and
//! writes one frame per line. [`FrameWriter`] exposes the same framing over
//! any [`Write`] implementation.
//!
//! # Example
//!
//! ```no_run
//! use length_indicated::convert_to_length_indicated;
//! use std::path::Path;
//!
//! let stats = convert_to_length_indicated(
//!     Path::new("people.csv"),
//!     Path::new("people.bin"),
//! ).unwrap();
//!
//! println!("Wrote {} records", stats.total_records);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, error};

use crate::error::{LengthIndicatedError, Result};
use crate::format::{write_frame, RECORD_DELIMITER};
use crate::record::EncodeStats;

/// Writes payloads as length-indicated frames.
///
/// Payloads are written as-is; the writer does not look for delimiters or
/// validate encodings.
pub struct FrameWriter<W: Write> {
    writer: W,
    stats: EncodeStats,
}

impl<W: Write> FrameWriter<W> {
    /// Wrap a writer positioned where the first frame should go.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            stats: EncodeStats::default(),
        }
    }

    /// Write one payload as a frame.
    pub fn write_record(&mut self, payload: &[u8]) -> Result<()> {
        write_frame(&mut self.writer, payload)?;
        self.stats.record(payload.len());
        Ok(())
    }

    /// Flushes pending writes to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Returns a reference to the current write statistics.
    pub fn stats(&self) -> &EncodeStats {
        &self.stats
    }

    /// Unwrap the underlying writer. Buffered data is not flushed.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl FrameWriter<BufWriter<File>> {
    /// Create or truncate `path` and write frames to it.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| {
            error!(path = %path.display(), %source, "failed to open destination");
            LengthIndicatedError::OpenDestination {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), "opened destination");
        Ok(Self::new(BufWriter::new(file)))
    }
}

/// Convert a newline-delimited text file into a length-indicated binary file.
///
/// Each line becomes one frame, in source order. The newline is stripped and
/// everything else, including a `\r` from CRLF line endings, is payload. A
/// final line without a newline is still a record; a trailing newline does not
/// produce an extra empty record.
///
/// The source is opened before the destination, so a missing source leaves
/// the destination untouched. Both files are closed on every return path.
///
/// # Errors
///
/// - [`LengthIndicatedError::OpenSource`] if the source cannot be opened
/// - [`LengthIndicatedError::OpenDestination`] if the destination cannot be
///   created
/// - [`LengthIndicatedError::Io`] if reading or writing fails part way
pub fn convert_to_length_indicated(source: &Path, destination: &Path) -> Result<EncodeStats> {
    let input = File::open(source).map_err(|err| {
        error!(path = %source.display(), error = %err, "failed to open source");
        LengthIndicatedError::OpenSource {
            path: source.to_path_buf(),
            source: err,
        }
    })?;
    debug!(path = %source.display(), "opened source");

    let mut reader = BufReader::new(input);
    let mut writer = FrameWriter::create(destination)?;

    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader.read_until(RECORD_DELIMITER, &mut line)?;
        if read == 0 {
            break;
        }
        if line.last() == Some(&RECORD_DELIMITER) {
            line.pop();
        }
        writer.write_record(&line)?;
    }

    writer.flush()?;
    let stats = writer.stats().clone();
    drop(writer);
    debug!(path = %destination.display(), "closed destination");
    drop(reader);
    debug!(path = %source.display(), "closed source");

    debug!(
        records = stats.total_records,
        bytes = stats.bytes_written,
        "encode complete"
    );

    Ok(stats)
}
