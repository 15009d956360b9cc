//! Length-indicated record reading.
//!
//! [`read_length_indicated_record`] reads exactly one frame from a positioned
//! stream. [`FrameReader`] wraps a stream for sequential reads with offset
//! tracking, and [`convert_from_length_indicated`] turns a whole binary file
//! back into newline-delimited text.
//!
//! Every read has three outcomes:
//!
//! - `Ok(Some(record))`: one frame consumed
//! - `Ok(None)`: the stream was already at its end
//! - `Err(TruncatedFrame)`: the stream ended inside a frame

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, error, warn};

use crate::error::{LengthIndicatedError, Result};
use crate::format::{read_length, LengthField, LENGTH_FIELD_SIZE, RECORD_DELIMITER};
use crate::record::{DecodeStats, Record};

/// Upper bound on the buffer reserved before any payload bytes arrive.
///
/// The declared length is untrusted, so the buffer grows with bytes actually
/// read past this point.
const MAX_PREALLOCATION: u64 = 64 * 1024;

/// Read one frame from `reader`.
///
/// The stream must be positioned at a frame boundary. On success it has
/// advanced by exactly the frame's size, length field included. The stream is
/// neither opened, seeked nor closed here.
///
/// Offsets in a [`LengthIndicatedError::TruncatedFrame`] returned by this
/// function are relative to the stream position at the time of the call. Use
/// [`FrameReader`] for absolute offsets.
///
/// # Example
///
/// ```
/// use length_indicated::{encode_frame, read_length_indicated_record};
/// use std::io::Cursor;
///
/// let mut bytes = encode_frame(b"alpha");
/// bytes.extend(encode_frame(b""));
/// let mut stream = Cursor::new(bytes);
///
/// let first = read_length_indicated_record(&mut stream).unwrap().unwrap();
/// assert_eq!(first.as_bytes(), b"alpha");
/// assert_eq!(stream.position(), 13);
///
/// let second = read_length_indicated_record(&mut stream).unwrap().unwrap();
/// assert!(second.is_empty());
///
/// assert!(read_length_indicated_record(&mut stream).unwrap().is_none());
/// ```
pub fn read_length_indicated_record<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Record>> {
    read_frame_at(reader, 0)
}

fn read_frame_at<R: Read + ?Sized>(reader: &mut R, offset: u64) -> Result<Option<Record>> {
    let length = match read_length(reader)? {
        LengthField::Length(length) => length,
        LengthField::EndOfStream => return Ok(None),
        LengthField::Partial(read) => {
            warn!(offset, read, "stream ended inside a length field");
            return Err(LengthIndicatedError::TruncatedFrame {
                offset,
                expected: LENGTH_FIELD_SIZE as u64,
                actual: read as u64,
            });
        }
    };

    let mut payload = Vec::with_capacity(length.min(MAX_PREALLOCATION) as usize);
    let read = Read::take(&mut *reader, length).read_to_end(&mut payload)? as u64;

    if read < length {
        warn!(offset, length, read, "stream ended inside a payload");
        return Err(LengthIndicatedError::TruncatedFrame {
            offset,
            expected: length,
            actual: read,
        });
    }

    Ok(Some(Record::new(payload)))
}

/// Sequential reader over a length-indicated stream.
///
/// Tracks the byte offset of the next frame and the number of records read.
/// Once a read returns `Ok(None)` or an error the reader is finished and keeps
/// returning `Ok(None)` until [`reset`](FrameReader::reset); after an error the
/// stream is left inside the damaged frame. Also usable as an iterator.
///
/// # Example
///
/// ```no_run
/// use length_indicated::FrameReader;
/// use std::path::Path;
///
/// let reader = FrameReader::open(Path::new("people.bin")).unwrap();
/// for record in reader {
///     println!("{}", record.unwrap().to_text_lossy());
/// }
/// ```
pub struct FrameReader<R> {
    reader: R,
    offset: u64,
    /// Bytes taken from `reader` since it was wrapped, partial frames included.
    consumed: u64,
    records_read: u64,
    finished: bool,
}

/// Counts bytes read through it so a failed frame still leaves an exact tally.
struct Counting<'a, R: ?Sized> {
    inner: &'a mut R,
    count: &'a mut u64,
}

impl<R: Read + ?Sized> Read for Counting<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        *self.count += n as u64;
        Ok(n)
    }
}

impl FrameReader<BufReader<File>> {
    /// Open a binary file for reading from its first frame.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| {
            error!(path = %path.display(), %source, "failed to open source");
            LengthIndicatedError::OpenSource {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), "opened source");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> FrameReader<R> {
    /// Wrap a stream positioned at a frame boundary. Offsets count from here.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            consumed: 0,
            records_read: 0,
            finished: false,
        }
    }

    /// Read the next record.
    pub fn read_next(&mut self) -> Result<Option<Record>> {
        if self.finished {
            return Ok(None);
        }

        let mut counting = Counting {
            inner: &mut self.reader,
            count: &mut self.consumed,
        };
        match read_frame_at(&mut counting, self.offset) {
            Ok(Some(record)) => {
                self.offset += record.frame_len();
                self.records_read += 1;
                Ok(Some(record))
            }
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    /// Byte offset of the next frame.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records read so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> FrameReader<R> {
    /// Rewind to the position the stream had when it was wrapped.
    pub fn reset(&mut self) -> Result<()> {
        let position = self.reader.stream_position()?;
        let start = position.checked_sub(self.consumed).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "stream was repositioned behind the frame reader",
            )
        })?;
        self.reader.seek(SeekFrom::Start(start))?;
        self.offset = 0;
        self.consumed = 0;
        self.records_read = 0;
        self.finished = false;
        Ok(())
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Convert a length-indicated binary file back into newline-delimited text.
///
/// Every record is written followed by `\n`. A text file whose last line ends
/// in a newline survives an encode/decode round trip byte for byte.
///
/// # Errors
///
/// - [`LengthIndicatedError::OpenSource`] / [`LengthIndicatedError::OpenDestination`]
///   if either file cannot be opened
/// - [`LengthIndicatedError::TruncatedFrame`] if the binary file ends inside a
///   frame; records before it have already been written
pub fn convert_from_length_indicated(source: &Path, destination: &Path) -> Result<DecodeStats> {
    let mut reader = FrameReader::open(source)?;

    let output = File::create(destination).map_err(|err| {
        error!(path = %destination.display(), error = %err, "failed to open destination");
        LengthIndicatedError::OpenDestination {
            path: destination.to_path_buf(),
            source: err,
        }
    })?;
    debug!(path = %destination.display(), "opened destination");
    let mut writer = BufWriter::new(output);

    let mut stats = DecodeStats::default();
    let result = loop {
        match reader.read_next() {
            Ok(Some(record)) => {
                writer.write_all(record.as_bytes())?;
                writer.write_all(&[RECORD_DELIMITER])?;
                stats.record(&record);
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    writer.flush()?;
    drop(writer);
    debug!(path = %destination.display(), "closed destination");
    drop(reader);
    debug!(path = %source.display(), "closed source");
    result?;

    debug!(
        records = stats.total_records,
        bytes = stats.bytes_read,
        "decode complete"
    );

    Ok(stats)
}
