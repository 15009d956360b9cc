//! Record and statistics types.
//!
//! Defines [`Record`] (one decoded payload), plus [`EncodeStats`] and
//! [`DecodeStats`] for tracking conversion totals.

use std::borrow::Cow;
use std::fmt;

use crate::format::frame_size;

/// The payload of one frame: the raw bytes of a single text line.
///
/// A record never contains the newline delimiter and is never validated as
/// UTF-8. Commas are ordinary content.
///
/// # Example
///
/// ```
/// use length_indicated::Record;
///
/// let record = Record::from("b,c,d");
/// assert_eq!(record.len(), 5);
/// assert_eq!(record.as_str(), Some("b,c,d"));
/// assert_eq!(record.frame_len(), 13);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    payload: Vec<u8>,
}

impl Record {
    /// Create a record from raw payload bytes.
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Payload bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the record and return its payload.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.payload
    }

    /// Payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True for a record decoded from a blank line.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Size of the frame holding this record, length field included.
    #[inline]
    pub fn frame_len(&self) -> u64 {
        frame_size(self.payload.len() as u64)
    }

    /// The payload as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// The payload as text, replacing invalid UTF-8 sequences.
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

impl From<Vec<u8>> for Record {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl From<&[u8]> for Record {
    fn from(payload: &[u8]) -> Self {
        Self::new(payload.to_vec())
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}

/// Totals collected while writing frames.
///
/// ```
/// use length_indicated::EncodeStats;
///
/// let stats = EncodeStats::default();
/// assert_eq!(stats.total_records, 0);
/// assert_eq!(stats.bytes_written, 0);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Number of frames written.
    pub total_records: u64,
    /// Frames with a zero-length payload.
    pub blank_records: u64,
    /// Sum of payload lengths.
    pub payload_bytes: u64,
    /// Bytes written to the destination, length fields included.
    pub bytes_written: u64,
    /// Size in bytes of the largest payload.
    pub largest_payload: usize,
}

impl EncodeStats {
    pub(crate) fn record(&mut self, payload_len: usize) {
        self.total_records += 1;
        if payload_len == 0 {
            self.blank_records += 1;
        }
        self.payload_bytes += payload_len as u64;
        self.bytes_written += frame_size(payload_len as u64);
        self.largest_payload = self.largest_payload.max(payload_len);
    }
}

impl fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Encode Report")?;
        writeln!(f, "=============")?;
        writeln!(f, "  Records written:   {:>10}", self.total_records)?;
        writeln!(f, "  Blank records:     {:>10}", self.blank_records)?;
        writeln!(f, "  Payload bytes:     {:>10}", self.payload_bytes)?;
        writeln!(f, "  Bytes written:     {:>10}", self.bytes_written)?;
        write!(f, "  Largest payload:   {:>10} bytes", self.largest_payload)
    }
}

/// Totals collected while converting frames back to text lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Number of records decoded.
    pub total_records: u64,
    /// Records with a zero-length payload.
    pub blank_records: u64,
    /// Bytes consumed from the binary source.
    pub bytes_read: u64,
    /// Size in bytes of the largest payload.
    pub largest_payload: usize,
}

impl DecodeStats {
    pub(crate) fn record(&mut self, record: &Record) {
        self.total_records += 1;
        if record.is_empty() {
            self.blank_records += 1;
        }
        self.bytes_read += record.frame_len();
        self.largest_payload = self.largest_payload.max(record.len());
    }
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decode Report")?;
        writeln!(f, "=============")?;
        writeln!(f, "  Records decoded:   {:>10}", self.total_records)?;
        writeln!(f, "  Blank records:     {:>10}", self.blank_records)?;
        writeln!(f, "  Bytes read:        {:>10}", self.bytes_read)?;
        write!(f, "  Largest payload:   {:>10} bytes", self.largest_payload)
    }
}
