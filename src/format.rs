//! Length-indicated binary format.
//!
//! A binary file is a plain concatenation of frames with no file header,
//! trailer, magic number or record count:
//!
//! ```text
//! ┌──────────────────┬──────────────────────┐
//! │ Length           │ Payload              │
//! │ 8 bytes          │ `Length` bytes, raw  │
//! │ uint64 LE        │                      │
//! └──────────────────┴──────────────────────┘
//! ```
//!
//! The length field is always a little-endian `u64`. On 64-bit little-endian
//! hosts this matches a native `size_t` prefix byte for byte, and files stay
//! portable across hosts with other word sizes or byte orders.

use std::io::{self, ErrorKind, Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Size of the length field in bytes.
pub const LENGTH_FIELD_SIZE: usize = 8;

/// Delimiter separating records in the text format.
pub const RECORD_DELIMITER: u8 = b'\n';

/// Total on-disk size of a frame carrying `payload_len` bytes.
#[inline]
pub fn frame_size(payload_len: u64) -> u64 {
    LENGTH_FIELD_SIZE as u64 + payload_len
}

/// Write a length field.
pub fn write_length<W: Write + ?Sized>(writer: &mut W, length: u64) -> io::Result<()> {
    writer.write_u64::<LittleEndian>(length)
}

/// Write one complete frame and return the number of bytes written.
pub fn write_frame<W: Write + ?Sized>(writer: &mut W, payload: &[u8]) -> io::Result<u64> {
    write_length(writer, payload.len() as u64)?;
    writer.write_all(payload)?;
    Ok(frame_size(payload.len() as u64))
}

/// Encode one frame into a freshly allocated buffer.
///
/// # Example
///
/// ```
/// use length_indicated::format::{encode_frame, LENGTH_FIELD_SIZE};
///
/// let frame = encode_frame(b"a,b");
/// assert_eq!(frame.len(), LENGTH_FIELD_SIZE + 3);
/// assert_eq!(&frame[..LENGTH_FIELD_SIZE], &[3, 0, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(&frame[LENGTH_FIELD_SIZE..], b"a,b");
/// ```
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(LENGTH_FIELD_SIZE + payload.len());
    buf.resize(LENGTH_FIELD_SIZE, 0);
    LittleEndian::write_u64(&mut buf, payload.len() as u64);
    buf.extend_from_slice(payload);
    buf
}

/// Outcome of reading a length field from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthField {
    /// A complete length field.
    Length(u64),
    /// The stream was already exhausted; no bytes were consumed.
    EndOfStream,
    /// The stream ended after this many bytes of the field.
    Partial(usize),
}

/// Read a length field, telling a clean end of stream apart from a cut one.
pub fn read_length<R: Read + ?Sized>(reader: &mut R) -> io::Result<LengthField> {
    let mut buf = [0u8; LENGTH_FIELD_SIZE];
    let mut filled = 0;

    while filled < LENGTH_FIELD_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(match filled {
        0 => LengthField::EndOfStream,
        LENGTH_FIELD_SIZE => LengthField::Length(LittleEndian::read_u64(&buf)),
        n => LengthField::Partial(n),
    })
}
