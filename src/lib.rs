//! Length-Indicated Record Library
//!
//! Converts newline-delimited text (typically CSV) into a binary format where
//! every line is stored as a length-prefixed frame, and reads those frames
//! back. Field structure is never parsed: each line is an opaque payload.
//!
//! # Example
//!
//! ```no_run
//! use length_indicated::{convert_to_length_indicated, FrameReader};
//! use std::path::Path;
//!
//! convert_to_length_indicated(Path::new("people.csv"), Path::new("people.bin")).unwrap();
//!
//! let mut reader = FrameReader::open(Path::new("people.bin")).unwrap();
//! while let Some(record) = reader.read_next().unwrap() {
//!     println!("{}", record.to_text_lossy());
//! }
//! ```

pub mod cli;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod record;
pub mod validator;

pub use decoder::{convert_from_length_indicated, read_length_indicated_record, FrameReader};
pub use encoder::{convert_to_length_indicated, FrameWriter};
pub use error::{LengthIndicatedError, Result};
pub use format::{encode_frame, write_frame, LENGTH_FIELD_SIZE};
pub use record::{DecodeStats, EncodeStats, Record};
pub use validator::{FrameValidator, ValidationStats};
