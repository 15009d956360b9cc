//! Error module
//!
//! Defines the error type shared by the encoder, decoder and validator using
//! `thiserror`. Open failures carry the offending path so the binary can
//! report which side of a conversion could not be opened.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for length-indicated conversions.
///
/// # Error Categories
///
/// - **Open errors**: the source or destination file could not be opened
/// - **Frame errors**: a binary file ends in the middle of a frame
/// - **I/O errors**: reads or writes failing once the files are open
/// - **Configuration errors**: invalid command-line argument combinations
///
/// # Example
///
/// ```rust,ignore
/// use length_indicated::error::LengthIndicatedError;
///
/// fn example() -> Result<(), LengthIndicatedError> {
///     let file = std::fs::File::open("records.bin")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum LengthIndicatedError {
    /// The text or binary source could not be opened for reading.
    #[error("cannot open source {path:?}: {source}")]
    OpenSource {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The destination could not be created or truncated for writing.
    #[error("cannot open destination {path:?}: {source}")]
    OpenDestination {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stream ended inside a frame.
    ///
    /// `expected` and `actual` count bytes of the part that was cut short:
    /// the length field when fewer than its width were available, otherwise
    /// the payload. `offset` is where the damaged frame starts.
    #[error("truncated frame at offset {offset}: expected {expected} bytes, got {actual}")]
    TruncatedFrame {
        /// Byte offset of the frame's length field.
        offset: u64,
        /// Bytes the frame still required.
        expected: u64,
        /// Bytes that were actually available.
        actual: u64,
    },

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command-line argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A binary file failed validation. The report has already been printed.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Result type alias using [`LengthIndicatedError`].
pub type Result<T> = std::result::Result<T, LengthIndicatedError>;
