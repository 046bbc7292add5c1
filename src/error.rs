//! Error handling for the InterOp decoders.
//!
//! This module defines all error types that can occur while decoding InterOp
//! metric files, including I/O errors, structural truncation, and header
//! validation failures.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for InterOp decoding operations.
///
/// This type is used throughout the crate for any operation that can fail.
/// It's equivalent to `std::result::Result<T, InteropError>`.
///
/// # Examples
///
/// ```rust
/// use interop::{QualityReader, Result};
/// use std::io::Cursor;
///
/// fn file_version(bytes: Vec<u8>) -> Result<u8> {
///     let reader = QualityReader::new(Cursor::new(bytes))?;
///     Ok(reader.header().version)
/// }
/// ```
pub type Result<T> = std::result::Result<T, InteropError>;

/// Error types for InterOp decoding.
///
/// This enum covers every failure a decode session can hit: the source cannot
/// be opened or read, the stream ends in the middle of a field or record, a
/// tile record carries a code with no known payload layout, or a header
/// declares a record size this library was not built for.
///
/// Decoders surface the first error and stop. There is no resynchronization,
/// because a misaligned cursor cannot be repaired without format markers
/// these files do not carry.
///
/// # Examples
///
/// ```rust
/// use interop::{InteropError, QualityReader};
/// use std::io::Cursor;
///
/// // A quality header needs at least three bytes; one is not enough.
/// let result = QualityReader::new(Cursor::new(vec![1u8]));
///
/// match result {
///     Err(InteropError::Truncated {
///         offset,
///         expected,
///         found,
///     }) => {
///         println!("short read at byte {offset}: wanted {expected}, found {found}");
///     }
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum InteropError {
    /// I/O error from the underlying byte source.
    ///
    /// This wraps standard I/O errors that can occur when opening or reading
    /// a metric file, including the initial open failure in `from_path`.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Compression/decompression error from niffler.
    ///
    /// This occurs when there are problems opening a compressed metric file
    /// (gzip, zstd) when the `niffler` feature is enabled.
    #[cfg(feature = "niffler")]
    #[error("Niffler error")]
    Niffler(#[from] niffler::Error),

    /// Fewer bytes were available than a field or record requires.
    ///
    /// `offset` is the position at which the short read began. A stream that
    /// ends cleanly on a record boundary never raises this; a stream that
    /// ends in the middle of a record always does.
    #[error("Truncated stream at byte {offset}, expected {expected} byte(s), found {found}")]
    Truncated {
        offset: u64,
        expected: usize,
        found: usize,
    },

    /// A tile metric record carried a code other than `t` or `r`.
    ///
    /// The payload length of an unknown code is not defined by the format,
    /// so the record cannot be skipped. Decoding stops at the offending
    /// record rather than continue misaligned.
    #[error("Unrecognized record code {code:#04x} (lane {lane}, tile {tile})")]
    UnrecognizedRecordCode { code: u8, lane: u16, tile: u32 },

    /// A header declared a record size this library was not built for.
    ///
    /// Raised by the corrected-intensity decoder before any record is read;
    /// a different declared size means a different layout revision.
    #[error("Unexpected record size, expected ({expected}), found ({found})")]
    RecordSizeMismatch { expected: u8, found: u8 },

    /// The filename matches none of the known metric file patterns.
    #[error("Unsupported metric file: {}", path.display())]
    UnsupportedFile { path: PathBuf },
}
