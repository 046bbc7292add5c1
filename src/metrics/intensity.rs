//! Decoder for corrected intensity metric files (`CorrectedIntMetricsOut.bin`).
//!
//! Layout:
//!
//! - Header: `version: u8`, `record_size: u8`
//! - Records until end of stream: `lane: u16`, `tile: u32`, `cycle: u16`,
//!   then five `u32` base-call counts (no-call, A, C, G, T)
//!
//! The declared record size is validated against
//! [`INTENSITY_RECORD_SIZE`] before any record is read; a file declaring a
//! different size belongs to a layout revision this decoder does not know.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::{
    cursor::{open_path, BoxedByteSource, ByteCursor},
    CycleLocation, InteropError, Result,
};

/// Record size a corrected intensity file must declare.
pub const INTENSITY_RECORD_SIZE: u8 = 30;

/// Header of a corrected intensity metric file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntensityHeader {
    pub version: u8,
    pub record_size: u8,
}

/// One corrected intensity record: how many clusters of a cycle were
/// called as each base, or not called at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntensityRecord {
    pub location: CycleLocation,
    pub no_call: u32,
    pub base_a: u32,
    pub base_c: u32,
    pub base_g: u32,
    pub base_t: u32,
}

/// Streaming reader for corrected intensity metric files.
pub struct IntensityReader<R: Read> {
    cursor: ByteCursor<R>,
    header: IntensityHeader,
    done: bool,
}

impl<R: Read> IntensityReader<R> {
    /// Creates a reader, decodes the header, and validates the declared
    /// record size.
    ///
    /// # Errors
    ///
    /// Returns [`RecordSizeMismatch`](crate::InteropError::RecordSizeMismatch)
    /// when the declared size differs from [`INTENSITY_RECORD_SIZE`]. No
    /// record is read in that case.
    pub fn new(inner: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(inner);

        let header = IntensityHeader {
            version: cursor.read_u8()?,
            record_size: cursor.read_u8()?,
        };
        debug!(
            "corrected intensity header: version {}, record size {}",
            header.version, header.record_size
        );

        if header.record_size != INTENSITY_RECORD_SIZE {
            return Err(InteropError::RecordSizeMismatch {
                expected: INTENSITY_RECORD_SIZE,
                found: header.record_size,
            });
        }

        Ok(Self {
            cursor,
            header,
            done: false,
        })
    }

    /// Returns the decoded header.
    pub fn header(&self) -> &IntensityHeader {
        &self.header
    }

    /// Reads the next record, or `Ok(None)` on clean end of stream.
    pub fn read_record(&mut self) -> Result<Option<IntensityRecord>> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        Ok(Some(IntensityRecord {
            location: CycleLocation::read_from(&mut self.cursor)?,
            no_call: self.cursor.read_u32()?,
            base_a: self.cursor.read_u32()?,
            base_c: self.cursor.read_u32()?,
            base_g: self.cursor.read_u32()?,
            base_t: self.cursor.read_u32()?,
        }))
    }
}

impl<R: Read> Iterator for IntensityReader<R> {
    type Item = Result<IntensityRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl IntensityReader<BoxedByteSource> {
    /// Creates a reader from a file path.
    ///
    /// Automatically detects and handles compressed files (gzip, zstd) when
    /// the `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(open_path(path)?)
    }
}
