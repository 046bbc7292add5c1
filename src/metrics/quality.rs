//! Decoder for quality metric files (`QMetricsOut.bin`).
//!
//! Layout:
//!
//! - Header: `version: u8`, `record_size: u8`, `has_bins: u8`
//! - Bin table (only when `has_bins` is nonzero): `bin_count: u8`, then
//!   `bin_count` triples of `(low: u8, high: u8, value: u8)`
//! - Records until end of stream: `lane: u16`, `tile: u32`, `cycle: u16`,
//!   then `bin_count` histogram counts as `u32`
//!
//! When the file carries no bin table the histogram width falls back to 50,
//! one count per raw quality score. With a bin table, the table is read once
//! and its length sizes the histogram of every record.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::{
    cursor::{open_path, BoxedByteSource, ByteCursor},
    CycleLocation, Result,
};

/// Histogram width used when a file declares no bin table.
pub const DEFAULT_BIN_COUNT: usize = 50;

/// One entry of the quality bin table.
///
/// A bin covers the quality scores `low..=high` and is reported under the
/// representative score `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityBin {
    pub low: u8,
    pub high: u8,
    pub value: u8,
}

/// Header of a quality metric file, including the optional bin table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityHeader {
    pub version: u8,
    pub record_size: u8,
    pub has_bins: bool,
    /// Bin table, present iff `has_bins`. May be empty when the file
    /// declares zero bins.
    pub bins: Option<Vec<QualityBin>>,
}

impl QualityHeader {
    /// Number of histogram counts in every record of this file.
    pub fn bin_count(&self) -> usize {
        match &self.bins {
            Some(bins) => bins.len(),
            None => DEFAULT_BIN_COUNT,
        }
    }
}

/// One quality record: a location and its score histogram.
///
/// The histogram length always equals [`QualityHeader::bin_count`] for the
/// file the record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityRecord {
    pub location: CycleLocation,
    pub histogram: Vec<u32>,
}

/// Streaming reader for quality metric files.
///
/// The header and bin table are read once during construction; records are
/// then decoded on demand through [`read_record`](QualityReader::read_record)
/// or the `Iterator` interface.
///
/// # Examples
///
/// ```rust
/// use interop::QualityReader;
/// use std::io::Cursor;
///
/// # fn main() -> interop::Result<()> {
/// let mut bytes = vec![6u8, 206, 1]; // version 6, record size 206, has bins
/// bytes.push(2); // two bins
/// bytes.extend_from_slice(&[0, 19, 12]); // bin 1: low, high, value
/// bytes.extend_from_slice(&[20, 41, 32]); // bin 2
/// bytes.extend_from_slice(&1u16.to_le_bytes()); // lane
/// bytes.extend_from_slice(&1101u32.to_le_bytes()); // tile
/// bytes.extend_from_slice(&1u16.to_le_bytes()); // cycle
/// bytes.extend_from_slice(&100u32.to_le_bytes());
/// bytes.extend_from_slice(&200u32.to_le_bytes());
///
/// let mut reader = QualityReader::new(Cursor::new(bytes))?;
/// assert_eq!(reader.header().bin_count(), 2);
///
/// let record = reader.read_record()?.unwrap();
/// assert_eq!(record.location.tile, 1101);
/// assert_eq!(record.histogram, vec![100, 200]);
/// assert!(reader.read_record()?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct QualityReader<R: Read> {
    cursor: ByteCursor<R>,
    header: QualityHeader,
    done: bool,
}

impl<R: Read> QualityReader<R> {
    /// Creates a reader and decodes the header, including the bin table
    /// when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`Truncated`](crate::InteropError::Truncated) if the stream
    /// ends inside the header or the declared bin table.
    pub fn new(inner: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(inner);

        let version = cursor.read_u8()?;
        let record_size = cursor.read_u8()?;
        let has_bins = cursor.read_u8()? != 0;

        let bins = if has_bins {
            let bin_count = cursor.read_u8()? as usize;
            let mut bins = Vec::with_capacity(bin_count);
            for _ in 0..bin_count {
                bins.push(QualityBin {
                    low: cursor.read_u8()?,
                    high: cursor.read_u8()?,
                    value: cursor.read_u8()?,
                });
            }
            Some(bins)
        } else {
            None
        };

        let header = QualityHeader {
            version,
            record_size,
            has_bins,
            bins,
        };
        debug!(
            "quality metrics header: version {}, record size {}, {} bins",
            header.version,
            header.record_size,
            header.bin_count()
        );

        Ok(Self {
            cursor,
            header,
            done: false,
        })
    }

    /// Returns the decoded header.
    pub fn header(&self) -> &QualityHeader {
        &self.header
    }

    /// Reads the next record, or `Ok(None)` on clean end of stream.
    ///
    /// A stream ending inside a record, histogram included, is reported as
    /// [`Truncated`](crate::InteropError::Truncated). After an error the
    /// cursor sits mid-record and decoding cannot resume.
    pub fn read_record(&mut self) -> Result<Option<QualityRecord>> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        let location = CycleLocation::read_from(&mut self.cursor)?;
        let bin_count = self.header.bin_count();
        let mut histogram = Vec::with_capacity(bin_count);
        for _ in 0..bin_count {
            histogram.push(self.cursor.read_u32()?);
        }

        Ok(Some(QualityRecord {
            location,
            histogram,
        }))
    }
}

impl<R: Read> Iterator for QualityReader<R> {
    type Item = Result<QualityRecord>;

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

impl QualityReader<BoxedByteSource> {
    /// Creates a reader from a file path.
    ///
    /// Automatically detects and handles compressed files (gzip, zstd) when
    /// the `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(open_path(path)?)
    }
}
