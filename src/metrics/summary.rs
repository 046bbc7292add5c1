//! Decoder for run summary metric files (`SummaryRunMetricsOut.bin`).
//!
//! Layout:
//!
//! - Header: `version: u8`
//! - Records until end of stream, 38 bytes each: `dummy: i16`,
//!   `size: i32`, then four `f64` cluster counts (occupancy proxy, raw,
//!   occupancy, passing filter)
//!
//! The percentage views derived from the counts are computed on demand and
//! never stored in the record.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::{
    cursor::{open_path, BoxedByteSource, ByteCursor},
    Result,
};

/// On-disk size of one run summary record in bytes.
pub const SUMMARY_RECORD_SIZE: usize = 38;

/// One run summary record: whole-run cluster counts.
///
/// `dummy` is unused by the instrument and `size` is undocumented; both are
/// retained so the record mirrors the file byte for byte.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryRunRecord {
    pub dummy: i16,
    pub size: i32,
    pub occupancy_proxy_cluster_count: f64,
    pub raw_cluster_count: f64,
    pub occupancy_cluster_count: f64,
    pub pf_cluster_count: f64,
}

impl SummaryRunRecord {
    /// Occupancy proxy count as a percentage of the passing-filter count.
    pub fn percent_occupancy_proxy(&self) -> f64 {
        safe_divide(self.occupancy_proxy_cluster_count, self.pf_cluster_count) * 100.0
    }

    /// Passing-filter count as a percentage of the raw count.
    pub fn percent_pf(&self) -> f64 {
        safe_divide(self.pf_cluster_count, self.raw_cluster_count) * 100.0
    }

    /// Occupancy count as a percentage of the raw count.
    pub fn percent_occupied(&self) -> f64 {
        safe_divide(self.occupancy_cluster_count, self.raw_cluster_count) * 100.0
    }
}

/// Division that yields 0 instead of infinity or NaN when the denominator
/// is zero. Counts of zero clusters are a valid state, not an error.
fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Streaming reader for run summary metric files.
pub struct SummaryRunReader<R: Read> {
    cursor: ByteCursor<R>,
    version: u8,
    done: bool,
}

impl<R: Read> SummaryRunReader<R> {
    /// Creates a reader and decodes the one-byte header.
    pub fn new(inner: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(inner);
        let version = cursor.read_u8()?;
        debug!("run summary header: version {}", version);

        Ok(Self {
            cursor,
            version,
            done: false,
        })
    }

    /// Returns the format version declared by the file.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Reads the next record, or `Ok(None)` on clean end of stream.
    pub fn read_record(&mut self) -> Result<Option<SummaryRunRecord>> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        Ok(Some(SummaryRunRecord {
            dummy: self.cursor.read_i16()?,
            size: self.cursor.read_i32()?,
            occupancy_proxy_cluster_count: self.cursor.read_f64()?,
            raw_cluster_count: self.cursor.read_f64()?,
            occupancy_cluster_count: self.cursor.read_f64()?,
            pf_cluster_count: self.cursor.read_f64()?,
        }))
    }
}

impl<R: Read> Iterator for SummaryRunReader<R> {
    type Item = Result<SummaryRunRecord>;

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

impl SummaryRunReader<BoxedByteSource> {
    /// Creates a reader from a file path.
    ///
    /// Automatically detects and handles compressed files (gzip, zstd) when
    /// the `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(open_path(path)?)
    }
}
