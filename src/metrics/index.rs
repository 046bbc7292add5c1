//! Decoder for index metric files (`IndexMetricsOut.bin`).
//!
//! Layout:
//!
//! - Header: `version: u8`
//! - Records until end of stream: `lane: u16`, `tile: u32`, `read: u16`,
//!   then in strict order an index name, an `u64` cluster count, a sample
//!   name, and a project name. Each name is a `u16` byte count followed by
//!   that many bytes.
//!
//! Names may be empty but are always present; a record that ends before
//! its last name is truncated, not short.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::{
    cursor::{open_path, BoxedByteSource, ByteCursor},
    ReadLocation, Result,
};

/// One index record: demultiplexing identity and cluster count for one
/// tile/read coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRecord {
    pub location: ReadLocation,
    pub index_name: String,
    pub index_cluster_count: u64,
    pub sample_name: String,
    pub project_name: String,
}

/// Streaming reader for index metric files.
pub struct IndexReader<R: Read> {
    cursor: ByteCursor<R>,
    version: u8,
    done: bool,
}

impl<R: Read> IndexReader<R> {
    /// Creates a reader and decodes the one-byte header.
    pub fn new(inner: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(inner);
        let version = cursor.read_u8()?;
        debug!("index metrics header: version {}", version);

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
    ///
    /// Any short read after the record has started, a cut-off name
    /// included, is reported as [`Truncated`](crate::InteropError::Truncated).
    pub fn read_record(&mut self) -> Result<Option<IndexRecord>> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        let location = ReadLocation::read_from(&mut self.cursor)?;
        let index_name = self.cursor.read_string()?;
        let index_cluster_count = self.cursor.read_u64()?;
        let sample_name = self.cursor.read_string()?;
        let project_name = self.cursor.read_string()?;

        Ok(Some(IndexRecord {
            location,
            index_name,
            index_cluster_count,
            sample_name,
            project_name,
        }))
    }
}

impl<R: Read> Iterator for IndexReader<R> {
    type Item = Result<IndexRecord>;

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

impl IndexReader<BoxedByteSource> {
    /// Creates a reader from a file path.
    ///
    /// Automatically detects and handles compressed files (gzip, zstd) when
    /// the `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(open_path(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InteropError;
    use std::io::Cursor;

    fn push_string(bytes: &mut Vec<u8>, text: &str) {
        bytes.extend_from_slice(&(text.len() as u16).to_le_bytes());
        bytes.extend_from_slice(text.as_bytes());
    }

    fn push_record(
        bytes: &mut Vec<u8>,
        lane: u16,
        tile: u32,
        read: u16,
        index_name: &str,
        count: u64,
        sample_name: &str,
        project_name: &str,
    ) {
        bytes.extend_from_slice(&lane.to_le_bytes());
        bytes.extend_from_slice(&tile.to_le_bytes());
        bytes.extend_from_slice(&read.to_le_bytes());
        push_string(bytes, index_name);
        bytes.extend_from_slice(&count.to_le_bytes());
        push_string(bytes, sample_name);
        push_string(bytes, project_name);
    }

    #[test]
    fn test_single_record_with_empty_sample_name() {
        let mut bytes = vec![1u8];
        push_record(&mut bytes, 1, 1101, 1, "ATG", 500_000, "", "PROJ");

        let mut reader = IndexReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.version(), 1);

        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(
            record.location,
            ReadLocation {
                lane: 1,
                tile: 1101,
                read: 1,
            }
        );
        assert_eq!(record.index_name, "ATG");
        assert_eq!(record.index_cluster_count, 500_000);
        assert_eq!(record.sample_name, "");
        assert_eq!(record.project_name, "PROJ");

        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_multiple_records() {
        let mut bytes = vec![1u8];
        push_record(&mut bytes, 1, 1101, 1, "ATGCAT", 500_000, "Sample1", "ProjA");
        push_record(&mut bytes, 1, 1101, 2, "GGTACA", 480_123, "Sample2", "");
        push_record(&mut bytes, 2, 2203, 1, "ATGCAT", 77, "Sample1", "ProjA");

        let reader = IndexReader::new(Cursor::new(bytes)).unwrap();
        let records: Result<Vec<_>> = reader.collect();
        let records = records.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sample_name, "Sample1");
        assert_eq!(records[1].project_name, "");
        assert_eq!(records[2].location.lane, 2);
        assert_eq!(records[2].index_cluster_count, 77);
    }

    #[test]
    fn test_empty_file_after_version() {
        let mut reader = IndexReader::new(Cursor::new(vec![1u8])).unwrap();
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_truncated_name_content() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1101u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        // Name promises 10 bytes but only 3 follow
        bytes.extend_from_slice(&10u16.to_le_bytes());
        bytes.extend_from_slice(b"ATG");

        let mut reader = IndexReader::new(Cursor::new(bytes)).unwrap();
        let err = reader.read_record().unwrap_err();
        assert!(matches!(
            err,
            InteropError::Truncated {
                expected: 10,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_after_location() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1101u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());

        let mut reader = IndexReader::new(Cursor::new(bytes)).unwrap();
        let err = reader.read_record().unwrap_err();
        assert!(matches!(
            err,
            InteropError::Truncated {
                offset: 9,
                expected: 2,
                found: 0,
            }
        ));
    }

    #[test]
    fn test_records_before_error_are_delivered() {
        let mut bytes = vec![1u8];
        push_record(&mut bytes, 1, 1101, 1, "ATG", 500_000, "S1", "P1");
        // Second record cut off inside the cluster count
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1102u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        push_string(&mut bytes, "CCC");
        bytes.extend_from_slice(&[0u8; 4]);

        let mut reader = IndexReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(
            reader.next(),
            Some(Err(InteropError::Truncated {
                expected: 8,
                found: 4,
                ..
            }))
        ));
        assert!(reader.next().is_none());
    }
}
