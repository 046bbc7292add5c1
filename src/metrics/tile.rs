//! Decoder for tile metric files (`TileMetricsOut.bin`).
//!
//! Layout:
//!
//! - Header: `version: u8`, `record_size: u8`, `density: f32`
//! - Records until end of stream: `lane: u16`, `tile: u32`, `code: u8`,
//!   then a payload selected by the code: `t` carries two `f32` cluster
//!   counts, `r` carries a `u32` read number and an `f32` aligned fraction
//!
//! The code byte is the only way to know a payload's length, so a record
//! with an unrecognized code cannot be skipped; the decoder stops with
//! [`UnrecognizedRecordCode`](crate::InteropError::UnrecognizedRecordCode)
//! instead of continuing misaligned.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::{
    cursor::{open_path, BoxedByteSource, ByteCursor},
    InteropError, Result,
};

/// Header of a tile metric file.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileHeader {
    pub version: u8,
    pub record_size: u8,
    pub density: f32,
}

/// Payload of one tile record, selected by the record's code byte.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TilePayload {
    /// Code `t`: cluster counts for the tile.
    Clusters {
        cluster_count: f32,
        pf_cluster_count: f32,
    },
    /// Code `r`: alignment rate for one read over the tile.
    Alignment {
        read_number: u32,
        percent_aligned: f32,
    },
}

impl TilePayload {
    /// The code byte this payload was decoded from.
    pub fn code(&self) -> char {
        match self {
            TilePayload::Clusters { .. } => 't',
            TilePayload::Alignment { .. } => 'r',
        }
    }
}

/// One tile record: a lane/tile coordinate and its tagged payload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRecord {
    pub lane: u16,
    pub tile: u32,
    pub payload: TilePayload,
}

/// Streaming reader for tile metric files.
pub struct TileReader<R: Read> {
    cursor: ByteCursor<R>,
    header: TileHeader,
    done: bool,
}

impl<R: Read> TileReader<R> {
    /// Creates a reader and decodes the six-byte header.
    pub fn new(inner: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(inner);

        let header = TileHeader {
            version: cursor.read_u8()?,
            record_size: cursor.read_u8()?,
            density: cursor.read_f32()?,
        };
        debug!(
            "tile metrics header: version {}, record size {}, density {}",
            header.version, header.record_size, header.density
        );

        Ok(Self {
            cursor,
            header,
            done: false,
        })
    }

    /// Returns the decoded header.
    pub fn header(&self) -> &TileHeader {
        &self.header
    }

    /// Reads the next record, or `Ok(None)` on clean end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognizedRecordCode`](crate::InteropError::UnrecognizedRecordCode)
    /// when the code byte is neither `t` nor `r`, and
    /// [`Truncated`](crate::InteropError::Truncated) when the stream ends
    /// inside a record. Either way the cursor cannot be realigned and
    /// decoding stops.
    pub fn read_record(&mut self) -> Result<Option<TileRecord>> {
        if self.cursor.at_end()? {
            return Ok(None);
        }

        let lane = self.cursor.read_u16()?;
        let tile = self.cursor.read_u32()?;
        let code = self.cursor.read_u8()?;

        let payload = match code {
            b't' => TilePayload::Clusters {
                cluster_count: self.cursor.read_f32()?,
                pf_cluster_count: self.cursor.read_f32()?,
            },
            b'r' => TilePayload::Alignment {
                read_number: self.cursor.read_u32()?,
                percent_aligned: self.cursor.read_f32()?,
            },
            code => {
                return Err(InteropError::UnrecognizedRecordCode { code, lane, tile });
            }
        };

        Ok(Some(TileRecord {
            lane,
            tile,
            payload,
        }))
    }
}

impl<R: Read> Iterator for TileReader<R> {
    type Item = Result<TileRecord>;

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

impl TileReader<BoxedByteSource> {
    /// Creates a reader from a file path.
    ///
    /// Automatically detects and handles compressed files (gzip, zstd) when
    /// the `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(open_path(path)?)
    }
}
