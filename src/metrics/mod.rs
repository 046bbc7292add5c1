//! Decoders for the InterOp metric file family.
//!
//! Each submodule owns one file format: its header parsing, its record
//! loop, and the types its records decode into. The location types shared
//! by several formats live here.

mod index;
mod intensity;
mod quality;
mod summary;
mod tile;

pub use index::{IndexReader, IndexRecord};
pub use intensity::{IntensityHeader, IntensityReader, IntensityRecord, INTENSITY_RECORD_SIZE};
pub use quality::{QualityBin, QualityHeader, QualityReader, QualityRecord, DEFAULT_BIN_COUNT};
pub use summary::{SummaryRunReader, SummaryRunRecord, SUMMARY_RECORD_SIZE};
pub use tile::{TileHeader, TilePayload, TileReader, TileRecord};

use std::io::Read;

use crate::{cursor::ByteCursor, Result};

/// Identifies one tile of one lane at one sequencing cycle.
///
/// Quality and corrected-intensity records are keyed by this triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleLocation {
    pub lane: u16,
    pub tile: u32,
    pub cycle: u16,
}

impl CycleLocation {
    pub(crate) fn read_from<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(Self {
            lane: cursor.read_u16()?,
            tile: cursor.read_u32()?,
            cycle: cursor.read_u16()?,
        })
    }
}

/// Identifies one tile of one lane within one read of the run.
///
/// Index records are keyed by this triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadLocation {
    pub lane: u16,
    pub tile: u32,
    pub read: u16,
}

impl ReadLocation {
    pub(crate) fn read_from<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        Ok(Self {
            lane: cursor.read_u16()?,
            tile: cursor.read_u32()?,
            read: cursor.read_u16()?,
        })
    }
}
