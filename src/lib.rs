//! # interop - Decoders for Illumina InterOp Metric Files
//!
//! `interop` is a Rust library for decoding the binary metric files an
//! Illumina-style sequencing instrument writes into the `InterOp/` directory
//! of a run folder. Each file kind gets a streaming reader that decodes the
//! header once and then yields records on demand, so arbitrarily large runs
//! can be inspected without loading a file into memory.
//!
//! Five file kinds are covered: quality metrics, run summary metrics, tile
//! metrics, index metrics, and corrected intensity metrics.
//!
//! ## File Formats
//!
//! All files are little-endian with tightly packed fields and no alignment
//! padding. Every file is a small fixed header followed by records until the
//! bytes end; none of the formats carries a record count.
//!
//! ### Quality metrics (`QMetricsOut.bin`)
//! - Header: `version: u8`, `record_size: u8`, `has_bins: u8`
//! - Bin table when `has_bins` is nonzero: `bin_count: u8`, then that many
//!   `(low, high, value)` byte triples
//! - Record: `lane: u16`, `tile: u32`, `cycle: u16`, then one `u32`
//!   histogram count per bin (50 when the file has no bin table)
//!
//! ### Run summary metrics (`SummaryRunMetricsOut.bin`)
//! - Header: `version: u8`
//! - Record (38 bytes): `dummy: i16`, `size: i32`, four `f64` cluster
//!   counts (occupancy proxy, raw, occupancy, passing filter)
//!
//! ### Tile metrics (`TileMetricsOut.bin`)
//! - Header: `version: u8`, `record_size: u8`, `density: f32`
//! - Record: `lane: u16`, `tile: u32`, `code: u8`, then a payload selected
//!   by the code: `t` carries two `f32` cluster counts, `r` carries a `u32`
//!   read number and an `f32` aligned fraction
//!
//! ### Index metrics (`IndexMetricsOut.bin`)
//! - Header: `version: u8`
//! - Record: `lane: u16`, `tile: u32`, `read: u16`, then an index name, a
//!   `u64` cluster count, a sample name, and a project name; names are
//!   `u16`-length-prefixed byte strings
//!
//! ### Corrected intensity metrics (`CorrectedIntMetricsOut.bin`)
//! - Header: `version: u8`, `record_size: u8` (validated, must declare 30)
//! - Record: `lane: u16`, `tile: u32`, `cycle: u16`, then five `u32`
//!   base-call counts (no-call, A, C, G, T)
//!
//! ## Basic Usage
//!
//! ```rust
//! use interop::{TilePayload, TileReader};
//! use std::io::Cursor;
//!
//! # fn main() -> interop::Result<()> {
//! // A tile metrics header and one cluster-count record
//! let mut bytes = vec![2u8, 10];
//! bytes.extend_from_slice(&850_000.0f32.to_le_bytes());
//! bytes.extend_from_slice(&1u16.to_le_bytes());
//! bytes.extend_from_slice(&1101u32.to_le_bytes());
//! bytes.push(b't');
//! bytes.extend_from_slice(&250_000.0f32.to_le_bytes());
//! bytes.extend_from_slice(&230_000.0f32.to_le_bytes());
//!
//! let reader = TileReader::new(Cursor::new(bytes))?;
//! assert_eq!(reader.header().version, 2);
//!
//! for result in reader {
//!     let record = result?;
//!     match record.payload {
//!         TilePayload::Clusters {
//!             cluster_count,
//!             pf_cluster_count,
//!         } => {
//!             println!(
//!                 "lane {} tile {}: {} clusters ({} passing filter)",
//!                 record.lane, record.tile, cluster_count, pf_cluster_count
//!             );
//!         }
//!         TilePayload::Alignment {
//!             read_number,
//!             percent_aligned,
//!         } => {
//!             println!(
//!                 "lane {} tile {} read {}: {:.2}% aligned",
//!                 record.lane, record.tile, read_number, percent_aligned
//!             );
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## File I/O with Compression
//!
//! Readers constructed with `from_path` open compressed files (gzip, zstd)
//! transparently when the `niffler` feature is enabled. [`FileKind`]
//! classifies a path by the filename patterns the instrument uses.
//!
//! ```rust,no_run
//! use interop::{FileKind, QualityReader};
//!
//! # fn main() -> interop::Result<()> {
//! let path = "InterOp/QMetricsOut.bin.gz";
//! assert_eq!(FileKind::from_path(path)?, FileKind::Quality);
//!
//! let reader = QualityReader::from_path(path)?;
//! for result in reader {
//!     let record = result?;
//!     println!(
//!         "cycle {}: {} histogram bins",
//!         record.location.cycle,
//!         record.histogram.len()
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, InteropError>`. A stream that ends on a
//! record boundary terminates decoding cleanly; one that ends inside a
//! record reports where and how much was missing:
//!
//! ```rust
//! use interop::{InteropError, SummaryRunReader};
//! use std::io::Cursor;
//!
//! # fn main() {
//! // A version byte and half a record
//! let bytes = vec![1u8; 20];
//! let reader = SummaryRunReader::new(Cursor::new(bytes)).unwrap();
//!
//! let results: Vec<_> = reader.collect();
//! match results.last() {
//!     Some(Err(InteropError::Truncated {
//!         offset,
//!         expected,
//!         found,
//!     })) => {
//!         println!("stream cut at byte {offset}: wanted {expected}, found {found}");
//!     }
//!     _ => unreachable!(),
//! }
//! # }
//! ```

mod cursor;
mod dispatch;
mod error;
mod metrics;

pub use cursor::{BoxedByteSource, ByteCursor};
pub use dispatch::FileKind;
pub use error::{InteropError, Result};
pub use metrics::{
    CycleLocation, IndexReader, IndexRecord, IntensityHeader, IntensityReader, IntensityRecord,
    QualityBin, QualityHeader, QualityReader, QualityRecord, ReadLocation, SummaryRunReader,
    SummaryRunRecord, TileHeader, TilePayload, TileReader, TileRecord, DEFAULT_BIN_COUNT,
    INTENSITY_RECORD_SIZE, SUMMARY_RECORD_SIZE,
};
