//! Filename-based classification of InterOp metric files.
//!
//! Instruments name each metric file by its content, so the file kind is
//! decided by a substring of the filename rather than by sniffing bytes.

use std::fmt;
use std::path::Path;

use crate::{InteropError, Result};

/// The metric file kinds this crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    SummaryRun,
    Quality,
    Tile,
    Index,
    CorrectedIntensity,
}

impl FileKind {
    /// Classifies a path by its filename.
    ///
    /// Matching is by substring, so run prefixes (`Run123_QMetricsOut.bin`)
    /// and compression suffixes (`QMetricsOut.bin.gz`) both resolve.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFile`](crate::InteropError::UnsupportedFile)
    /// when the filename matches no known pattern.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use interop::FileKind;
    ///
    /// # fn main() -> interop::Result<()> {
    /// let kind = FileKind::from_path("InterOp/Run123_QMetricsOut.bin")?;
    /// assert_eq!(kind, FileKind::Quality);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => {
                return Err(InteropError::UnsupportedFile {
                    path: path.to_path_buf(),
                });
            }
        };

        for kind in [
            FileKind::SummaryRun,
            FileKind::Quality,
            FileKind::Tile,
            FileKind::Index,
            FileKind::CorrectedIntensity,
        ] {
            if name.contains(kind.pattern()) {
                return Ok(kind);
            }
        }

        Err(InteropError::UnsupportedFile {
            path: path.to_path_buf(),
        })
    }

    /// The filename substring that selects this kind.
    pub fn pattern(&self) -> &'static str {
        match self {
            FileKind::SummaryRun => "SummaryRunMetricsOut.bin",
            FileKind::Quality => "QMetricsOut.bin",
            FileKind::Tile => "TileMetricsOut.bin",
            FileKind::Index => "IndexMetricsOut.bin",
            FileKind::CorrectedIntensity => "CorrectedIntMetricsOut.bin",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::SummaryRun => "run summary metrics",
            FileKind::Quality => "quality metrics",
            FileKind::Tile => "tile metrics",
            FileKind::Index => "index metrics",
            FileKind::CorrectedIntensity => "corrected intensity metrics",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_pattern_resolves() {
        let cases = [
            ("SummaryRunMetricsOut.bin", FileKind::SummaryRun),
            ("QMetricsOut.bin", FileKind::Quality),
            ("TileMetricsOut.bin", FileKind::Tile),
            ("IndexMetricsOut.bin", FileKind::Index),
            ("CorrectedIntMetricsOut.bin", FileKind::CorrectedIntensity),
        ];
        for (name, expected) in cases {
            assert_eq!(FileKind::from_path(name).unwrap(), expected, "{}", name);
        }
    }

    #[test]
    fn test_prefixes_and_directories_are_ignored() {
        let kind = FileKind::from_path("runs/240115_A01/InterOp/Run7_QMetricsOut.bin").unwrap();
        assert_eq!(kind, FileKind::Quality);
    }

    #[test]
    fn test_compressed_name_resolves() {
        let kind = FileKind::from_path("TileMetricsOut.bin.gz").unwrap();
        assert_eq!(kind, FileKind::Tile);
    }

    #[test]
    fn test_directory_component_does_not_match() {
        // The pattern must be in the filename, not a parent directory
        let err = FileKind::from_path("QMetricsOut.bin/notes.txt").unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedFile { .. }));
    }

    #[test]
    fn test_unmatched_name_is_unsupported() {
        let err = FileKind::from_path("InterOp/RunInfo.xml").unwrap_err();
        match err {
            InteropError::UnsupportedFile { path } => {
                assert_eq!(path, Path::new("InterOp/RunInfo.xml"));
            }
            other => panic!("expected UnsupportedFile, got {:?}", other),
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let err = FileKind::from_path("qmetricsout.bin").unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedFile { .. }));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(FileKind::Quality.to_string(), "quality metrics");
        assert_eq!(
            FileKind::CorrectedIntensity.to_string(),
            "corrected intensity metrics"
        );
    }
}
