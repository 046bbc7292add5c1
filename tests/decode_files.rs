use interop::{
    FileKind, IndexReader, IntensityReader, InteropError, QualityReader, SummaryRunReader,
    TilePayload, TileReader, INTENSITY_RECORD_SIZE,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::fs;
use tempfile::tempdir;

fn quality_file_bytes() -> Vec<u8> {
    let mut bytes = vec![1u8, 14, 1, 2];
    bytes.extend_from_slice(&[0, 9, 5]);
    bytes.extend_from_slice(&[10, 39, 25]);
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1101u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&100u32.to_le_bytes());
    bytes.extend_from_slice(&200u32.to_le_bytes());
    bytes
}

fn tile_file_bytes() -> Vec<u8> {
    let mut bytes = vec![2u8, 10];
    bytes.extend_from_slice(&850_000.0f32.to_le_bytes());

    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1101u32.to_le_bytes());
    bytes.push(b't');
    bytes.extend_from_slice(&250_000.0f32.to_le_bytes());
    bytes.extend_from_slice(&230_000.0f32.to_le_bytes());

    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1101u32.to_le_bytes());
    bytes.push(b'r');
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&92.5f32.to_le_bytes());
    bytes
}

fn summary_record_bytes(counts: [f64; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0i16.to_le_bytes());
    bytes.extend_from_slice(&36i32.to_le_bytes());
    for count in counts {
        bytes.extend_from_slice(&count.to_le_bytes());
    }
    bytes
}

#[test]
fn test_classify_and_decode_quality_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Run42_QMetricsOut.bin");
    fs::write(&path, quality_file_bytes()).unwrap();

    assert_eq!(FileKind::from_path(&path).unwrap(), FileKind::Quality);

    let mut reader = QualityReader::from_path(&path).unwrap();
    assert_eq!(reader.header().version, 1);
    assert_eq!(reader.header().bin_count(), 2);

    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.location.lane, 1);
    assert_eq!(record.location.tile, 1101);
    assert_eq!(record.location.cycle, 1);
    assert_eq!(record.histogram, vec![100, 200]);

    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_decode_summary_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("SummaryRunMetricsOut.bin");

    let mut bytes = vec![1u8];
    bytes.extend_from_slice(&summary_record_bytes([400.0, 1000.0, 250.0, 500.0]));
    bytes.extend_from_slice(&summary_record_bytes([40.0, 100.0, 25.0, 50.0]));
    fs::write(&path, bytes).unwrap();

    assert_eq!(FileKind::from_path(&path).unwrap(), FileKind::SummaryRun);

    let reader = SummaryRunReader::from_path(&path).unwrap();
    let records: interop::Result<Vec<_>> = reader.collect();
    let records = records.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].raw_cluster_count, 1000.0);
    assert_eq!(records[0].percent_pf(), 50.0);
    assert_eq!(records[1].percent_occupied(), 25.0);
}

#[test]
fn test_decode_large_summary_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("SummaryRunMetricsOut.bin");

    let mut rng = SmallRng::seed_from_u64(42);
    let counts: Vec<[f64; 4]> = (0..500)
        .map(|_| {
            let raw: f64 = rng.random_range(1.0..5_000_000.0);
            let pf = raw * rng.random_range(0.5..1.0);
            let occupied = raw * rng.random_range(0.1..1.0);
            let proxy = pf * rng.random_range(0.1..1.0);
            [proxy, raw, occupied, pf]
        })
        .collect();

    let mut bytes = vec![1u8];
    for quad in &counts {
        bytes.extend_from_slice(&summary_record_bytes(*quad));
    }
    fs::write(&path, bytes).unwrap();

    let reader = SummaryRunReader::from_path(&path).unwrap();
    let records: interop::Result<Vec<_>> = reader.collect();
    let records = records.unwrap();

    assert_eq!(records.len(), 500);
    for (record, quad) in records.iter().zip(&counts) {
        assert_eq!(record.occupancy_proxy_cluster_count, quad[0]);
        assert_eq!(record.raw_cluster_count, quad[1]);
        assert_eq!(record.occupancy_cluster_count, quad[2]);
        assert_eq!(record.pf_cluster_count, quad[3]);
        assert!(record.percent_pf() >= 50.0 && record.percent_pf() <= 100.0);
    }
}

#[test]
fn test_decode_tile_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("TileMetricsOut.bin");
    fs::write(&path, tile_file_bytes()).unwrap();

    assert_eq!(FileKind::from_path(&path).unwrap(), FileKind::Tile);

    let mut reader = TileReader::from_path(&path).unwrap();
    assert_eq!(reader.header().density, 850_000.0);

    let first = reader.read_record().unwrap().unwrap();
    assert_eq!(
        first.payload,
        TilePayload::Clusters {
            cluster_count: 250_000.0,
            pf_cluster_count: 230_000.0,
        }
    );

    let second = reader.read_record().unwrap().unwrap();
    assert_eq!(
        second.payload,
        TilePayload::Alignment {
            read_number: 1,
            percent_aligned: 92.5,
        }
    );

    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_decode_index_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IndexMetricsOut.bin");

    let mut bytes = vec![1u8];
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1101u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&3u16.to_le_bytes());
    bytes.extend_from_slice(b"ATG");
    bytes.extend_from_slice(&500_000u64.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(b"PROJ");
    fs::write(&path, bytes).unwrap();

    assert_eq!(FileKind::from_path(&path).unwrap(), FileKind::Index);

    let reader = IndexReader::from_path(&path).unwrap();
    let records: interop::Result<Vec<_>> = reader.collect();
    let records = records.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].index_name, "ATG");
    assert_eq!(records[0].index_cluster_count, 500_000);
    assert_eq!(records[0].sample_name, "");
    assert_eq!(records[0].project_name, "PROJ");
}

#[test]
fn test_decode_intensity_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("CorrectedIntMetricsOut.bin");

    let mut bytes = vec![2u8, INTENSITY_RECORD_SIZE];
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1101u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    for count in [10u32, 200, 300, 250, 240] {
        bytes.extend_from_slice(&count.to_le_bytes());
    }
    fs::write(&path, bytes).unwrap();

    assert_eq!(
        FileKind::from_path(&path).unwrap(),
        FileKind::CorrectedIntensity
    );

    let mut reader = IntensityReader::from_path(&path).unwrap();
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record.no_call, 10);
    assert_eq!(record.base_t, 240);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_intensity_size_mismatch_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("CorrectedIntMetricsOut.bin");
    fs::write(&path, vec![2u8, 52]).unwrap();

    let result = IntensityReader::from_path(&path);
    assert!(matches!(
        result,
        Err(InteropError::RecordSizeMismatch {
            expected: 30,
            found: 52,
        })
    ));
}

#[test]
fn test_header_only_files_decode_to_zero_records() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("SummaryRunMetricsOut.bin");
    fs::write(&path, [1u8]).unwrap();
    let mut reader = SummaryRunReader::from_path(&path).unwrap();
    assert_eq!(reader.version(), 1);
    assert!(reader.read_record().unwrap().is_none());

    let path = dir.path().join("IndexMetricsOut.bin");
    fs::write(&path, [1u8]).unwrap();
    let mut reader = IndexReader::from_path(&path).unwrap();
    assert!(reader.read_record().unwrap().is_none());

    let path = dir.path().join("CorrectedIntMetricsOut.bin");
    fs::write(&path, [2u8, INTENSITY_RECORD_SIZE]).unwrap();
    let mut reader = IntensityReader::from_path(&path).unwrap();
    assert!(reader.read_record().unwrap().is_none());

    let path = dir.path().join("QMetricsOut.bin");
    fs::write(&path, [1u8, 208, 0]).unwrap();
    let mut reader = QualityReader::from_path(&path).unwrap();
    assert_eq!(reader.header().bin_count(), 50);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_truncated_file_yields_records_then_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("SummaryRunMetricsOut.bin");

    let mut bytes = vec![1u8];
    bytes.extend_from_slice(&summary_record_bytes([400.0, 1000.0, 250.0, 500.0]));
    bytes.extend_from_slice(&[0u8; 11]); // a record cut short
    fs::write(&path, bytes).unwrap();

    let mut reader = SummaryRunReader::from_path(&path).unwrap();
    assert!(matches!(reader.next(), Some(Ok(_))));
    assert!(matches!(
        reader.next(),
        Some(Err(InteropError::Truncated { .. }))
    ));
    assert!(reader.next().is_none());
}

#[test]
fn test_unsupported_filename() {
    let err = FileKind::from_path("InterOp/RunParameters.xml").unwrap_err();
    assert!(matches!(err, InteropError::UnsupportedFile { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("QMetricsOut.bin");

    let result = QualityReader::from_path(&path);
    assert!(matches!(result, Err(InteropError::Io(_))));
}

#[cfg(feature = "niffler")]
#[test]
fn test_decode_gzip_compressed_tile_file() {
    use std::fs::File;
    use std::io::Write;

    let dir = tempdir().unwrap();
    let path = dir.path().join("TileMetricsOut.bin.gz");

    {
        let file = File::create(&path).unwrap();
        let mut writer = niffler::get_writer(
            Box::new(file),
            niffler::compression::Format::Gzip,
            niffler::compression::Level::One,
        )
        .unwrap();
        writer.write_all(&tile_file_bytes()).unwrap();
    }

    assert_eq!(FileKind::from_path(&path).unwrap(), FileKind::Tile);

    let reader = TileReader::from_path(&path).unwrap();
    let records: interop::Result<Vec<_>> = reader.collect();
    assert_eq!(records.unwrap().len(), 2);
}
