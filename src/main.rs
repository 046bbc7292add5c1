use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;

use interop::{
    FileKind, IndexReader, IntensityReader, QualityReader, SummaryRunReader, TilePayload,
    TileReader,
};

#[derive(Parser)]
#[command(
    name = "interop-dump",
    about = "Dump Illumina InterOp metric files as text"
)]
struct Cli {
    /// Metric file to decode (may be gzip/zstd compressed)
    input: PathBuf,

    /// Decode as this kind instead of matching the filename
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Summary,
    Quality,
    Tile,
    Index,
    Intensity,
}

impl From<KindArg> for FileKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Summary => FileKind::SummaryRun,
            KindArg::Quality => FileKind::Quality,
            KindArg::Tile => FileKind::Tile,
            KindArg::Index => FileKind::Index,
            KindArg::Intensity => FileKind::CorrectedIntensity,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let kind = match cli.kind {
        Some(kind) => kind.into(),
        None => FileKind::from_path(&cli.input)?,
    };
    info!("decoding {} as {}", cli.input.display(), kind);

    match kind {
        FileKind::SummaryRun => dump_summary(&cli.input),
        FileKind::Quality => dump_quality(&cli.input),
        FileKind::Tile => dump_tile(&cli.input),
        FileKind::Index => dump_index(&cli.input),
        FileKind::CorrectedIntensity => dump_intensity(&cli.input),
    }
}

fn dump_summary(path: &Path) -> Result<()> {
    let mut reader = SummaryRunReader::from_path(path)?;
    println!("Version Number: {}", reader.version());

    while let Some(record) = reader.read_record()? {
        println!(
            "Occupancy Proxy Cluster Count: {:.5e}",
            record.occupancy_proxy_cluster_count
        );
        println!("Raw Cluster Count: {:.5e}", record.raw_cluster_count);
        println!(
            "Occupancy Cluster Count: {:.5e}",
            record.occupancy_cluster_count
        );
        println!("PF Cluster Count: {:.5e}", record.pf_cluster_count);
        println!(
            "Percent Occupancy Proxy: {:.2}%",
            record.percent_occupancy_proxy()
        );
        println!("Percent PF: {:.2}%", record.percent_pf());
        println!("Percent Occupied: {:.2}%", record.percent_occupied());
    }
    Ok(())
}

fn dump_quality(path: &Path) -> Result<()> {
    let mut reader = QualityReader::from_path(path)?;

    let header = reader.header();
    println!("Version Number: {}", header.version);
    println!("Record size: {}", header.record_size);
    println!("Has Bins: {}", if header.has_bins { "Yes" } else { "No" });
    if let Some(bins) = &header.bins {
        println!("Number of bins: {}", bins.len());
        for (i, bin) in bins.iter().enumerate() {
            println!(
                "Bin {} (low, high, value): {}, {}, {}",
                i + 1,
                bin.low,
                bin.high,
                bin.value
            );
        }
    }

    while let Some(record) = reader.read_record()? {
        println!(
            "Lane: {}, Tile: {}, Cycle: {}",
            record.location.lane, record.location.tile, record.location.cycle
        );
        let histogram = record
            .histogram
            .iter()
            .map(|count| count.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Histogram: {}", histogram);
    }
    Ok(())
}

fn dump_tile(path: &Path) -> Result<()> {
    let mut reader = TileReader::from_path(path)?;

    let header = reader.header();
    println!("File Version: {}", header.version);
    println!("Record Size: {}", header.record_size);
    println!("Density: {:.6}", header.density);

    while let Some(record) = reader.read_record()? {
        println!();
        println!(
            "Lane Number: {}, Tile Number: {}, Code: {}",
            record.lane,
            record.tile,
            record.payload.code()
        );
        match record.payload {
            TilePayload::Clusters {
                cluster_count,
                pf_cluster_count,
            } => {
                println!(
                    "Cluster Count: {:.6}, PF Cluster Count: {:.6}",
                    cluster_count, pf_cluster_count
                );
            }
            TilePayload::Alignment {
                read_number,
                percent_aligned,
            } => {
                println!(
                    "Read Number: {}, Percent Aligned: {:.6}",
                    read_number, percent_aligned
                );
            }
        }
    }
    Ok(())
}

fn dump_index(path: &Path) -> Result<()> {
    let mut reader = IndexReader::from_path(path)?;
    println!("Version Number: {}", reader.version());

    while let Some(record) = reader.read_record()? {
        println!(
            "Lane: {}, Tile: {}, Read: {}",
            record.location.lane, record.location.tile, record.location.read
        );
        println!("Index Name: {}", record.index_name);
        println!("Index Cluster Count: {}", record.index_cluster_count);
        println!("Sample Name: {}", record.sample_name);
        println!("Project Name: {}", record.project_name);
    }
    Ok(())
}

fn dump_intensity(path: &Path) -> Result<()> {
    let mut reader = IntensityReader::from_path(path)?;

    let header = reader.header();
    println!("Version Number: {}", header.version);
    println!("Record Size: {}", header.record_size);

    while let Some(record) = reader.read_record()? {
        println!(
            "Lane: {}, Tile: {}, Cycle: {}",
            record.location.lane, record.location.tile, record.location.cycle
        );
        println!(
            "No Call: {}, A: {}, C: {}, G: {}, T: {}",
            record.no_call, record.base_a, record.base_c, record.base_g, record.base_t
        );
    }
    Ok(())
}
