use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use micromosaic::logger;
use micromosaic::mosaic_pipeline::io::load_image;
use micromosaic::mosaic_pipeline::{
    save_mosaic, BackgroundCorrection, DeflateLevel, DirectoryFrameSource, FeatureAlgorithm, MosaicConfig,
    MosaicSession, Predictor, StandardTiffWriter, TiffCompression, WriterConfig,
};
use tracing::{error, info, warn};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    /// FAST corners with binary descriptors.
    Fast,
    /// Harris corners with normalized patch descriptors.
    Accurate,
}

impl From<Algorithm> for FeatureAlgorithm {
    fn from(value: Algorithm) -> Self {
        match value {
            Algorithm::Fast => FeatureAlgorithm::FastBrief,
            Algorithm::Accurate => FeatureAlgorithm::HarrisPatch,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<Compression> for TiffCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::DeflateFast => TiffCompression::Deflate(DeflateLevel::Fast),
            Compression::DeflateBalanced => TiffCompression::Deflate(DeflateLevel::Balanced),
            Compression::DeflateBest => TiffCompression::Deflate(DeflateLevel::Best),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "micromosaic")]
#[command(about = "Stitch overlapping microscope frames into one mosaic")]
#[command(version)]
struct Cli {
    /// Directory the camera drops frames into.
    #[arg(long)]
    input: PathBuf,

    /// Output TIFF path.
    #[arg(long, default_value = "mosaic.tiff")]
    output: PathBuf,

    /// Background correction image added to every frame.
    #[arg(long)]
    correction: Option<PathBuf>,

    /// Downscale factor used for registration.
    #[arg(long, default_value_t = 4)]
    downscale: usize,

    #[arg(long, value_enum, default_value_t = Algorithm::Accurate)]
    algorithm: Algorithm,

    /// Lowe ratio test threshold.
    #[arg(long, default_value_t = 0.75)]
    ratio: f32,

    /// Canvas size as HEIGHTxWIDTH.
    #[arg(long, value_parser = parse_size, default_value = "60000x60000")]
    canvas_size: (usize, usize),

    /// Leave input files in place instead of deleting them once read.
    #[arg(long)]
    keep_input: bool,

    /// Keep polling the input directory for new frames.
    #[arg(long)]
    watch: bool,

    /// Delay between polls in watch mode.
    #[arg(long, default_value_t = 500)]
    poll_ms: u64,

    /// Stop watching after this many consecutive polls without frames.
    #[arg(long, default_value_t = 20)]
    idle_polls: u32,

    #[arg(long, value_enum, default_value_t = Compression::DeflateBalanced)]
    compression: Compression,

    /// Disable horizontal differencing before compression.
    #[arg(long)]
    no_predictor: bool,

    /// Rows per TIFF strip.
    #[arg(long)]
    rows_per_strip: Option<u32>,
}

fn parse_size(value: &str) -> std::result::Result<(usize, usize), String> {
    let (h, w) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected HEIGHTxWIDTH, got '{value}'"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    Ok((h, w))
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    if !cli.input.is_dir() {
        bail!("input directory {} does not exist", cli.input.display());
    }

    let config = MosaicConfig::builder()
        .downscale_factor(cli.downscale)
        .algorithm(cli.algorithm.into())
        .ratio_threshold(cli.ratio)
        .canvas_size(cli.canvas_size.0, cli.canvas_size.1)
        .build();
    let mut session = MosaicSession::new(config).context("invalid session configuration")?;

    if let Some(path) = &cli.correction {
        let image = load_image(path).with_context(|| format!("loading correction {}", path.display()))?;
        info!(height = image.height(), width = image.width(), "Background correction loaded");
        session.set_correction(Some(BackgroundCorrection::new(image)));
    }

    info!(
        input = %cli.input.display(),
        algorithm = %session.config().algorithm,
        downscale = session.config().downscale_factor,
        "Starting micromosaic"
    );

    let mut source = DirectoryFrameSource::new(&cli.input).keep_inputs(cli.keep_input);
    let mut source_error = None;
    if cli.watch {
        let summary = session.watch(&mut source, Duration::from_millis(cli.poll_ms), cli.idle_polls);
        if summary.source_errors > 0 {
            warn!(source_errors = summary.source_errors, "Input directory failed during watch");
        }
    } else {
        match session.process_available(&mut source) {
            Ok(summary) => {
                if let Some(distances) = session.edge_distances() {
                    info!(accepted = summary.accepted, dropped = summary.dropped, "{}", distances);
                }
            }
            Err(e) => {
                error!(error = %e, "Reading frames failed, saving what was stitched so far");
                source_error = Some(e);
            }
        }
    }

    info!(
        accepted = session.accepted_frames(),
        dropped = session.dropped_frames(),
        "Input exhausted"
    );

    let mut writer_config = WriterConfig::builder().compression(cli.compression.into());
    if cli.no_predictor {
        writer_config = writer_config.predictor(Predictor::None);
    }
    if let Some(rows) = cli.rows_per_strip {
        writer_config = writer_config.rows_per_strip(rows);
    }
    let writer_config = writer_config.build();
    let saved = save_mosaic(&session, &StandardTiffWriter, &writer_config, &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    if saved {
        info!(path = %cli.output.display(), "Mosaic written");
    } else {
        warn!("No frames were accepted, nothing written");
    }

    if let Some(e) = source_error {
        return Err(e).with_context(|| format!("reading frames from {}", cli.input.display()));
    }
    Ok(())
}
