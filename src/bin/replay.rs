use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossline_rs::{CrossingPipeline, Detection, DetectionSource, LineCrossingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replay recorded per-frame detections and print deduplicated line crossings.
///
/// Each input line is one video frame: a JSON array of detections. Blank
/// lines are frames without detections.
#[derive(Parser, Debug)]
#[command(name = "crossline-replay")]
struct Args {
    /// JSON-lines file with one detection array per frame
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// JSON file with a base configuration; flags override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
    #[arg(long, default_value_t = 1920)]
    frame_width: u32,
    #[arg(long, default_value_t = 1080)]
    frame_height: u32,
    #[arg(long, env = "CENTROID_DISTANCE_THRESHOLD")]
    distance_threshold: Option<f64>,
    /// Seconds before the same object may cross again
    #[arg(long, env = "DUPLICATE_PREVENTION_TIME")]
    cooldown: Option<f64>,
    /// Line height as a fraction of the frame height
    #[arg(long, env = "DETECTION_LINE_POSITION")]
    line_position: Option<f64>,
    #[arg(long, env = "PROCESS_EVERY_N_FRAMES")]
    process_every_n_frames: Option<u32>,
    #[arg(long, env = "CROP_PADDING")]
    crop_padding: Option<u32>,
    #[arg(long, env = "MIN_CAR_HEIGHT")]
    min_crop_height: Option<u32>,
}

impl Args {
    fn load_config(&self) -> Result<LineCrossingConfig> {
        let base = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => LineCrossingConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    /// Flags and their environment variables win over the config file.
    fn apply_overrides(&self, mut config: LineCrossingConfig) -> LineCrossingConfig {
        if let Some(v) = self.distance_threshold {
            config.distance_threshold = v;
        }
        if let Some(v) = self.cooldown {
            config.cooldown = v;
        }
        if let Some(v) = self.line_position {
            config.line_position = v;
        }
        if let Some(v) = self.process_every_n_frames {
            config.process_every_n_frames = v;
        }
        if let Some(v) = self.crop_padding {
            config.crop_padding = v;
        }
        if let Some(v) = self.min_crop_height {
            config.min_crop_height = v;
        }
        config
    }
}

/// Hands the pipeline whatever frame the replay loop staged last.
#[derive(Default)]
struct ReplaySource {
    pending: Vec<Detection>,
}

impl DetectionSource for ReplaySource {
    type Error = Infallible;

    fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
        Ok(std::mem::take(&mut self.pending))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crossline_rs=info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    info!(?config, fps = args.fps, "starting replay");

    let mut pipeline = CrossingPipeline::new(ReplaySource::default(), config, args.fps)
        .context("invalid configuration")?;

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let total = replay(
        &mut pipeline,
        BufReader::new(input),
        &mut out,
        args.frame_width,
        args.frame_height,
    )?;
    out.flush()?;

    info!(
        frames = pipeline.frame_index(),
        crossings = total,
        tracks_allocated = pipeline.associator().last_allocated_id(),
        "replay finished"
    );
    Ok(())
}

/// One input line is one frame; a blank line is a frame with no detections.
fn parse_frame(line: &str, line_no: usize) -> Result<Vec<Detection>> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(line).with_context(|| format!("invalid detections on line {line_no}"))
}

/// Feed every line of `input` through the pipeline, writing one JSON line per
/// crossing to `out`. Returns the number of crossings written.
fn replay<R: BufRead, W: Write>(
    pipeline: &mut CrossingPipeline<ReplaySource>,
    input: R,
    mut out: W,
    frame_width: u32,
    frame_height: u32,
) -> Result<usize> {
    let mut total = 0usize;
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;

        pipeline.detector_mut().pending = parse_frame(&line, line_no)?;
        let Some(frame) = pipeline.process_frame(&[], frame_width, frame_height)? else {
            continue;
        };

        for crossing in &frame.crossings {
            serde_json::to_writer(&mut out, crossing)?;
            writeln!(out)?;
        }
        total += frame.crossings.len();
    }
    Ok(total)
}
