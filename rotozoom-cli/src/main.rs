use clap::Parser;
use rotozoom::io::{load_rgb_image, save_rgb_image};
use rotozoom::{
    transform, BmpReader, BmpWriter, ImageSource, InterpolationMode, MemorySink, MemorySource,
    Strategy, TransformConfig, TransformReport,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Rotate and zoom an RGB image")]
struct Cli {
    /// Source image. BMP files are streamed; other formats are decoded in memory.
    input: Option<PathBuf>,
    /// Destination image; the format follows the extension.
    output: Option<PathBuf>,
    /// Rotation angle in degrees, counter-clockwise.
    #[arg(short, long, allow_negative_numbers = true)]
    angle: Option<f64>,
    /// Uniform scale factor (> 0).
    #[arg(short, long)]
    zoom: Option<f64>,
    /// Interpolation: nearest, bilinear, bicubic or lanczos3.
    #[arg(short, long)]
    mode: Option<InterpolationMode>,
    /// Execution strategy: in-memory or tiled.
    #[arg(short, long)]
    strategy: Option<Strategy>,
    /// Output tile side for the tiled strategy.
    #[arg(long)]
    tile_side: Option<usize>,
    /// Source padding around each tile window.
    #[arg(long)]
    padding: Option<usize>,
    /// JSON configuration; command-line flags override its fields.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Write the JSON run report to FILE instead of stdout.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<ModeConfig> for InterpolationMode {
    fn from(value: ModeConfig) -> Self {
        match value {
            ModeConfig::Nearest => InterpolationMode::NearestNeighbour,
            ModeConfig::Bilinear => InterpolationMode::Bilinear,
            ModeConfig::Bicubic => InterpolationMode::Bicubic,
            ModeConfig::Lanczos3 => InterpolationMode::Lanczos3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum StrategyConfig {
    #[serde(alias = "in_memory")]
    InMemory,
    Tiled,
}

impl From<StrategyConfig> for Strategy {
    fn from(value: StrategyConfig) -> Self {
        match value {
            StrategyConfig::InMemory => Strategy::InMemory,
            StrategyConfig::Tiled => Strategy::Tiled,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    angle_deg: f64,
    zoom: f64,
    mode: Option<ModeConfig>,
    strategy: Option<StrategyConfig>,
    tile_side: usize,
    padding: usize,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = TransformConfig::default();
        Self {
            input: None,
            output: None,
            angle_deg: cfg.angle_deg,
            zoom: cfg.zoom,
            mode: None,
            strategy: None,
            tile_side: cfg.tile_side,
            padding: cfg.padding,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    input: PathBuf,
    output: PathBuf,
    angle_deg: f64,
    zoom: f64,
    mode: String,
    strategy: String,
    source_width: usize,
    source_height: usize,
    canvas_width: usize,
    canvas_height: usize,
    tiles: usize,
}

impl Report {
    fn new(input: &Path, output: &Path, config: &TransformConfig, run: TransformReport) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            angle_deg: config.angle_deg,
            zoom: config.zoom,
            mode: config.mode.to_string(),
            strategy: config.strategy.to_string(),
            source_width: run.source_width,
            source_height: run.source_height,
            canvas_width: run.canvas_width,
            canvas_height: run.canvas_height,
            tiles: run.tiles,
        }
    }
}

fn is_bmp(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

fn open_source(path: &Path) -> Result<Box<dyn ImageSource>, Box<dyn std::error::Error>> {
    if is_bmp(path) {
        let reader = BmpReader::new(BufReader::new(File::open(path)?))?;
        Ok(Box::new(reader))
    } else {
        Ok(Box::new(MemorySource::new(load_rgb_image(path)?)?))
    }
}

fn run(
    input: &Path,
    output: &Path,
    config: &TransformConfig,
) -> Result<TransformReport, Box<dyn std::error::Error>> {
    // Fail on bad parameters before touching the filesystem.
    config.validate()?;
    let mut source = open_source(input)?;

    if is_bmp(output) {
        let mut sink = BmpWriter::new(BufWriter::new(File::create(output)?));
        let report = transform(source.as_mut(), &mut sink, config)?;
        sink.into_inner()?;
        Ok(report)
    } else {
        let mut sink = MemorySink::new();
        let report = transform(source.as_mut(), &mut sink, config)?;
        let buffer = sink.into_buffer().ok_or("transform produced no output")?;
        save_rgb_image(&buffer, output)?;
        Ok(report)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("rotozoom=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let file_config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let input = cli
        .input
        .or(file_config.input)
        .ok_or("an input path is required (argument or config `input`)")?;
    let output = cli
        .output
        .or(file_config.output)
        .ok_or("an output path is required (argument or config `output`)")?;

    let config = TransformConfig {
        angle_deg: cli.angle.unwrap_or(file_config.angle_deg),
        zoom: cli.zoom.unwrap_or(file_config.zoom),
        mode: cli
            .mode
            .or(file_config.mode.map(Into::into))
            .unwrap_or_default(),
        strategy: cli
            .strategy
            .or(file_config.strategy.map(Into::into))
            .unwrap_or_default(),
        tile_side: cli.tile_side.unwrap_or(file_config.tile_side),
        padding: cli.padding.unwrap_or(file_config.padding),
    };

    let run_report = run(&input, &output, &config)?;
    tracing::info!(
        canvas_width = run_report.canvas_width,
        canvas_height = run_report.canvas_height,
        tiles = run_report.tiles,
        "transform finished"
    );

    let report = Report::new(&input, &output, &config, run_report);
    let json = serde_json::to_string_pretty(&report)?;
    match cli.report {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
