use std::path::PathBuf;

use clap::{ Parser, ValueEnum };
use log::LevelFilter;

use pov_tracer::config::parse_workers;
use pov_tracer::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, MAX_DEPTH, OUT_FILE };

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(name = "pov-tracer", version, about)]
pub struct Args {
    /// Scene file; `.json` files are read as JSON, anything else as POV
    #[clap(value_parser)]
    pub scene: PathBuf,

    /// Output image; `.ppm` writes a plain PPM, anything else a PNG
    #[clap(short, long, value_parser, default_value = OUT_FILE)]
    pub output: PathBuf,

    /// Image width in pixels
    #[clap(long, value_parser, default_value_t = CANVAS_WIDTH)]
    pub width: usize,

    /// Image height in pixels
    #[clap(long, value_parser, default_value_t = CANVAS_HEIGHT)]
    pub height: usize,

    /// Maximum recursion depth for reflected, refracted and transmitted rays
    #[clap(long, value_parser, default_value_t = MAX_DEPTH)]
    pub depth: i32,

    /// Number of render threads [default: $POV_TRACER_WORKERS, or one per CPU]
    #[clap(long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Logging level
    #[clap(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
