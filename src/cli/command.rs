use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use rifx::process::extract::SkipPolicy;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (rifx ",
    env!("RIFX_VERSION"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Debug, ClapParser)]
#[command(
    name         = env!("CARGO_PKG_NAME"),
    version      = env!("CARGO_PKG_VERSION"),
    long_version = LONG_VERSION,
    author       = env!("CARGO_PKG_AUTHORS"),
    about        = "Tools for locating and extracting RIFX audio records from decompressed archives",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on the first marker without an end).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract every embedded record and convert it to WAV.
    Extract(ExtractArgs),

    /// List embedded records without writing anything.
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Decompressed archive to scan.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory [default: INPUT without extension, next to INPUT].
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Keep the raw .wem files and skip WAV conversion.
    #[arg(long)]
    pub no_convert: bool,

    /// Decoder executable used for WAV conversion.
    #[arg(long, value_name = "PATH", default_value = "vgmstream-cli")]
    pub decoder: PathBuf,

    /// Keep each raw .wem file after it converted successfully.
    #[arg(long)]
    pub keep_raw: bool,

    /// Write a YAML report of the run to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Decompressed archive to scan.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Where to continue after a marker without an end boundary.
    #[arg(long, value_enum, default_value_t = OnMissingEnd::Resume)]
    pub on_missing_end: OnMissingEnd,

    /// Look back at most this many bytes for a record name.
    #[arg(long, value_name = "BYTES")]
    pub name_lookback: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OnMissingEnd {
    /// Keep scanning right after the marker.
    Resume,
    /// Continue where the boundary search stopped (usually the end of input).
    Stop,
}

impl From<OnMissingEnd> for SkipPolicy {
    fn from(value: OnMissingEnd) -> Self {
        match value {
            OnMissingEnd::Resume => SkipPolicy::Resume,
            OnMissingEnd::Stop => SkipPolicy::Stop,
        }
    }
}
