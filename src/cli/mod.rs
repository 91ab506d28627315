//! CLI module for video-splitter
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::Parser;

pub mod args;
pub mod commands;

/// Split a video into fixed-length pieces
///
/// Each piece is produced by its own ffmpeg invocation; several run at once.
/// Outputs are named `<name>_<n><ext>` and written to a `split-output` folder
/// inside the output directory unless `--no-folder` is given.
#[derive(Parser, Debug)]
#[command(name = "video-splitter")]
#[command(about = "Split a video into fixed-length segments")]
#[command(version)]
pub struct Cli {
    /// Video file to split (mp4, avi, mkv)
    #[arg(short = 'v', long = "video", value_name = "FILE")]
    pub video: Option<PathBuf>,

    /// Length of each piece: seconds, MM:SS or HH:MM:SS [default: 30]
    #[arg(short, long, value_name = "DURATION", allow_hyphen_values = true)]
    pub duration: Option<String>,

    /// Directory the pieces are written to [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write the pieces directly into the output directory
    #[arg(long)]
    pub no_folder: bool,

    /// Maximum number of ffmpeg processes running at once [default: CPU count]
    #[arg(short = 'j', long, value_name = "N", value_parser = args::parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Stop starting new pieces after the first failure
    #[arg(long, overrides_with = "no_fail_fast")]
    pub fail_fast: bool,

    /// Attempt every piece even when the config file enables fail-fast
    #[arg(long, overrides_with = "fail_fast")]
    pub no_fail_fast: bool,

    /// Print the planned pieces without running ffmpeg
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "VIDEO_SPLITTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long, value_name = "PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Logging level
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, default_value = "pretty", value_parser = ["pretty", "compact", "json"])]
    pub log_format: String,
}
