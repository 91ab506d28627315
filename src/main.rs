//! video-splitter
//!
//! Splits a video file into fixed-length pieces by running one ffmpeg
//! process per piece, with a bounded number of them in flight.
//!
//! # Usage
//!
//! ```bash
//! video-splitter -v talk.mp4 -d 30
//! video-splitter -v talk.mkv -d 05:00 -o /tmp/parts --no-folder -j 4
//! video-splitter -v talk.avi --dry-run --json
//! ```

use std::process::ExitCode;

use clap::Parser;

use video_splitter::cli::{commands, Cli};
use video_splitter::SplitterError;

/// Main entry point for the video-splitter CLI
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match commands::split(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            let code = err
                .downcast_ref::<SplitterError>()
                .map_or(1, SplitterError::exit_code);
            ExitCode::from(code)
        }
    }
}
