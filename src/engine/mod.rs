//! External media engine location and command construction
//!
//! The splitter never decodes media itself. Every probe and trim is delegated to
//! the `ffprobe` / `ffmpeg` binaries, whose locations are carried by an
//! [`EngineConfig`] handed to the adapters when they are built.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod command;

/// Default binary name of the encoder
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Default binary name of the prober
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Where the media engine binaries live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path or name of the ffmpeg binary
    pub ffmpeg_path: PathBuf,
    /// Path or name of the ffprobe binary
    pub ffprobe_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
        }
    }
}

impl EngineConfig {
    pub fn new(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }
}
