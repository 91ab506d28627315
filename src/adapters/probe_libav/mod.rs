// Probe LibAV adapter - Media file analysis using libav

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// LibAV-based media probing adapter
///
/// Opens the container in-process instead of spawning `ffprobe`. The libav
/// calls block, so they run on tokio's blocking pool.
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg::init().map_err(|e| DomainError::ProbeFailed(format!("Failed to initialize libav: {}", e)))?;
        Ok(Self)
    }

    fn probe_blocking(path: PathBuf) -> Result<MediaInfo, DomainError> {
        let input = ffmpeg::format::input(&path)
            .map_err(|e| DomainError::ProbeFailed(format!("{}: {}", path.display(), e)))?;

        let mut video_streams = 0;
        let mut audio_streams = 0;
        for stream in input.streams() {
            match stream.parameters().medium() {
                ffmpeg::media::Type::Video => video_streams += 1,
                ffmpeg::media::Type::Audio => audio_streams += 1,
                _ => {}
            }
        }

        let raw = input.duration();
        if raw < 0 {
            return Err(DomainError::ProbeFailed(format!(
                "Could not determine duration of {}",
                path.display()
            )));
        }
        let seconds = raw as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE);

        Ok(MediaInfo {
            container: input.format().name().to_string(),
            path,
            duration: MediaDuration::new(seconds)?,
            video_streams,
            audio_streams,
        })
    }
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        let path = file_path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::probe_blocking(path))
            .await
            .map_err(|e| DomainError::InternalError(format!("Probe task failed: {}", e)))?
    }
}
