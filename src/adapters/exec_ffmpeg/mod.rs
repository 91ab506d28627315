//! FFmpeg execution adapter
//!
//! Each trim request becomes one `ffmpeg` process. The process is awaited to
//! completion; there is no timeout and no retry.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{command, EngineConfig};
use crate::ports::*;

/// FFmpeg-based trim adapter
pub struct FFmpegAdapter {
    config: EngineConfig,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[async_trait]
impl TrimPort for FFmpegAdapter {
    async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError> {
        debug!(
            source = %request.source.display(),
            start = request.start,
            duration = request.duration,
            destination = %request.destination.display(),
            "Running ffmpeg trim"
        );

        let output = command::ffmpeg_command(&self.config, request)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProcessingError(format!(
                    "Failed to run {}: {}",
                    self.config.ffmpeg_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = command::stderr_tail(&output.stderr);
            return Err(DomainError::ProcessingError(if stderr.is_empty() {
                format!("ffmpeg exited with {}", output.status)
            } else {
                stderr
            }));
        }

        trace!(destination = %request.destination.display(), "ffmpeg trim finished");
        Ok(())
    }
}
