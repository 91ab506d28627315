//! FFprobe adapter for media file probing
//!
//! Runs the `ffprobe` binary configured in [`EngineConfig`] and reads its JSON
//! report into a [`MediaInfo`].

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{command, EngineConfig};
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    config: EngineConfig,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

/// Read ffprobe's `-print_format json -show_format -show_streams` output
pub fn parse_probe_output(file_path: &Path, json: &[u8]) -> Result<MediaInfo, DomainError> {
    let report: ProbeReport = serde_json::from_slice(json)
        .map_err(|e| DomainError::ProbeFailed(format!("Unreadable ffprobe output: {}", e)))?;

    let count = |kind: &str| {
        report
            .streams
            .iter()
            .filter(|s| s.codec_type.as_deref() == Some(kind))
            .count()
    };
    let video_streams = count("video");
    let audio_streams = count("audio");

    // Container duration first, longest stream as fallback.
    let format_duration = report
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());
    let stream_duration = report
        .streams
        .iter()
        .filter_map(|s| s.duration.as_deref())
        .filter_map(|d| d.parse::<f64>().ok())
        .fold(None, |longest: Option<f64>, d| Some(longest.map_or(d, |l| l.max(d))));

    let seconds = format_duration.or(stream_duration).ok_or_else(|| {
        DomainError::ProbeFailed(format!(
            "Could not determine duration of {}",
            file_path.display()
        ))
    })?;

    let container = report
        .format
        .as_ref()
        .and_then(|f| f.format_name.clone())
        .or_else(|| extension_of(file_path))
        .unwrap_or_else(|| "unknown".to_string());

    Ok(MediaInfo {
        path: file_path.to_path_buf(),
        container,
        duration: MediaDuration::new(seconds)?,
        video_streams,
        audio_streams,
    })
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        debug!(
            ffprobe = %self.config.ffprobe_path.display(),
            file = %file_path.display(),
            "Probing media file"
        );

        let output = command::ffprobe_command(&self.config, file_path)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFailed(format!(
                    "Failed to run {}: {}",
                    self.config.ffprobe_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = command::stderr_tail(&output.stderr);
            return Err(DomainError::ProbeFailed(if stderr.is_empty() {
                format!("ffprobe exited with {}", output.status)
            } else {
                stderr
            }));
        }

        parse_probe_output(file_path, &output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            { "index": 0, "codec_type": "video", "codec_name": "h264", "duration": "64.960000" },
            { "index": 1, "codec_type": "audio", "codec_name": "aac", "duration": "65.002667" }
        ],
        "format": { "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "65.002667" }
    }"#;

    #[test]
    fn test_parse_probe_output() {
        let info = parse_probe_output(Path::new("talk.mp4"), SAMPLE.as_bytes()).unwrap();
        assert_eq!(info.video_streams, 1);
        assert_eq!(info.audio_streams, 1);
        assert!(info.has_video());
        assert!((info.duration.seconds() - 65.002667).abs() < 1e-9);
        assert_eq!(info.container, "mov,mp4,m4a,3gp,3g2,mj2");
    }

    #[test]
    fn test_parse_probe_output_falls_back_to_stream_duration() {
        let json = r#"{ "streams": [
            { "codec_type": "video", "duration": "12.5" },
            { "codec_type": "audio", "duration": "12.75" }
        ] }"#;
        let info = parse_probe_output(Path::new("clip.mkv"), json.as_bytes()).unwrap();
        assert_eq!(info.duration.seconds(), 12.75);
        assert_eq!(info.container, "mkv");
    }

    #[test]
    fn test_parse_probe_output_audio_only() {
        let json = r#"{ "streams": [ { "codec_type": "audio" } ],
                        "format": { "duration": "30.0" } }"#;
        let info = parse_probe_output(Path::new("song.mp4"), json.as_bytes()).unwrap();
        assert!(!info.has_video());
    }

    #[test]
    fn test_parse_probe_output_without_duration() {
        let json = r#"{ "streams": [ { "codec_type": "video" } ], "format": {} }"#;
        let err = parse_probe_output(Path::new("a.mp4"), json.as_bytes()).unwrap_err();
        assert!(matches!(err, DomainError::ProbeFailed(_)));
    }

    #[test]
    fn test_parse_probe_output_garbage() {
        assert!(parse_probe_output(Path::new("a.mp4"), b"not json").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_probe_failure() {
        let adapter = FFprobeAdapter::new(EngineConfig::new(
            "ffmpeg-does-not-exist",
            "ffprobe-does-not-exist",
        ));
        let err = adapter.probe_media(Path::new("a.mp4")).await.unwrap_err();
        assert!(matches!(err, DomainError::ProbeFailed(_)));
    }
}
