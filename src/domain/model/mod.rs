// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Seconds as a float
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string: plain seconds, MM:SS(.ms) or HH:MM:SS(.ms)
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(DomainError::BadArgs("Time must be a finite number".to_string()));
            }
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_component(minutes, "minutes")?;
                let seconds = parse_seconds_component(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_component(hours, "hours")?;
                let minutes = parse_component(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                let seconds = parse_seconds_component(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(format!(
                "Invalid time format '{}'. Supported formats: seconds (e.g., 30), MM:SS (e.g., 1:30), HH:MM:SS (e.g., 1:02:30)",
                trimmed
            ))),
        }
    }

    /// Format as [H:]MM:SS.mmm
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let millis = total_millis % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
        }
    }
}

fn parse_component(value: &str, name: &str) -> Result<u32, DomainError> {
    value
        .parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format", name)))
}

fn parse_seconds_component(value: &str) -> Result<f64, DomainError> {
    let seconds = value
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Total duration of the source media, in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MediaDuration(f64);

impl MediaDuration {
    pub fn new(seconds: f64) -> Result<Self, DomainError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(DomainError::ProbeFailed(format!(
                "Invalid media duration: {}",
                seconds
            )));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for MediaDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

/// Preferred segment length, in seconds. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ChunkSize(f64);

impl ChunkSize {
    /// Default chunk length used when the caller does not specify one
    pub const DEFAULT_SECONDS: f64 = 30.0;

    pub fn new(seconds: f64) -> Result<Self, DomainError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(DomainError::ValidationFailed(
                "Please provide a valid positive duration in seconds".to_string(),
            ));
        }
        Ok(Self(seconds))
    }

    /// Parse any format accepted by [`TimeSpec::parse`]
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let time = TimeSpec::parse(value)
            .map_err(|e| DomainError::ValidationFailed(format!("Invalid duration '{}': {}", value, e)))?;
        Self::new(time.as_seconds())
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(Self::DEFAULT_SECONDS)
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Result of probing a media file
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub container: String,
    pub duration: MediaDuration,
    pub video_streams: usize,
    pub audio_streams: usize,
}

impl MediaInfo {
    pub fn has_video(&self) -> bool {
        self.video_streams > 0
    }
}

/// One contiguous time slice of the source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// 1-based position in playback order
    pub index: u32,
    pub start: f64,
    pub length: ChunkSize,
}

impl Segment {
    /// Length after the engine clips at the end of the source
    pub fn effective_length(&self, total: MediaDuration) -> f64 {
        (total.seconds() - self.start).clamp(0.0, self.length.seconds())
    }

    pub fn start_time(&self) -> TimeSpec {
        TimeSpec::from_seconds(self.start)
    }
}

/// A single trim task: one segment of one source written to one destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentJob {
    pub segment: Segment,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
}

impl SegmentJob {
    pub fn index(&self) -> u32 {
        self.segment.index
    }

    pub fn trim_request(&self) -> TrimRequest {
        TrimRequest {
            source: self.source_path.clone(),
            start: self.segment.start,
            duration: self.segment.length.seconds(),
            destination: self.destination_path.clone(),
        }
    }
}

/// Input of the media engine's trim operation
#[derive(Debug, Clone, PartialEq)]
pub struct TrimRequest {
    pub source: PathBuf,
    pub start: f64,
    pub duration: f64,
    pub destination: PathBuf,
}

/// What to do with the remaining segments once one of them fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep starting jobs; report every failure at the end
    #[default]
    CollectAll,
    /// Stop starting new jobs after the first failure; in-flight jobs still finish
    FailFast,
}

/// A segment that could not be produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentFailure {
    pub index: u32,
    pub message: String,
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}: {}", self.index, self.message)
    }
}

/// Phases of a split run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Idle,
    Probing,
    Partitioning,
    Scheduling,
    Completed,
    Aborted,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::Probing => "probing",
            RunPhase::Partitioning => "partitioning",
            RunPhase::Scheduling => "scheduling",
            RunPhase::Completed => "completed",
            RunPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Succeeded,
    Partial,
    Aborted,
}

/// Everything a caller needs to report on a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub total_duration: MediaDuration,
    pub chunk_size: ChunkSize,
    pub segments_planned: usize,
    pub segments_attempted: usize,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<SegmentFailure>,
    pub status: RunStatus,
    pub max_in_flight: usize,
    pub dry_run: bool,
    pub planned: Vec<SegmentJob>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// Notification emitted by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    PhaseChanged {
        from: RunPhase,
        to: RunPhase,
    },
    Planned {
        segments: usize,
        chunk_size: ChunkSize,
        total_duration: MediaDuration,
    },
    SegmentCompleted {
        index: u32,
        output: PathBuf,
        completed: usize,
        total: usize,
    },
    SegmentFailed {
        index: u32,
        message: String,
    },
}

/// Lower-cased extension without the dot
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests;
