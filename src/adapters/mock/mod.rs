//! In-memory adapters for exercising the orchestrator without a media engine

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start offsets are compared at millisecond precision
fn start_key(start: f64) -> u64 {
    (start * 1000.0).round() as u64
}

/// Probe adapter returning a scripted result
pub struct MockProbeAdapter {
    result: Result<(f64, usize), DomainError>,
    calls: AtomicUsize,
}

impl MockProbeAdapter {
    /// A source with one video and one audio stream
    pub fn with_duration(seconds: f64) -> Self {
        Self {
            result: Ok((seconds, 1)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A readable source that has no video stream
    pub fn without_video(seconds: f64) -> Self {
        Self {
            result: Ok((seconds, 0)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source the engine cannot read
    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(DomainError::ProbeFailed(message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (seconds, video_streams) = self.result.clone()?;
        Ok(MediaInfo {
            path: file_path.to_path_buf(),
            container: extension_of(file_path).unwrap_or_else(|| "unknown".to_string()),
            duration: MediaDuration::new(seconds)?,
            video_streams,
            audio_streams: 1,
        })
    }
}

/// Trim adapter that records requests and tracks concurrency
#[derive(Default)]
pub struct MockTrimAdapter {
    delay: Duration,
    delays: HashMap<u64, Duration>,
    failures: HashMap<u64, String>,
    write_files: bool,
    requests: Mutex<Vec<TrimRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTrimAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every trim takes at least this long
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The trim starting at `start` takes `delay` instead of the default
    pub fn with_delay_for(mut self, start: f64, delay: Duration) -> Self {
        self.delays.insert(start_key(start), delay);
        self
    }

    /// The trim starting at `start` fails with `message`
    pub fn failing_at(mut self, start: f64, message: &str) -> Self {
        self.failures.insert(start_key(start), message.to_string());
        self
    }

    /// Write a small placeholder file at each destination
    pub fn writing_files(mut self) -> Self {
        self.write_files = true;
        self
    }

    /// Requests in the order they were started
    pub fn requests(&self) -> Vec<TrimRequest> {
        lock(&self.requests).clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrimPort for MockTrimAdapter {
    async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError> {
        lock(&self.requests).push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let key = start_key(request.start);
        let delay = self.delays.get(&key).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        let result = match self.failures.get(&key) {
            Some(message) => Err(DomainError::ProcessingError(message.clone())),
            None if self.write_files => tokio::fs::write(&request.destination, b"segment")
                .await
                .map_err(|e| DomainError::FsFail(e.to_string())),
            None => Ok(()),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Notifier that keeps every event for later inspection
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        lock(&self.events).clone()
    }

    /// Phases entered, in order
    pub fn phases(&self) -> Vec<RunPhase> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RunEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    /// Indices of failed segments, in notification order
    pub fn failed_indices(&self) -> Vec<u32> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RunEvent::SegmentFailed { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotifierPort for RecordingNotifier {
    async fn notify(&self, event: &RunEvent) {
        lock(&self.events).push(event.clone());
    }
}
