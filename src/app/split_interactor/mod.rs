// Split interactor - Orchestrates probe, partition and bounded trimming

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::app::scheduler::BoundedScheduler;
use crate::app::segment_job::{OutputDirectory, SegmentJobRunner};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Parameters of one split run
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRequest {
    pub source: PathBuf,
    pub destination_root: PathBuf,
    pub chunk_size: ChunkSize,
    pub concurrency_limit: usize,
    pub group_in_folder: bool,
    /// Subfolder used when `group_in_folder` is set
    pub folder_name: String,
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
}

impl SplitRequest {
    pub fn new(source: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination_root: destination_root.into(),
            chunk_size: ChunkSize::default(),
            concurrency_limit: num_cpus::get(),
            group_in_folder: true,
            folder_name: OUTPUT_FOLDER_NAME.to_string(),
            failure_policy: FailurePolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_grouping(mut self, group_in_folder: bool) -> Self {
        self.group_in_folder = group_in_folder;
        self
    }

    pub fn with_folder_name(mut self, folder_name: impl Into<String>) -> Self {
        self.folder_name = folder_name.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory the segments land in
    pub fn output_dir(&self) -> PathBuf {
        OutputNaming::output_dir(
            &self.destination_root,
            self.group_in_folder.then_some(self.folder_name.as_str()),
        )
    }
}

/// Split interactor
///
/// Drives one run through `Idle -> Probing -> Partitioning -> Scheduling`
/// and ends in `Completed` or `Aborted`. Every transition and every segment
/// outcome is reported through the notifier port.
pub struct SplitInteractor {
    probe_port: Arc<dyn ProbePort>,
    trim_port: Arc<dyn TrimPort>,
    fs_port: Arc<dyn FsPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl SplitInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        trim_port: Arc<dyn TrimPort>,
        fs_port: Arc<dyn FsPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            probe_port,
            trim_port,
            fs_port,
            notifier,
        }
    }

    /// Execute a split run.
    ///
    /// Returns `Err` only when the run aborts before any trim is started.
    /// Segment failures are reported in the returned [`RunResult`].
    #[instrument(skip(self, request), fields(source = %request.source.display()))]
    pub async fn run(&self, request: SplitRequest) -> Result<RunResult, DomainError> {
        let started_at = Utc::now();
        let mut phase = RunPhase::Idle;

        self.transition(&mut phase, RunPhase::Probing).await;
        let info = match self.probe(&request).await {
            Ok(info) => info,
            Err(e) => {
                self.transition(&mut phase, RunPhase::Aborted).await;
                return Err(e);
            }
        };
        debug!(
            duration = info.duration.seconds(),
            container = %info.container,
            video_streams = info.video_streams,
            audio_streams = info.audio_streams,
            "Probed source"
        );

        self.transition(&mut phase, RunPhase::Partitioning).await;
        let output_dir = request.output_dir();
        let jobs = match DurationPartitioner::segments(info.duration, request.chunk_size)
            .and_then(|segments| JobPlanner::plan(&request.source, &output_dir, &segments))
        {
            Ok(jobs) => jobs,
            Err(e) => {
                self.transition(&mut phase, RunPhase::Aborted).await;
                return Err(e);
            }
        };

        self.notifier
            .notify(&RunEvent::Planned {
                segments: jobs.len(),
                chunk_size: request.chunk_size,
                total_duration: info.duration,
            })
            .await;

        let mut result = RunResult {
            source: request.source.clone(),
            output_dir: output_dir.clone(),
            total_duration: info.duration,
            chunk_size: request.chunk_size,
            segments_planned: jobs.len(),
            segments_attempted: 0,
            outputs: Vec::new(),
            failures: Vec::new(),
            status: RunStatus::Succeeded,
            max_in_flight: 0,
            dry_run: request.dry_run,
            planned: Vec::new(),
            started_at,
            finished_at: started_at,
        };

        if jobs.is_empty() {
            info!("Source has zero duration, nothing to split");
            self.transition(&mut phase, RunPhase::Completed).await;
            result.finished_at = Utc::now();
            return Ok(result);
        }

        if request.dry_run {
            result.planned = jobs;
            self.transition(&mut phase, RunPhase::Completed).await;
            result.finished_at = Utc::now();
            return Ok(result);
        }

        self.transition(&mut phase, RunPhase::Scheduling).await;
        self.schedule(&request, output_dir, jobs, &mut result).await;

        let end = if result.status == RunStatus::Aborted {
            RunPhase::Aborted
        } else {
            RunPhase::Completed
        };
        self.transition(&mut phase, end).await;
        result.finished_at = Utc::now();
        Ok(result)
    }

    /// Probe the source; a file without a video stream counts as unreadable
    async fn probe(&self, request: &SplitRequest) -> Result<MediaInfo, DomainError> {
        let info = self
            .probe_port
            .probe_media(&request.source)
            .await
            .map_err(|e| DomainError::ProbeFailed(e.detail()))?;

        if !info.has_video() {
            return Err(DomainError::ProbeFailed(format!(
                "No video stream found in {}",
                request.source.display()
            )));
        }
        Ok(info)
    }

    async fn schedule(
        &self,
        request: &SplitRequest,
        output_dir: PathBuf,
        jobs: Vec<SegmentJob>,
        result: &mut RunResult,
    ) {
        let total = jobs.len();
        let runner = SegmentJobRunner::new(
            Arc::clone(&self.trim_port),
            Arc::clone(&self.fs_port),
            Arc::new(OutputDirectory::new(output_dir)),
        );
        let settled = Arc::new(AtomicUsize::new(0));
        let reported = Arc::new(Mutex::new(HashSet::new()));

        let scheduler = BoundedScheduler::new(request.concurrency_limit)
            .with_policy(request.failure_policy);

        let report = scheduler
            .run_all(jobs, |job| {
                let runner = runner.clone();
                let notifier = Arc::clone(&self.notifier);
                let settled = Arc::clone(&settled);
                let reported = Arc::clone(&reported);
                async move {
                    let outcome = runner.execute(&job).await;
                    let completed = settled.fetch_add(1, Ordering::SeqCst) + 1;
                    match outcome {
                        Ok(output) => {
                            notifier
                                .notify(&RunEvent::SegmentCompleted {
                                    index: job.index(),
                                    output: output.clone(),
                                    completed,
                                    total,
                                })
                                .await;
                            Ok(output)
                        }
                        Err(failure) => {
                            reported
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner())
                                .insert(failure.index);
                            notifier
                                .notify(&RunEvent::SegmentFailed {
                                    index: failure.index,
                                    message: failure.message.clone(),
                                })
                                .await;
                            Err(failure.message)
                        }
                    }
                }
            })
            .await;

        // Jobs that panicked never reached their own failure notification.
        let reported = reported
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for (index, message) in report.failures() {
            if !reported.contains(&index) {
                self.notifier
                    .notify(&RunEvent::SegmentFailed {
                        index,
                        message: message.to_string(),
                    })
                    .await;
            }
        }

        result.segments_attempted = report.started();
        result.max_in_flight = report.max_in_flight;
        result.outputs = report.successes().map(|(_, path)| path.clone()).collect();
        result.failures = report
            .failures()
            .map(|(index, message)| SegmentFailure {
                index,
                message: message.to_string(),
            })
            .collect();

        result.status = match (result.failures.is_empty(), request.failure_policy) {
            (true, _) => RunStatus::Succeeded,
            (false, FailurePolicy::CollectAll) => RunStatus::Partial,
            (false, FailurePolicy::FailFast) => RunStatus::Aborted,
        };

        if !report.skipped.is_empty() {
            warn!(
                skipped = report.skipped.len(),
                "Stopped after first failure, {} segments not started",
                report.skipped.len()
            );
        }
    }

    async fn transition(&self, phase: &mut RunPhase, to: RunPhase) {
        let from = std::mem::replace(phase, to);
        debug!(%from, %to, "Run phase");
        self.notifier.notify(&RunEvent::PhaseChanged { from, to }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockProbeAdapter, MockTrimAdapter, RecordingNotifier};
    use crate::adapters::FsLocalAdapter;

    struct Harness {
        probe: Arc<MockProbeAdapter>,
        trim: Arc<MockTrimAdapter>,
        notifier: Arc<RecordingNotifier>,
        interactor: SplitInteractor,
    }

    fn harness(probe: MockProbeAdapter, trim: MockTrimAdapter) -> Harness {
        let probe = Arc::new(probe);
        let trim = Arc::new(trim);
        let notifier = Arc::new(RecordingNotifier::new());
        let interactor = SplitInteractor::new(
            probe.clone(),
            trim.clone(),
            Arc::new(FsLocalAdapter::new()),
            notifier.clone(),
        );
        Harness {
            probe,
            trim,
            notifier,
            interactor,
        }
    }

    #[tokio::test]
    async fn test_request_output_dir() {
        let request = SplitRequest::new("/v/a.mp4", "/out");
        assert_eq!(request.output_dir(), PathBuf::from("/out/split-output"));
        assert_eq!(
            request.clone().with_grouping(false).output_dir(),
            PathBuf::from("/out")
        );
        assert_eq!(
            request.with_folder_name("parts").output_dir(),
            PathBuf::from("/out/parts")
        );
    }

    #[tokio::test]
    async fn test_successful_run_phases() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(MockProbeAdapter::with_duration(65.0), MockTrimAdapter::new());

        let result = h
            .interactor
            .run(SplitRequest::new("/videos/talk.mp4", temp.path()).with_concurrency(2))
            .await
            .unwrap();

        assert_eq!(result.status, RunStatus::Succeeded);
        assert_eq!(result.segments_planned, 3);
        assert_eq!(result.outputs.len(), 3);
        assert_eq!(
            h.notifier.phases(),
            vec![
                RunPhase::Probing,
                RunPhase::Partitioning,
                RunPhase::Scheduling,
                RunPhase::Completed
            ]
        );
    }

    #[tokio::test]
    async fn test_probe_failure_aborts_without_trimming() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(MockProbeAdapter::failing("moov atom not found"), MockTrimAdapter::new());

        let err = h
            .interactor
            .run(SplitRequest::new("/videos/broken.mp4", temp.path()))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::ProbeFailed("moov atom not found".to_string()));
        assert_eq!(h.probe.calls(), 1);
        assert!(h.trim.requests().is_empty());
        assert_eq!(h.notifier.phases(), vec![RunPhase::Probing, RunPhase::Aborted]);
    }

    #[tokio::test]
    async fn test_no_video_stream_is_probe_failure() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(MockProbeAdapter::without_video(40.0), MockTrimAdapter::new());

        let err = h
            .interactor
            .run(SplitRequest::new("/videos/podcast.mp4", temp.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ProbeFailed(ref m) if m.contains("No video stream")));
        assert!(h.trim.requests().is_empty());
    }

    #[tokio::test]
    async fn test_zero_duration_completes_without_jobs() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(MockProbeAdapter::with_duration(0.0), MockTrimAdapter::new());

        let result = h
            .interactor
            .run(SplitRequest::new("/videos/empty.mp4", temp.path()))
            .await
            .unwrap();

        assert_eq!(result.status, RunStatus::Succeeded);
        assert_eq!(result.segments_planned, 0);
        assert!(h.trim.requests().is_empty());
        assert_eq!(
            h.notifier.phases(),
            vec![RunPhase::Probing, RunPhase::Partitioning, RunPhase::Completed]
        );
        assert!(!temp.path().join("split-output").exists());
    }

    #[tokio::test]
    async fn test_dry_run_plans_without_trimming() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(MockProbeAdapter::with_duration(95.0), MockTrimAdapter::new());

        let result = h
            .interactor
            .run(SplitRequest::new("/videos/talk.mkv", temp.path()).with_dry_run(true))
            .await
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.planned.len(), 4);
        assert_eq!(result.segments_attempted, 0);
        assert!(h.trim.requests().is_empty());
        assert_eq!(
            result.planned[3].destination_path,
            temp.path().join("split-output").join("talk_4.mkv")
        );
    }

    #[tokio::test]
    async fn test_runaway_partition_is_validation_error() {
        let temp = tempfile::tempdir().unwrap();
        let h = harness(MockProbeAdapter::with_duration(3600.0), MockTrimAdapter::new());

        let err = h
            .interactor
            .run(
                SplitRequest::new("/videos/long.mp4", temp.path())
                    .with_chunk_size(ChunkSize::new(0.001).unwrap()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert_eq!(
            h.notifier.phases(),
            vec![RunPhase::Probing, RunPhase::Partitioning, RunPhase::Aborted]
        );
    }
}
