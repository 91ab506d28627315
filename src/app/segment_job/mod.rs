// Segment job runner - Executes one trim task through the ports

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Output directory shared by every job of a run.
///
/// The first job that needs it creates it; later jobs wait for that attempt
/// and reuse its result, so the directory is created at most once per run.
pub struct OutputDirectory {
    path: PathBuf,
    ready: OnceCell<()>,
}

impl OutputDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ready: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Create the directory unless an earlier call already did
    pub async fn ensure(&self, fs: &dyn FsPort) -> Result<(), DomainError> {
        self.ready
            .get_or_try_init(|| async {
                if !fs.directory_exists(&self.path).await? {
                    debug!("Creating output directory {}", self.path.display());
                    fs.create_directory(&self.path).await?;
                }
                Ok::<(), DomainError>(())
            })
            .await
            .map(|_| ())
    }
}

/// Runs a single [`SegmentJob`]: prepares the destination, then trims
#[derive(Clone)]
pub struct SegmentJobRunner {
    trim_port: Arc<dyn TrimPort>,
    fs_port: Arc<dyn FsPort>,
    output_dir: Arc<OutputDirectory>,
}

impl SegmentJobRunner {
    pub fn new(
        trim_port: Arc<dyn TrimPort>,
        fs_port: Arc<dyn FsPort>,
        output_dir: Arc<OutputDirectory>,
    ) -> Self {
        Self {
            trim_port,
            fs_port,
            output_dir,
        }
    }

    /// Produce the job's output file. No retry: the first error is final and
    /// carries the engine's message unchanged.
    #[instrument(skip(self, job), fields(index = job.index()))]
    pub async fn execute(&self, job: &SegmentJob) -> Result<PathBuf, SegmentFailure> {
        let failure = |e: DomainError| SegmentFailure {
            index: job.index(),
            message: e.detail(),
        };

        self.output_dir.ensure(self.fs_port.as_ref()).await.map_err(failure)?;

        let request = job.trim_request();
        debug!(
            start = request.start,
            duration = request.duration,
            "Trimming into {}",
            request.destination.display()
        );
        self.trim_port.trim(&request).await.map_err(failure)?;

        Ok(job.destination_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockTrimAdapter;
    use crate::adapters::FsLocalAdapter;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts directory creations on top of the local file system
    #[derive(Default)]
    struct CountingFs {
        inner: FsLocalAdapter,
        created: AtomicUsize,
    }

    #[async_trait]
    impl FsPort for CountingFs {
        async fn directory_exists(&self, path: &Path) -> Result<bool, DomainError> {
            self.inner.directory_exists(path).await
        }

        async fn create_directory(&self, path: &Path) -> Result<(), DomainError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            self.inner.create_directory(path).await
        }
    }

    fn job(index: u32, start: f64, dir: &Path) -> SegmentJob {
        SegmentJob {
            segment: Segment {
                index,
                start,
                length: ChunkSize::new(30.0).unwrap(),
            },
            source_path: PathBuf::from("/videos/clip.mp4"),
            destination_path: dir.join(format!("clip_{}.mp4", index)),
        }
    }

    #[tokio::test]
    async fn test_output_directory_created_once() {
        let temp = tempfile::tempdir().unwrap();
        let dir = Arc::new(OutputDirectory::new(temp.path().join("split-output")));
        let fs = Arc::new(CountingFs::default());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let dir = Arc::clone(&dir);
            let fs = Arc::clone(&fs);
            handles.push(tokio::spawn(async move { dir.ensure(fs.as_ref()).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(dir.is_ready());
        assert!(dir.path().is_dir());
        assert_eq!(fs.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_directory_is_not_recreated() {
        let temp = tempfile::tempdir().unwrap();
        let dir = OutputDirectory::new(temp.path());
        let fs = CountingFs::default();

        dir.ensure(&fs).await.unwrap();
        assert_eq!(fs.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_returns_destination() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("split-output");
        let trim = Arc::new(MockTrimAdapter::new().writing_files());
        let runner = SegmentJobRunner::new(
            trim.clone(),
            Arc::new(FsLocalAdapter::new()),
            Arc::new(OutputDirectory::new(&out)),
        );

        let path = runner.execute(&job(2, 30.0, &out)).await.unwrap();

        assert_eq!(path, out.join("clip_2.mp4"));
        assert!(path.is_file());
        let requests = trim.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].start, 30.0);
        assert_eq!(requests[0].duration, 30.0);
    }

    #[tokio::test]
    async fn test_execute_reports_engine_message_verbatim() {
        let temp = tempfile::tempdir().unwrap();
        let trim = Arc::new(MockTrimAdapter::new().failing_at(60.0, "Invalid data found when processing input"));
        let runner = SegmentJobRunner::new(
            trim,
            Arc::new(FsLocalAdapter::new()),
            Arc::new(OutputDirectory::new(temp.path())),
        );

        let failure = runner.execute(&job(3, 60.0, temp.path())).await.unwrap_err();
        assert_eq!(
            failure,
            SegmentFailure {
                index: 3,
                message: "Invalid data found when processing input".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_directory_failure_is_segment_failure() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let trim = Arc::new(MockTrimAdapter::new());
        let runner = SegmentJobRunner::new(
            trim.clone(),
            Arc::new(FsLocalAdapter::new()),
            Arc::new(OutputDirectory::new(blocker.join("out"))),
        );

        let failure = runner.execute(&job(1, 0.0, &blocker)).await.unwrap_err();
        assert_eq!(failure.index, 1);
        assert!(trim.requests().is_empty());
    }
}
