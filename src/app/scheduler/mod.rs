// Bounded scheduler - Runs jobs with a fixed number of concurrent slots

use std::future::Future;

use tokio::task::JoinSet;
use tracing::{debug, error, trace};

use crate::domain::model::{FailurePolicy, SegmentJob};

/// Anything the scheduler can start: it only needs a stable identifier
pub trait Job: Send + 'static {
    fn id(&self) -> u32;
}

impl Job for SegmentJob {
    fn id(&self) -> u32 {
        self.segment.index
    }
}

/// Settled result of one job
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome<T> {
    pub id: u32,
    pub result: Result<T, String>,
}

impl<T> JobOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything the scheduler observed while running a batch
#[derive(Debug, Clone)]
pub struct SchedulerReport<T> {
    /// One entry per started job, sorted by id
    pub outcomes: Vec<JobOutcome<T>>,
    /// Jobs never started because the fail-fast policy stopped scheduling
    pub skipped: Vec<u32>,
    /// Highest number of jobs held in the working set at once
    pub max_in_flight: usize,
    /// Effective slot count after clamping
    pub limit: usize,
}

impl<T> SchedulerReport<T> {
    pub fn started(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = (u32, &str)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Err(message) => Some((outcome.id, message.as_str())),
            Ok(_) => None,
        })
    }

    pub fn successes(&self) -> impl Iterator<Item = (u32, &T)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|value| (outcome.id, value)))
    }

    pub fn stopped_early(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Runs jobs with at most `limit` of them in flight.
///
/// Jobs start in the order given. The scheduler only waits when every slot is
/// taken, and then only for the first job to settle, whichever that is. Once
/// started, a job always runs to completion.
#[derive(Debug, Clone, Copy)]
pub struct BoundedScheduler {
    limit: usize,
    policy: FailurePolicy,
}

impl BoundedScheduler {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Slot count actually used for `job_count` jobs
    pub fn effective_limit(&self, job_count: usize) -> usize {
        self.limit.min(job_count.max(1))
    }

    /// Run `task` for every job and wait until all started jobs have settled.
    ///
    /// A job whose task panics is reported as failed with the panic message.
    pub async fn run_all<J, T, F, Fut>(&self, jobs: Vec<J>, task: F) -> SchedulerReport<T>
    where
        J: Job,
        T: Send + 'static,
        F: Fn(J) -> Fut,
        Fut: Future<Output = Result<T, String>> + Send + 'static,
    {
        let limit = self.effective_limit(jobs.len());
        let mut working_set: JoinSet<JobOutcome<T>> = JoinSet::new();
        let mut outcomes = Vec::with_capacity(jobs.len());
        let mut skipped = Vec::new();
        let mut max_in_flight = 0;
        let mut failed = false;

        debug!(jobs = jobs.len(), limit, policy = ?self.policy, "Scheduling jobs");

        let mut pending = jobs.into_iter();
        while let Some(job) = pending.next() {
            // Collect whatever already finished so fail-fast reacts promptly.
            while let Some(joined) = working_set.try_join_next() {
                failed |= Self::record(joined, &mut outcomes);
            }
            if working_set.len() >= limit {
                if let Some(joined) = working_set.join_next().await {
                    failed |= Self::record(joined, &mut outcomes);
                }
            }

            if failed && self.policy == FailurePolicy::FailFast {
                skipped.push(job.id());
                skipped.extend(pending.by_ref().map(|job| job.id()));
                debug!(skipped = skipped.len(), "Stopped scheduling after a failure");
                break;
            }

            let id = job.id();
            let work = task(job);
            working_set.spawn(async move {
                // The inner task isolates panics so the id survives them.
                let result = match tokio::spawn(work).await {
                    Ok(result) => result,
                    Err(e) if e.is_panic() => Err(format!("job panicked: {}", panic_message(e))),
                    Err(e) => Err(format!("job did not complete: {}", e)),
                };
                JobOutcome { id, result }
            });
            max_in_flight = max_in_flight.max(working_set.len());
            trace!(id, in_flight = working_set.len(), "Job started");
        }

        while let Some(joined) = working_set.join_next().await {
            Self::record(joined, &mut outcomes);
        }

        outcomes.sort_by_key(|outcome| outcome.id);
        SchedulerReport {
            outcomes,
            skipped,
            max_in_flight,
            limit,
        }
    }

    /// Store a joined outcome; returns whether it was a failure
    fn record<T>(
        joined: Result<JobOutcome<T>, tokio::task::JoinError>,
        outcomes: &mut Vec<JobOutcome<T>>,
    ) -> bool {
        match joined {
            Ok(outcome) => {
                let failed = !outcome.is_success();
                trace!(id = outcome.id, failed, "Job settled");
                outcomes.push(outcome);
                failed
            }
            Err(e) => {
                // Only reachable if the runtime shuts down underneath us.
                error!("Scheduler slot lost: {}", e);
                true
            }
        }
    }
}

fn panic_message(error: tokio::task::JoinError) -> String {
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
