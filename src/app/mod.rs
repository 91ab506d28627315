// Application layer - Use case interactors

pub mod container;
pub mod scheduler;
pub mod segment_job;
pub mod split_interactor;

// Re-export interactors
pub use scheduler::{BoundedScheduler, JobOutcome, SchedulerReport};
pub use segment_job::{OutputDirectory, SegmentJobRunner};
pub use split_interactor::{SplitInteractor, SplitRequest};
