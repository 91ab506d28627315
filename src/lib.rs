//! video-splitter library
//!
//! Splits a video into fixed-duration segments by delegating every cut to an
//! external media engine (ffmpeg/ffprobe) and running those cuts with a
//! bounded number in flight.
//!
//! The crate is laid out hexagonally: [`domain`] holds the pure model and
//! rules, [`ports`] the traits the engine and environment sit behind,
//! [`adapters`] their implementations, and [`app`] the scheduler and the run
//! orchestrator.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{BoundedScheduler, SplitInteractor, SplitRequest};
pub use domain::errors::DomainError;
pub use domain::model::{ChunkSize, FailurePolicy, MediaDuration, MediaInfo, RunResult, RunStatus};
pub use error::{SplitterError, SplitterResult};
