// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod mock;
pub mod probe_ffprobe;
#[cfg(feature = "libav")]
pub mod probe_libav;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::FsLocalAdapter;
pub use mock::{MockProbeAdapter, MockTrimAdapter, RecordingNotifier};
pub use probe_ffprobe::FFprobeAdapter;
#[cfg(feature = "libav")]
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingNotifier;
