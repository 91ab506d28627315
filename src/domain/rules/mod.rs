// Domain rules - Business logic and policies

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Name of the subdirectory used when outputs are grouped in a folder
pub const OUTPUT_FOLDER_NAME: &str = "split-output";

/// Upper bound on the number of segments a single run may plan
pub const MAX_SEGMENTS: usize = 100_000;

/// Offsets within this many machine epsilons of the end, relative to the
/// total duration, are rounding noise and do not start a segment
pub const START_NOISE_EPSILONS: f64 = 4.0;

/// Containers the splitter accepts as input
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv"];

/// Turns a total duration and a chunk size into segment start offsets
pub struct DurationPartitioner;

impl DurationPartitioner {
    /// Start offsets `0, chunk, 2*chunk, ...` strictly below `total`.
    ///
    /// Offsets are computed as `k * chunk` rather than by repeated addition so
    /// that segment `i` always starts at exactly `(i - 1) * chunk`. A start that
    /// misses the end only by rounding error (see [`START_NOISE_EPSILONS`]) is
    /// not a segment; anything further below the end is.
    pub fn partition(total: MediaDuration, chunk: ChunkSize) -> Vec<f64> {
        let count = Self::segment_count(total, chunk).min(MAX_SEGMENTS + 1);
        (0..count).map(|k| k as f64 * chunk.seconds()).collect()
    }

    /// Number of segments `partition` produces, without allocating.
    /// Saturates at `usize::MAX` for partitions far above [`MAX_SEGMENTS`].
    pub fn segment_count(total: MediaDuration, chunk: ChunkSize) -> usize {
        if total.is_zero() {
            return 0;
        }
        let total = total.seconds();
        let chunk = chunk.seconds();
        let estimate = (total / chunk).ceil();
        if estimate > (MAX_SEGMENTS * 2) as f64 {
            return usize::MAX;
        }

        let end = total - total * START_NOISE_EPSILONS * f64::EPSILON;
        let starts_segment = |k: usize| k == 0 || (k as f64) * chunk < end;
        let mut count = (estimate as usize).max(1);
        while count > 1 && !starts_segment(count - 1) {
            count -= 1;
        }
        while starts_segment(count) {
            count += 1;
        }
        count
    }

    /// Indexed segments covering `[0, total)`
    pub fn segments(total: MediaDuration, chunk: ChunkSize) -> Result<Vec<Segment>, DomainError> {
        let count = Self::segment_count(total, chunk);
        if count > MAX_SEGMENTS {
            return Err(DomainError::ValidationFailed(format!(
                "Chunk size {} would produce more than {} segments for a {} source",
                chunk, MAX_SEGMENTS, total
            )));
        }

        Ok(Self::partition(total, chunk)
            .into_iter()
            .enumerate()
            .map(|(i, start)| Segment {
                index: i as u32 + 1,
                start,
                length: chunk,
            })
            .collect())
    }
}

/// Output file naming policy: `<stem>_<index><extension>`
pub struct OutputNaming;

impl OutputNaming {
    /// File name for segment `index` of `source`. The extension keeps its
    /// original case; a source without one yields a name without one.
    pub fn file_name(source: &Path, index: u32) -> Result<String, DomainError> {
        let stem = source
            .file_stem()
            .ok_or_else(|| DomainError::BadArgs(format!("Invalid source path: {}", source.display())))?
            .to_string_lossy();
        let extension = source
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        Ok(format!("{}_{}{}", stem, index, extension))
    }

    /// Directory the segments are written to: the root itself, or a named
    /// subfolder of it when outputs are grouped
    pub fn output_dir(destination_root: &Path, folder: Option<&str>) -> PathBuf {
        match folder {
            Some(name) => destination_root.join(name),
            None => destination_root.to_path_buf(),
        }
    }
}

/// Builds one job per segment
pub struct JobPlanner;

impl JobPlanner {
    pub fn plan(
        source: &Path,
        output_dir: &Path,
        segments: &[Segment],
    ) -> Result<Vec<SegmentJob>, DomainError> {
        segments
            .iter()
            .map(|segment| {
                Ok(SegmentJob {
                    segment: *segment,
                    source_path: source.to_path_buf(),
                    destination_path: output_dir.join(OutputNaming::file_name(source, segment.index)?),
                })
            })
            .collect()
    }
}

/// Input checks performed before any media engine work
pub struct SourceValidator;

impl SourceValidator {
    /// Whether the path carries a recognised video container extension
    pub fn is_video_file(path: &Path) -> bool {
        extension_of(path)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    pub fn validate_source(path: &Path) -> Result<(), DomainError> {
        let message = format!(
            "Please provide a valid video file path ({}): {}",
            SUPPORTED_EXTENSIONS.join(", "),
            path.display()
        );
        if path.as_os_str().is_empty() || !path.is_file() {
            return Err(DomainError::FileNotFound(message));
        }
        if !Self::is_video_file(path) {
            return Err(DomainError::InvalidFormat(message));
        }
        Ok(())
    }

    pub fn validate_destination(path: &Path) -> Result<(), DomainError> {
        if !path.is_dir() {
            return Err(DomainError::ValidationFailed(format!(
                "Please provide a valid output folder path: {}",
                path.display()
            )));
        }
        Ok(())
    }
}
