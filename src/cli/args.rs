//! Command-line argument parsing helpers

use std::path::{Path, PathBuf};

use crate::config_initialization::SettingsOverrides;
use crate::domain::errors::DomainError;
use crate::domain::model::ChunkSize;
use crate::domain::rules::SourceValidator;
use crate::ports::LogLevel;
use crate::utils::logging::LogFormat;

use super::Cli;

/// Upper bound accepted by `--concurrency`
pub const MAX_CONCURRENCY: usize = 256;

/// Value parser for `--concurrency`
pub fn parse_concurrency(value: &str) -> Result<usize, String> {
    clap_num::number_range(value, 1, MAX_CONCURRENCY)
}

/// Arguments after validation, before configuration is merged in
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs {
    pub source: PathBuf,
    pub chunk_size: Option<ChunkSize>,
    pub destination_root: PathBuf,
}

impl Cli {
    /// Check the inputs in the order a user fixes them: video, duration, output
    pub fn validate(&self, cwd: &Path) -> Result<ValidatedArgs, DomainError> {
        let source = self.video.clone().ok_or_else(|| {
            DomainError::ValidationFailed(
                "Please provide a valid video file path, or try --help".to_string(),
            )
        })?;
        SourceValidator::validate_source(&source)?;

        let chunk_size = self.duration.as_deref().map(ChunkSize::parse).transpose()?;

        let destination_root = self.output.clone().unwrap_or_else(|| cwd.to_path_buf());
        SourceValidator::validate_destination(&destination_root)?;

        Ok(ValidatedArgs {
            source,
            chunk_size,
            destination_root,
        })
    }

    pub fn log_format(&self) -> Result<LogFormat, DomainError> {
        LogFormat::parse(&self.log_format)
    }

    /// Command-line layer of the configuration hierarchy
    pub fn settings_overrides(&self, validated: &ValidatedArgs) -> Result<SettingsOverrides, DomainError> {
        Ok(SettingsOverrides {
            config_file: self.config.clone(),
            ffmpeg_path: self.ffmpeg.clone(),
            ffprobe_path: self.ffprobe.clone(),
            chunk_duration: validated.chunk_size,
            concurrency: self.concurrency,
            log_level: self.log_level.as_deref().map(LogLevel::parse).transpose()?,
            fail_fast: self.fail_fast_override(),
        })
    }

    /// `Some` only when one of `--fail-fast` / `--no-fail-fast` was given
    fn fail_fast_override(&self) -> Option<bool> {
        match (self.fail_fast, self.no_fail_fast) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}
