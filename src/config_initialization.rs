//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::adapters::toml_config::{TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::domain::errors::DomainError;
use crate::domain::model::{ChunkSize, FailurePolicy};
use crate::domain::rules::OUTPUT_FOLDER_NAME;
use crate::engine::EngineConfig;
use crate::error::SplitterError;
use crate::ports::{ConfigPort, LogLevel};

/// Environment variables and the config keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("VIDEO_SPLITTER_FFMPEG", "ffmpeg_path"),
    ("VIDEO_SPLITTER_FFPROBE", "ffprobe_path"),
    ("VIDEO_SPLITTER_CHUNK_DURATION", "chunk_duration"),
    ("VIDEO_SPLITTER_CONCURRENCY", "concurrency"),
    ("VIDEO_SPLITTER_FOLDER_NAME", "folder_name"),
    ("VIDEO_SPLITTER_LOG_LEVEL", "log_level"),
    ("VIDEO_SPLITTER_FAIL_FAST", "fail_fast"),
];

/// Fully resolved settings of one invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitterSettings {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub chunk_duration: ChunkSize,
    pub concurrency: usize,
    pub folder_name: String,
    #[serde(serialize_with = "serialize_level")]
    pub log_level: LogLevel,
    pub fail_fast: bool,
    #[serde(skip)]
    pub sources: SettingsSources,
}

/// Which layers contributed to the resolved settings.
///
/// Settings are resolved before the subscriber exists, so this is reported
/// through [`SplitterSettings::log_sources`] once logging is up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSources {
    pub config_file: Option<PathBuf>,
    pub env_overrides: Vec<&'static str>,
    pub cli_overrides: usize,
}

fn serialize_level<S: serde::Serializer>(level: &LogLevel, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(level.as_str())
}

impl SplitterSettings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(&self.ffmpeg_path, &self.ffprobe_path)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::CollectAll
        }
    }

    /// Report where the settings came from
    pub fn log_sources(&self) {
        match &self.sources.config_file {
            Some(path) => info!("Loaded configuration from {}", path.display()),
            None => debug!("No config file loaded"),
        }
        for variable in &self.sources.env_overrides {
            debug!("Found environment override: {}", variable);
        }
        if !self.sources.env_overrides.is_empty() {
            info!(
                "Applied {} environment variable overrides",
                self.sources.env_overrides.len()
            );
        }
        if self.sources.cli_overrides > 0 {
            debug!("Applied {} CLI configuration overrides", self.sources.cli_overrides);
        }
        debug!(settings = ?self, "Configuration resolved");
    }
}

/// Values given on the command line; `None` leaves the lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub chunk_duration: Option<ChunkSize>,
    pub concurrency: Option<usize>,
    pub log_level: Option<LogLevel>,
    pub fail_fast: Option<bool>,
}

/// Resolve settings following precedence: CLI > Env > File > Defaults
pub async fn resolve_settings(overrides: &SettingsOverrides) -> Result<SplitterSettings> {
    resolve_settings_with_env(overrides, |name| std::env::var(name).ok()).await
}

/// Same as [`resolve_settings`] with an explicit environment lookup
pub async fn resolve_settings_with_env<F>(overrides: &SettingsOverrides, env: F) -> Result<SplitterSettings>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1: defaults are loaded by the adapter itself
    let config = TomlConfigAdapter::new();

    // Step 2: config file
    load_config_file(&config, overrides.config_file.as_deref()).await?;

    // Step 3: environment variables
    let mut env_overrides = Vec::new();
    for &(variable, key) in ENV_MAPPINGS {
        if let Some(value) = env(variable) {
            config.set_config(key, &value).await.map_err(SplitterError::from)?;
            env_overrides.push(variable);
        }
    }

    config.validate_config().await.map_err(SplitterError::from)?;
    let mut settings = read_settings(&config).await.map_err(SplitterError::from)?;
    settings.sources.config_file = config.config_file_path();
    settings.sources.env_overrides = env_overrides;

    // Step 4: command line
    apply_cli_overrides(&mut settings, overrides);
    Ok(settings)
}

/// Load the explicit config file, or the default one when it exists
async fn load_config_file(config: &TomlConfigAdapter, explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => config
            .load_config(path)
            .await
            .map_err(SplitterError::from)
            .with_context(|| format!("Failed to load config file {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                config.load_config(default_path).await.map_err(SplitterError::from)?;
            }
            Ok(())
        }
    }
}

async fn read_settings(config: &TomlConfigAdapter) -> std::result::Result<SplitterSettings, DomainError> {
    let ffmpeg_path = config
        .get_config_or_default("ffmpeg_path", crate::engine::DEFAULT_FFMPEG)
        .await?;
    let ffprobe_path = config
        .get_config_or_default("ffprobe_path", crate::engine::DEFAULT_FFPROBE)
        .await?;
    let chunk_duration = match config.get_config("chunk_duration").await? {
        Some(value) => ChunkSize::parse(&value)?,
        None => ChunkSize::default(),
    };
    let concurrency = match config.get_config("concurrency").await? {
        Some(value) => value
            .parse::<usize>()
            .map_err(|e| DomainError::ConfigError(format!("Invalid concurrency value: {}", e)))?,
        None => num_cpus::get(),
    };
    let folder_name = config
        .get_config_or_default("folder_name", OUTPUT_FOLDER_NAME)
        .await?;
    let log_level = LogLevel::parse(&config.get_config_or_default("log_level", "info").await?)?;
    let fail_fast = config
        .get_config_or_default("fail_fast", "false")
        .await?
        .parse::<bool>()
        .unwrap_or(false);

    Ok(SplitterSettings {
        ffmpeg_path: PathBuf::from(ffmpeg_path),
        ffprobe_path: PathBuf::from(ffprobe_path),
        chunk_duration,
        concurrency: concurrency.max(1),
        folder_name,
        log_level,
        fail_fast,
        sources: SettingsSources::default(),
    })
}

fn apply_cli_overrides(settings: &mut SplitterSettings, overrides: &SettingsOverrides) {
    let mut cli_overrides = 0;

    if let Some(path) = &overrides.ffmpeg_path {
        settings.ffmpeg_path = path.clone();
        cli_overrides += 1;
    }
    if let Some(path) = &overrides.ffprobe_path {
        settings.ffprobe_path = path.clone();
        cli_overrides += 1;
    }
    if let Some(chunk) = overrides.chunk_duration {
        settings.chunk_duration = chunk;
        cli_overrides += 1;
    }
    if let Some(concurrency) = overrides.concurrency {
        settings.concurrency = concurrency.max(1);
        cli_overrides += 1;
    }
    if let Some(level) = overrides.log_level {
        settings.log_level = level;
        cli_overrides += 1;
    }
    if let Some(fail_fast) = overrides.fail_fast {
        settings.fail_fast = fail_fast;
        cli_overrides += 1;
    }

    settings.sources.cli_overrides = cli_overrides;
}
