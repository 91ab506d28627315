// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::domain::model::ChunkSize;
use crate::domain::rules::OUTPUT_FOLDER_NAME;
use crate::ports::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Table holding the splitter's keys in a config file
pub const CONFIG_SECTION: &str = "video-splitter";

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "video-splitter.toml";

/// Keys the splitter understands
pub const CONFIG_KEYS: &[&str] = &[
    "ffmpeg_path",
    "ffprobe_path",
    "chunk_duration",
    "concurrency",
    "folder_name",
    "log_level",
    "fail_fast",
];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<HashMap<String, String>>>,
    config_file_path: Arc<RwLock<Option<PathBuf>>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the default values
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(Self::defaults())),
            config_file_path: Arc::new(RwLock::new(None)),
        }
    }

    fn defaults() -> HashMap<String, String> {
        let mut config = HashMap::new();
        config.insert("ffmpeg_path".to_string(), crate::engine::DEFAULT_FFMPEG.to_string());
        config.insert("ffprobe_path".to_string(), crate::engine::DEFAULT_FFPROBE.to_string());
        config.insert("chunk_duration".to_string(), ChunkSize::DEFAULT_SECONDS.to_string());
        config.insert("concurrency".to_string(), num_cpus::get().to_string());
        config.insert("folder_name".to_string(), OUTPUT_FOLDER_NAME.to_string());
        config.insert("log_level".to_string(), "info".to_string());
        config.insert("fail_fast".to_string(), "false".to_string());
        config
    }

    /// Path of the last file loaded, if any
    pub fn config_file_path(&self) -> Option<PathBuf> {
        self.config_file_path
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.config.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.config.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Merge the `[video-splitter]` table of a TOML document into the map.
    /// Values may be strings, integers, floats or booleans.
    pub fn merge_toml(&self, toml_content: &str) -> Result<(), DomainError> {
        let parsed: toml::Value = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigError(format!("Failed to parse TOML config: {}", e)))?;

        let Some(section) = parsed.get(CONFIG_SECTION) else {
            return Ok(());
        };
        let table = section.as_table().ok_or_else(|| {
            DomainError::ConfigError(format!("[{}] must be a table", CONFIG_SECTION))
        })?;

        let mut config = self.write();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    return Err(DomainError::ConfigError(format!(
                        "Unsupported value for {}: {}",
                        key, other
                    )))
                }
            };
            config.insert(key.clone(), value);
        }

        Ok(())
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read().get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError> {
        Ok(self
            .read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError> {
        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            DomainError::ConfigError(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        self.merge_toml(&content)?;
        *self
            .config_file_path
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(file_path.to_path_buf());
        Ok(())
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.read();

        for key in config.keys() {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                return Err(DomainError::ConfigError(format!(
                    "Unknown configuration key: {}",
                    key
                )));
            }
        }

        if let Some(log_level) = config.get("log_level") {
            LogLevel::parse(log_level).map_err(|e| DomainError::ConfigError(e.detail()))?;
        }

        if let Some(chunk) = config.get("chunk_duration") {
            ChunkSize::parse(chunk).map_err(|e| {
                DomainError::ConfigError(format!("Invalid chunk_duration: {}", e.detail()))
            })?;
        }

        if let Some(concurrency) = config.get("concurrency") {
            let value: usize = concurrency.parse().map_err(|e| {
                DomainError::ConfigError(format!("Invalid concurrency value: {}", e))
            })?;
            if value == 0 {
                return Err(DomainError::ConfigError(
                    "concurrency must be at least 1".to_string(),
                ));
            }
        }

        if let Some(fail_fast) = config.get("fail_fast") {
            fail_fast.parse::<bool>().map_err(|e| {
                DomainError::ConfigError(format!("Invalid boolean value for fail_fast: {}", e))
            })?;
        }

        if let Some(folder) = config.get("folder_name") {
            if folder.is_empty() || folder == "." || folder == ".." || folder.contains(['/', '\\']) {
                return Err(DomainError::ConfigError(format!(
                    "folder_name must be a plain directory name: {:?}",
                    folder
                )));
            }
        }

        Ok(())
    }
}
