use crate::error::{BackupError, ErrorContext, Result};
use crate::format::BackupFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Format assumed when neither the caller nor the file name names one
pub const DEFAULT_FALLBACK_FORMAT: BackupFormat = BackupFormat::Mihon;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ToolConfig {
    #[serde(rename = "defaultFormat")]
    pub default_format: Option<String>,
    #[serde(rename = "logLevel")]
    pub log_level: Option<String>,
    #[serde(rename = "logFile")]
    pub log_file: Option<PathBuf>,
    #[serde(rename = "outputDir")]
    pub output_dir: Option<PathBuf>,
}

impl ToolConfig {
    /// Format used for files whose name does not reveal one
    pub fn fallback_format(&self) -> Result<BackupFormat> {
        match &self.default_format {
            Some(name) => name.parse().map_err(|_| {
                BackupError::Config(format!("defaultFormat {:?} is not a known format", name))
            }),
            None => Ok(DEFAULT_FALLBACK_FORMAT),
        }
    }

    /// Place a generated file name in `outputDir`, or the working directory
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(home_dir) = dirs::home_dir() {
        Ok(home_dir.join(".tachibk"))
    } else {
        Err(BackupError::Config("Could not find home directory".to_string()))
    }
}

pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.json"))
}

/// Load `~/.tachibk/config.json`; a missing file yields the defaults
pub fn load_config() -> Result<ToolConfig> {
    load_config_from(&get_config_file_path()?)
}

pub fn load_config_from(config_file: &Path) -> Result<ToolConfig> {
    if !config_file.exists() {
        tracing::debug!(path = %config_file.display(), "No config file, using defaults");
        return Ok(ToolConfig::default());
    }

    let content = fs::read_to_string(config_file)
        .context(&format!("Failed to read config {}", config_file.display()))?;
    serde_json::from_str(&content).map_err(|e| {
        BackupError::Config(format!("Invalid config {}: {}", config_file.display(), e))
    })
}
