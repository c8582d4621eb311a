//! Pipeline configuration. Window lengths and the unusual-volume quantile are fixed
//! constants of the feature engines and deliberately not configurable here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the processed insider trading CSV files
    pub data_dir: PathBuf,
    /// Record normalization parameters
    pub normalize: NormalizeConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// chrono format strings tried in order for date-only values
    pub date_formats: Vec<String>,
    /// chrono format strings tried in order for date-time values (time is dropped)
    pub datetime_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/processed"),
            normalize: NormalizeConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%Y/%m/%d".to_string(),
                "%b %d, %Y".to_string(),
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%m/%d/%Y %H:%M:%S".to_string(),
            ],
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<PipelineConfig>(&data) {
                    Ok(c) => return c,
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "invalid config; using defaults"),
                },
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "unreadable config; using defaults"),
            }
        }
        Self::default()
    }
}
