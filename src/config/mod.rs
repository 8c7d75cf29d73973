use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{format::MonthLabelStyle, utils::app_data_dir};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_PROJECTION_HORIZON_MONTHS: u32 = 12;
pub const DEFAULT_MAX_OCCURRENCES: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Tunables for the projection and reporting services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Horizon used when a recurrence has neither an end date nor a window.
    #[serde(default = "EngineConfig::default_projection_horizon_months")]
    pub projection_horizon_months: u32,
    #[serde(default = "EngineConfig::default_max_occurrences")]
    pub max_occurrences: usize,
    #[serde(default)]
    pub month_label: MonthLabelStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_root: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            projection_horizon_months: Self::default_projection_horizon_months(),
            max_occurrences: Self::default_max_occurrences(),
            month_label: MonthLabelStyle::default(),
            ledger_root: None,
        }
    }
}

impl EngineConfig {
    fn default_projection_horizon_months() -> u32 {
        DEFAULT_PROJECTION_HORIZON_MONTHS
    }

    fn default_max_occurrences() -> usize {
        DEFAULT_MAX_OCCURRENCES
    }

    /// Directory read by the JSON ledger store, `<data dir>/ledgers` by default.
    pub fn resolve_ledger_root(&self) -> PathBuf {
        self.ledger_root
            .clone()
            .unwrap_or_else(|| app_data_dir().join("ledgers"))
    }
}

/// Loads and saves [`EngineConfig`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses `<data dir>/config/config.json`.
    pub fn new_default() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self::new(base.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(EngineConfig::default())
        }
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved engine config");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
