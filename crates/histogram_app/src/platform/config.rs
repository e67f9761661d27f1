use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use histogram_core::{DEFAULT_SOURCE_URL, DEFAULT_TOP_K};
use histogram_engine::{FetchSettings, DEFAULT_EXPORT_FILENAME};
use histogram_logging::hist_info;
use serde::Deserialize;

const DEFAULT_CONFIG_FILENAME: &str = "histogram.ron";

/// Settings read from the RON config file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source_url: String,
    pub top_k: usize,
    pub output_dir: PathBuf,
    pub export_filename: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
    pub log_file: PathBuf,
    pub log_to_terminal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            top_k: DEFAULT_TOP_K,
            output_dir: PathBuf::from("output"),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
            log_file: PathBuf::from("histogram.log"),
            log_to_terminal: false,
        }
    }
}

impl AppConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = ron::from_str(&raw)
            .with_context(|| format!("failed to parse RON from {}", path.display()))?;
        hist_info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }
}

/// First command-line argument, else `./histogram.ron`.
pub fn resolve_config_path(mut args: impl Iterator<Item = String>) -> PathBuf {
    args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}
