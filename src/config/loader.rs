//! Configuration structures and loading logic.

use crate::config::modes::DataKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Default download link prefix of the SGX derivatives historical data.
pub const DEFAULT_BASE_URL: &str = "https://links.sgx.com/1.0.0/derivatives-historical/";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Download job configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Which files to download.
    #[serde(default, alias = "type")]
    pub kind: Option<DataKind>,

    /// First date of the range (YYYY-MM-DD).
    #[serde(default)]
    pub start: Option<String>,

    /// Last date of the range (YYYY-MM-DD).
    #[serde(default)]
    pub end: Option<String>,

    /// Download the last N published days instead of a date range.
    #[serde(default)]
    pub latest_n: Option<u32>,

    /// Attempts per failed file during the retry pass.
    #[serde(default = "default_max_retry", deserialize_with = "max_retry_or_default")]
    pub max_retry: u32,

    /// Directory under which `parent_dir` is created.
    #[serde(default = "default_root_path", deserialize_with = "root_path_or_default")]
    pub root_path: PathBuf,

    /// Folder holding the downloaded files.
    #[serde(default = "default_parent_dir", deserialize_with = "parent_dir_or_default")]
    pub parent_dir: String,

    /// Retry failed files without asking.
    #[serde(default, deserialize_with = "null_as_false")]
    pub auto_retry: bool,

    /// Download link prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for connecting and for each body read.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Base delay between retry attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            kind: None,
            start: None,
            end: None,
            latest_n: None,
            max_retry: default_max_retry(),
            root_path: default_root_path(),
            parent_dir: default_parent_dir(),
            auto_retry: false,
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. "info", "sgx_hist_downloader=debug").
    #[serde(default)]
    pub level: Option<String>,
}

fn default_max_retry() -> u32 {
    3
}

fn default_root_path() -> PathBuf {
    PathBuf::from("./")
}

fn default_parent_dir() -> String {
    "histData".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

// Older JSON configs write `null`, `0` or `""` to mean "use the default".

fn max_retry_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?
        .filter(|n| *n != 0)
        .unwrap_or_else(default_max_retry))
}

fn root_path_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<PathBuf, D::Error> {
    Ok(Option::<PathBuf>::deserialize(deserializer)?
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(default_root_path))
}

fn parent_dir_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(default_parent_dir))
}

fn null_as_false<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Config {
    /// Load configuration from a TOML file, or JSON when the extension is `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config: Config = if is_json {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        Ok(config)
    }

    /// Get the effective destination directory.
    pub fn download_directory(&self) -> PathBuf {
        self.download.root_path.join(&self.download.parent_dir)
    }
}
