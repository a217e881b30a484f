//! Configuration module for the sgx-hist-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML or JSON files
//! - Data kind selection
//! - Validation into a download job

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, DownloadConfig, LoggingConfig, DEFAULT_BASE_URL};
pub use modes::DataKind;
pub use validation::{validate_config, MAX_LATEST_DAYS, MAX_RETRY_RANGE};
