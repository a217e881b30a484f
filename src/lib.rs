//! SGX Historical Data Downloader - batch downloader for SGX derivatives history
//!
//! This library maps calendar dates onto the publisher's sequence indices and
//! downloads the daily tick and trade files they name.
//!
//! # Features
//!
//! - Date to sequence index mapping across the publisher's discontinuities
//! - Explicit date ranges or the last N published days
//! - Idempotent re-runs that skip files already on disk
//! - Retry pass for failed files
//! - Streaming transfers with per-read timeouts
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use sgx_hist_downloader::{download_batch, validate_config, AssumeAnswer, Config, HttpTransfer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let today = chrono::Local::now().date_naive();
//!     let job = validate_config(&config, today)?;
//!     let transfer = HttpTransfer::new(job.timeout, false)?;
//!
//!     let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;
//!     println!("{} files still failed", state.still_failed());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod sequence;
pub mod transfer;

// Re-exports for convenience
pub use config::{validate_config, Config, DataKind};
pub use download::{download_batch, AssumeAnswer, Confirm, DownloadJob, JobState};
pub use error::{Error, Result};
pub use sequence::{date_to_index, index_to_date, SequenceIndex};
pub use transfer::{HttpTransfer, Transfer};
