//! The validated, immutable description of one download run.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::DataKind;
use crate::sequence::ResolvedRange;

/// Number of fixed structure files.
pub const STRUCTURE_FILE_COUNT: u32 = 2;

/// One download run, built from validated configuration.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Which files to fetch.
    pub kind: DataKind,

    /// Resolved date and index range. `None` only for structure-only jobs.
    pub range: Option<ResolvedRange>,

    /// Attempts per failed file during the retry pass.
    pub max_retry: u32,

    /// Directory the files are saved into.
    pub destination: PathBuf,

    /// Retry failed files without asking the operator.
    pub auto_retry: bool,

    /// Download link prefix, always ending with `/`.
    pub base_url: String,

    /// Timeout for connecting and for each body read.
    pub timeout: Duration,

    /// Base delay between retry attempts.
    pub retry_delay: Duration,
}

impl DownloadJob {
    /// Total number of files the job is expected to produce.
    pub fn expected_file_count(&self) -> u32 {
        if !self.kind.needs_range() {
            return STRUCTURE_FILE_COUNT;
        }

        let days = self.range.map(|r| r.indices.day_count()).unwrap_or(0);
        let mut total = days * self.kind.files_per_day();
        if self.kind.needs_structure() {
            total += STRUCTURE_FILE_COUNT;
        }
        total
    }
}
