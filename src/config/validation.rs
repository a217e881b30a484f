//! Configuration validation logic.
//!
//! Turns a loaded [`Config`] into a [`DownloadJob`]. Everything here runs
//! before any network activity; any error aborts the run.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use url::Url;

use crate::config::loader::{Config, DownloadConfig};
use crate::config::modes::DataKind;
use crate::download::DownloadJob;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, sanitize_filename};
use crate::sequence::{base_date, ResolvedRange};

/// Exclusive upper bound for `latest_n`.
pub const MAX_LATEST_DAYS: u32 = 1000;

/// Allowed values for `max_retry`.
pub const MAX_RETRY_RANGE: RangeInclusive<u32> = 1..=4;

/// Date format of `start` and `end`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate the entire configuration and build the download job.
///
/// `today` bounds the date range: the most recent downloadable day is
/// yesterday. The destination directory is created only once every other
/// setting has been accepted.
pub fn validate_config(config: &Config, today: NaiveDate) -> Result<DownloadJob> {
    tracing::info!("Checking download configuration...");
    let download = &config.download;

    let kind = download
        .kind
        .ok_or_else(|| Error::MissingConfig("kind (all, both, tick, trade or structure)".into()))?;
    let range = resolve_range(download, kind, today)?;
    validate_max_retry(download.max_retry)?;
    let base_url = validate_base_url(&download.base_url)?;
    validate_timeout(download.timeout_seconds)?;
    let destination = prepare_destination(&download.root_path, &download.parent_dir)?;

    Ok(DownloadJob {
        kind,
        range,
        max_retry: download.max_retry,
        destination,
        auto_retry: download.auto_retry,
        base_url,
        timeout: Duration::from_secs(download.timeout_seconds),
        retry_delay: Duration::from_millis(download.retry_delay_ms),
    })
}

/// Resolve either `latest_n` or `start`/`end` into a range.
pub fn resolve_range(
    download: &DownloadConfig,
    kind: DataKind,
    today: NaiveDate,
) -> Result<Option<ResolvedRange>> {
    let has_dates = download.start.is_some() || download.end.is_some();

    match (download.latest_n, &download.start, &download.end) {
        (Some(_), _, _) if has_dates => Err(Error::invalid(
            "latest_n",
            "latest_n cannot be combined with start/end, specify only one of them",
        )),
        (Some(n), None, None) => {
            if n == 0 || n >= MAX_LATEST_DAYS {
                return Err(Error::invalid(
                    "latest_n",
                    format!("must be within [1, {}) (got {})", MAX_LATEST_DAYS, n),
                ));
            }
            let yesterday = yesterday(today)?;
            ResolvedRange::latest(n, yesterday)
                .map(Some)
                .map_err(|e| Error::invalid("latest_n", e.to_string()))
        }
        (None, Some(start), Some(end)) => {
            let start = parse_date("start", start)?;
            let end = parse_date("end", end)?;
            validate_dates(start, end, today)?;
            ResolvedRange::between(start, end)
                .map(Some)
                .map_err(|e| Error::invalid("start", e.to_string()))
        }
        (None, None, None) if !kind.needs_range() => Ok(None),
        _ => Err(Error::MissingConfig(
            "time range incomplete, specify latest_n or both start and end".into(),
        )),
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        Error::invalid(
            field,
            format!("'{}' is not a valid YYYY-MM-DD date ({})", value, e),
        )
    })
}

/// Check an explicit date range against the supported window.
pub fn validate_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::invalid(
            "start",
            format!("start date {} is later than end date {}", start, end),
        ));
    }

    if start < base_date() {
        return Err(Error::invalid(
            "start",
            format!(
                "start date should be on or after {}",
                base_date().format(DATE_FORMAT)
            ),
        ));
    }

    if end >= today {
        return Err(Error::invalid(
            "end",
            format!(
                "end date should be earlier than today ({})",
                today.format(DATE_FORMAT)
            ),
        ));
    }

    Ok(())
}

/// Validate the retry count.
pub fn validate_max_retry(max_retry: u32) -> Result<()> {
    if !MAX_RETRY_RANGE.contains(&max_retry) {
        return Err(Error::invalid(
            "max_retry",
            format!(
                "must be within [{}, {}] (got {})",
                MAX_RETRY_RANGE.start(),
                MAX_RETRY_RANGE.end(),
                max_retry
            ),
        ));
    }
    Ok(())
}

/// Validate the download link prefix and normalize its trailing slash.
pub fn validate_base_url(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url.trim())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid(
            "base_url",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    let mut normalized = url.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

/// Validate the per-request timeout.
pub fn validate_timeout(timeout_seconds: u64) -> Result<()> {
    if timeout_seconds == 0 {
        return Err(Error::invalid(
            "timeout_seconds",
            "must be at least 1 second",
        ));
    }
    Ok(())
}

/// Check the root path and create `parent_dir` below it if needed.
pub fn prepare_destination(root_path: &Path, parent_dir: &str) -> Result<PathBuf> {
    if !root_path.is_dir() {
        return Err(Error::invalid(
            "root_path",
            format!("{} does not exist", root_path.display()),
        ));
    }

    let parent_dir = sanitize_filename(parent_dir.trim())
        .map_err(|e| Error::invalid("parent_dir", e.to_string()))?;
    let destination = root_path.join(&parent_dir);

    if !destination.exists() {
        ensure_dir(&destination).map_err(|e| {
            Error::invalid(
                "parent_dir",
                format!("cannot create {}: {}", destination.display(), e),
            )
        })?;
        tracing::info!(
            "Created new directory `{}` under {}",
            parent_dir,
            root_path.display()
        );
    }

    if !destination.is_dir() {
        return Err(Error::invalid(
            "parent_dir",
            format!("{} exists but is not a directory", destination.display()),
        ));
    }

    Ok(destination)
}

fn yesterday(today: NaiveDate) -> Result<NaiveDate> {
    today
        .pred_opt()
        .ok_or_else(|| Error::Config(format!("no day precedes {}", today)))
}
