//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, DataKind};

/// SGX derivatives historical data downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "sgx-hist-downloader",
    version,
    about = "Download SGX derivatives historical tick and trade files",
    long_about = "A CLI tool to download the daily tick data and trade files published by SGX.\n\n\
                  Supports explicit date ranges, the last N published days, automatic retry of \
                  failed files and re-runs that skip files already on disk."
)]
pub struct Args {
    /// Path to configuration file (TOML, or JSON by extension).
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Which files to download.
    #[arg(short, long, value_enum)]
    pub kind: Option<DataKindArg>,

    /// First date of the range (YYYY-MM-DD).
    #[arg(short, long)]
    pub start: Option<String>,

    /// Last date of the range (YYYY-MM-DD).
    #[arg(short, long)]
    pub end: Option<String>,

    /// Download the last N published days ending yesterday.
    #[arg(short = 'n', long = "latest", conflicts_with_all = ["start", "end"])]
    pub latest: Option<u32>,

    /// Attempts per failed file during the retry pass (1-4).
    #[arg(long)]
    pub max_retry: Option<u32>,

    /// Directory under which the download folder is created.
    #[arg(long = "root")]
    pub root_path: Option<PathBuf>,

    /// Name of the download folder.
    #[arg(long = "dir")]
    pub parent_dir: Option<String>,

    /// Retry failed files without asking.
    #[arg(long)]
    pub auto_retry: bool,

    /// Download link prefix.
    #[arg(long, env = "SGX_BASE_URL")]
    pub base_url: Option<String>,

    /// Seconds to wait when connecting and for each read.
    #[arg(long = "timeout")]
    pub timeout_seconds: Option<u64>,

    /// Answer yes to every prompt.
    #[arg(long, short)]
    pub yes: bool,

    /// Hide transfer progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI data kind argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DataKindArg {
    /// Structure files plus tick and trade files.
    All,
    /// Tick and trade files.
    Both,
    /// Tick files only.
    Tick,
    /// Trade files only.
    #[value(alias = "tc")]
    Trade,
    /// Structure files only.
    #[value(alias = "ds")]
    Structure,
}

impl From<DataKindArg> for DataKind {
    fn from(arg: DataKindArg) -> Self {
        match arg {
            DataKindArg::All => DataKind::All,
            DataKindArg::Both => DataKind::Both,
            DataKindArg::Tick => DataKind::Tick,
            DataKindArg::Trade => DataKind::Trade,
            DataKindArg::Structure => DataKind::Structure,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        let download = &mut config.download;

        if let Some(kind) = self.kind {
            download.kind = Some(kind.into());
        }

        // A range on the command line replaces whichever range the file chose
        if let Some(n) = self.latest {
            download.latest_n = Some(n);
            download.start = None;
            download.end = None;
        }

        if self.start.is_some() || self.end.is_some() {
            download.latest_n = None;
        }

        if let Some(start) = &self.start {
            download.start = Some(start.clone());
        }

        if let Some(end) = &self.end {
            download.end = Some(end.clone());
        }

        if let Some(max_retry) = self.max_retry {
            download.max_retry = max_retry;
        }

        if let Some(root) = &self.root_path {
            download.root_path = root.clone();
        }

        if let Some(dir) = &self.parent_dir {
            download.parent_dir = dir.clone();
        }

        // Boolean flags (only override if set to non-default)
        if self.auto_retry {
            download.auto_retry = true;
        }

        if let Some(base_url) = &self.base_url {
            download.base_url = base_url.clone();
        }

        if let Some(timeout) = self.timeout_seconds {
            download.timeout_seconds = timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_arguments() {
        let args = Args::try_parse_from([
            "sgx-hist-downloader",
            "--kind",
            "tc",
            "--start",
            "2023-03-03",
            "--end",
            "2023-03-10",
            "--max-retry",
            "2",
            "--yes",
        ])
        .unwrap();

        assert!(matches!(args.kind, Some(DataKindArg::Trade)));
        assert_eq!(args.max_retry, Some(2));
        assert!(args.yes);
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_latest_conflicts_with_dates() {
        let result = Args::try_parse_from([
            "sgx-hist-downloader",
            "--latest",
            "5",
            "--start",
            "2023-03-03",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overrides_file_values() {
        let mut config = Config::default();
        config.download.start = Some("2023-01-02".into());
        config.download.end = Some("2023-01-06".into());
        config.download.parent_dir = "fromFile".into();

        let args = Args::try_parse_from([
            "sgx-hist-downloader",
            "-k",
            "both",
            "--latest",
            "10",
            "--auto-retry",
            "--timeout",
            "9",
        ])
        .unwrap();
        args.merge_into_config(&mut config);

        let download = &config.download;
        assert_eq!(download.kind, Some(DataKind::Both));
        assert_eq!(download.latest_n, Some(10));
        assert!(download.start.is_none());
        assert!(download.end.is_none());
        assert!(download.auto_retry);
        assert_eq!(download.timeout_seconds, 9);
        assert_eq!(download.parent_dir, "fromFile");
        assert_eq!(download.max_retry, 3);
    }

    #[test]
    fn test_dates_replace_latest_from_file() {
        let mut config = Config::default();
        config.download.latest_n = Some(20);

        let args = Args::try_parse_from([
            "sgx-hist-downloader",
            "--start",
            "2023-03-03",
            "--end",
            "2023-03-10",
        ])
        .unwrap();
        args.merge_into_config(&mut config);

        assert!(config.download.latest_n.is_none());
        assert_eq!(config.download.start.as_deref(), Some("2023-03-03"));
    }
}
