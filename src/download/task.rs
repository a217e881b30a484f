//! File tasks: one URL and the local filename it is expected to produce.

use std::fmt;

use chrono::NaiveDate;

use crate::download::job::DownloadJob;
use crate::error::{Error, Result};
use crate::fs::inject_date_into_filename;
use crate::sequence::{index_to_date, SequenceIndex};

/// Kinds of files the publisher serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Daily tick data archive.
    Tick,
    /// Daily trade (TC) file.
    Trade,
    /// Fixed description of the tick file layout.
    TickStructure,
    /// Fixed description of the trade file layout.
    TradeStructure,
}

impl FileKind {
    /// Filename the publisher serves under each index.
    pub fn remote_name(self) -> &'static str {
        match self {
            FileKind::Tick => "WEBPXTICK_DT.zip",
            FileKind::Trade => "TC.txt",
            FileKind::TickStructure => "TickData_structure.dat",
            FileKind::TradeStructure => "TC_structure.dat",
        }
    }

    /// Index a structure file is published under.
    pub fn structure_index(self) -> Option<SequenceIndex> {
        match self {
            FileKind::TickStructure => Some(SequenceIndex::new(4182)),
            FileKind::TradeStructure => Some(SequenceIndex::new(4433)),
            FileKind::Tick | FileKind::Trade => None,
        }
    }

    /// Separator placed before the date in saved daily filenames.
    fn date_separator(self) -> Option<char> {
        match self {
            FileKind::Tick => Some('-'),
            FileKind::Trade => Some('_'),
            FileKind::TickStructure | FileKind::TradeStructure => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Tick => write!(f, "tick"),
            FileKind::Trade => write!(f, "trade"),
            FileKind::TickStructure => write!(f, "tick structure"),
            FileKind::TradeStructure => write!(f, "trade structure"),
        }
    }
}

/// One file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub kind: FileKind,
    pub index: SequenceIndex,
    /// Publication date, for daily files.
    pub date: Option<NaiveDate>,
    pub url: String,
    /// Name the saved file is expected to have.
    pub expected_name: String,
}

impl FileTask {
    /// Task for a daily tick or trade file.
    ///
    /// Refuses the hole index; asking for it is a logic error upstream.
    pub fn daily(base_url: &str, index: SequenceIndex, kind: FileKind) -> Result<Self> {
        if index.is_hole() {
            tracing::error!(
                "Refusing to build a {} task for unpublished index {}",
                kind,
                index
            );
            return Err(Error::SequenceHole(index.get()));
        }

        let separator = kind.date_separator().ok_or_else(|| {
            Error::Download(format!("{} files are not published per day", kind))
        })?;
        let date = index_to_date(index)?;

        Ok(Self {
            kind,
            index,
            date: Some(date),
            url: task_url(base_url, index, kind),
            expected_name: inject_date_into_filename(kind.remote_name(), separator, date),
        })
    }

    /// Task for one of the fixed structure files.
    pub fn structure(base_url: &str, kind: FileKind) -> Result<Self> {
        let index = kind.structure_index().ok_or_else(|| {
            Error::Download(format!("{} files are not structure files", kind))
        })?;

        Ok(Self {
            kind,
            index,
            date: None,
            url: task_url(base_url, index, kind),
            expected_name: kind.remote_name().to_string(),
        })
    }
}

fn task_url(base_url: &str, index: SequenceIndex, kind: FileKind) -> String {
    format!("{}{}/{}", base_url, index, kind.remote_name())
}

/// Every task of a job, in execution order.
///
/// Structure files come first (trade layout, then tick layout), followed by
/// each published day in ascending order with its tick file before its trade
/// file.
pub fn plan_tasks(job: &DownloadJob) -> Vec<FileTask> {
    let mut tasks = Vec::with_capacity(job.expected_file_count() as usize);

    if job.kind.needs_structure() {
        for kind in [FileKind::TradeStructure, FileKind::TickStructure] {
            match FileTask::structure(&job.base_url, kind) {
                Ok(task) => tasks.push(task),
                Err(e) => tracing::error!("Skipping {} file: {}", kind, e),
            }
        }
    }

    if !job.kind.needs_range() {
        return tasks;
    }

    let mut daily_kinds = Vec::with_capacity(2);
    if job.kind.needs_tick() {
        daily_kinds.push(FileKind::Tick);
    }
    if job.kind.needs_trade() {
        daily_kinds.push(FileKind::Trade);
    }

    if let Some(range) = job.range {
        for index in range.indices.published() {
            for &kind in &daily_kinds {
                match FileTask::daily(&job.base_url, index, kind) {
                    Ok(task) => tasks.push(task),
                    Err(e) => tracing::error!("Skipping {} file of index {}: {}", kind, index, e),
                }
            }
        }
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataKind;
    use crate::download::job::test_support::job;
    use crate::sequence::HOLE_INDEX;
    use std::path::PathBuf;

    const BASE: &str = "https://links.sgx.com/1.0.0/derivatives-historical/";

    #[test]
    fn test_daily_tick_task() {
        let task = FileTask::daily(BASE, SequenceIndex::new(5368), FileKind::Tick).unwrap();
        assert_eq!(
            task.url,
            "https://links.sgx.com/1.0.0/derivatives-historical/5368/WEBPXTICK_DT.zip"
        );
        assert_eq!(task.expected_name, "WEBPXTICK_DT-20230303.zip");
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2023, 3, 3));
    }

    #[test]
    fn test_daily_trade_task() {
        let task = FileTask::daily(BASE, SequenceIndex::new(4768), FileKind::Trade).unwrap();
        assert_eq!(task.url, format!("{}4768/TC.txt", BASE));
        assert_eq!(task.expected_name, "TC_20201113.txt");
    }

    #[test]
    fn test_hole_task_refused() {
        let err = FileTask::daily(BASE, SequenceIndex::new(HOLE_INDEX), FileKind::Tick);
        assert!(matches!(err, Err(Error::SequenceHole(HOLE_INDEX))));
    }

    #[test]
    fn test_structure_tasks() {
        let tick = FileTask::structure(BASE, FileKind::TickStructure).unwrap();
        assert_eq!(tick.url, format!("{}4182/TickData_structure.dat", BASE));
        assert_eq!(tick.expected_name, "TickData_structure.dat");

        let trade = FileTask::structure(BASE, FileKind::TradeStructure).unwrap();
        assert_eq!(trade.url, format!("{}4433/TC_structure.dat", BASE));
        assert!(FileTask::structure(BASE, FileKind::Tick).is_err());
        assert!(FileTask::daily(BASE, SequenceIndex::new(5368), FileKind::TickStructure).is_err());
    }

    #[test]
    fn test_plan_tick_only_example() {
        let job = job(DataKind::Tick, "2023-03-03", "2023-03-10", PathBuf::from("/tmp"));
        let tasks = plan_tasks(&job);

        assert_eq!(tasks.len(), 6);
        assert!(tasks.iter().all(|t| t.kind == FileKind::Tick));
        let names: Vec<&str> = tasks.iter().map(|t| t.expected_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "WEBPXTICK_DT-20230303.zip",
                "WEBPXTICK_DT-20230306.zip",
                "WEBPXTICK_DT-20230307.zip",
                "WEBPXTICK_DT-20230308.zip",
                "WEBPXTICK_DT-20230309.zip",
                "WEBPXTICK_DT-20230310.zip",
            ]
        );
    }

    #[test]
    fn test_plan_all_order_and_count() {
        let job = job(DataKind::All, "2023-03-06", "2023-03-07", PathBuf::from("/tmp"));
        let tasks = plan_tasks(&job);
        let kinds: Vec<FileKind> = tasks.iter().map(|t| t.kind).collect();

        assert_eq!(
            kinds,
            vec![
                FileKind::TradeStructure,
                FileKind::TickStructure,
                FileKind::Tick,
                FileKind::Trade,
                FileKind::Tick,
                FileKind::Trade,
            ]
        );
        assert_eq!(tasks.len() as u32, job.expected_file_count());
    }

    #[test]
    fn test_plan_never_touches_hole() {
        let job = job(DataKind::Both, "2020-11-10", "2020-11-17", PathBuf::from("/tmp"));
        let tasks = plan_tasks(&job);

        assert_eq!(tasks.len() as u32, job.expected_file_count());
        assert!(tasks.iter().all(|t| !t.index.is_hole()));
        assert!(!tasks.iter().any(|t| t.url.contains("/4766/")));
    }

    #[test]
    fn test_plan_structure_only() {
        let mut job = job(DataKind::Structure, "2023-03-03", "2023-03-10", PathBuf::from("/tmp"));
        job.range = None;
        let tasks = plan_tasks(&job);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].kind, FileKind::TradeStructure);
        assert_eq!(tasks[1].kind, FileKind::TickStructure);
    }
}
