//! Ordered record of files that failed to download.

use crate::download::task::FileTask;

/// Failed tasks in the order they failed.
///
/// A task appears at most once; the URL identifies it.
#[derive(Debug, Default, Clone)]
pub struct FailureLedger {
    entries: Vec<FileTask>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed task. Returns `false` if it was already recorded.
    pub fn record(&mut self, task: FileTask) -> bool {
        if self.contains(&task.url) {
            return false;
        }
        self.entries.push(task);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|t| t.url == url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileTask> {
        self.entries.iter()
    }

    /// Remove and return every entry, leaving the ledger empty.
    pub fn take(&mut self) -> Vec<FileTask> {
        std::mem::take(&mut self.entries)
    }

    pub fn urls(&self) -> Vec<&str> {
        self.entries.iter().map(|t| t.url.as_str()).collect()
    }

    pub fn expected_names(&self) -> Vec<&str> {
        self.entries.iter().map(|t| t.expected_name.as_str()).collect()
    }
}
