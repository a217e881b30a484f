//! Download state tracking.

use crate::download::ledger::FailureLedger;

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Configured,
    RangeResolved,
    MainPass,
    RetryPass,
    Done,
    /// The operator declined to start.
    Aborted,
}

/// Per-job download state.
///
/// Owned by one run and passed explicitly; nothing here outlives the job.
#[derive(Debug, Default)]
pub struct JobState {
    pub phase: JobPhase,

    // Progress
    pub total: u32,
    pub position: u32,

    // Statistics
    pub downloaded: u32,
    pub already_present: u32,
    pub recovered: u32,

    pub ledger: FailureLedger,
}

impl JobState {
    /// Create the state for a job expected to produce `total` files.
    pub fn new(total: u32) -> Self {
        Self {
            phase: JobPhase::RangeResolved,
            total,
            ..Default::default()
        }
    }

    /// Move to the next task, returning its 1-based position.
    pub fn advance(&mut self) -> u32 {
        self.position += 1;
        self.position
    }

    /// Tasks attempted during the main pass.
    pub fn attempted(&self) -> u32 {
        self.position
    }

    /// Files present at the end of the job.
    pub fn succeeded(&self) -> u32 {
        self.downloaded + self.already_present + self.recovered
    }

    /// Files still missing after every pass.
    pub fn still_failed(&self) -> usize {
        self.ledger.len()
    }

    /// Share of expected files present, in percent.
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        f64::from(self.succeeded()) * 100.0 / f64::from(self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == JobPhase::Done && self.ledger.is_empty()
    }
}
