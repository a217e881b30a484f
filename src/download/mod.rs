//! Download module for historical data files.
//!
//! This module provides:
//! - The validated download job
//! - File task planning over a sequence index range
//! - The batch driver with its main and retry passes
//! - Job state and the failure ledger
//! - Operator confirmation

pub mod batch;
pub mod confirm;
pub mod job;
pub mod ledger;
pub mod retry;
pub mod state;
pub mod task;

pub use batch::{download_batch, fetch_task, FetchOutcome};
pub use confirm::{AssumeAnswer, Confirm};
pub use job::{DownloadJob, STRUCTURE_FILE_COUNT};
pub use ledger::FailureLedger;
pub use retry::retry_failed;
pub use state::{JobPhase, JobState};
pub use task::{plan_tasks, FileKind, FileTask};
