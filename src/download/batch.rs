//! Batch download driver.

use std::path::Path;

use crate::download::confirm::Confirm;
use crate::download::job::DownloadJob;
use crate::download::retry::retry_failed;
use crate::download::state::{JobPhase, JobState};
use crate::download::task::{plan_tasks, FileTask};
use crate::error::Result;
use crate::transfer::{FetchedFile, Transfer};

const START_QUESTION: &str = "Do you want to start the above download jobs?";
const RETRY_QUESTION: &str = "Do you want to redownload the failed files?";

/// How a task was satisfied.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The expected file was already in the destination.
    AlreadyPresent,
    Downloaded(FetchedFile),
}

/// Satisfy one task, skipping the network when its file already exists.
pub async fn fetch_task(
    transfer: &dyn Transfer,
    destination: &Path,
    task: &FileTask,
) -> Result<FetchOutcome> {
    if destination.join(&task.expected_name).exists() {
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let file = transfer.fetch(&task.url, destination).await?;
    Ok(FetchOutcome::Downloaded(file))
}

/// Run a whole download job.
///
/// Per-file failures never stop the batch; they end up in the ledger of the
/// returned state.
pub async fn download_batch(
    transfer: &dyn Transfer,
    confirm: &dyn Confirm,
    job: &DownloadJob,
) -> JobState {
    let mut state = JobState::new(job.expected_file_count());

    log_overview(job, &state);

    if !confirm.confirm(START_QUESTION) {
        tracing::info!("Exit: download job not started");
        state.phase = JobPhase::Aborted;
        return state;
    }

    state.phase = JobPhase::MainPass;
    tracing::info!("===== Download started =====");

    for task in plan_tasks(job) {
        let position = state.advance();

        match fetch_task(transfer, &job.destination, &task).await {
            Ok(FetchOutcome::AlreadyPresent) => {
                state.already_present += 1;
                tracing::info!(
                    "{}/{}: {} already downloaded",
                    position,
                    state.total,
                    task.expected_name
                );
            }
            Ok(FetchOutcome::Downloaded(file)) => {
                state.downloaded += 1;
                tracing::info!(
                    "{}/{}: {} downloaded ({} bytes)",
                    position,
                    state.total,
                    file.path.display(),
                    file.bytes
                );
            }
            Err(e) => {
                tracing::warn!(
                    "{}/{}: failed to download {}: {}",
                    position,
                    state.total,
                    task.expected_name,
                    e
                );
                tracing::debug!("Failed URL: {}", task.url);
                state.ledger.record(task);
            }
        }
    }

    tracing::info!(
        "Successfully downloaded {} files; {} files failed",
        state.downloaded + state.already_present,
        state.ledger.len()
    );

    if !state.ledger.is_empty() {
        tracing::warn!("Failed files: {}", state.ledger.expected_names().join(", "));

        if job.auto_retry || confirm.confirm(RETRY_QUESTION) {
            retry_failed(transfer, job, &mut state).await;
        } else {
            tracing::info!("Failed files not redownloaded");
        }
    }

    state.phase = JobPhase::Done;
    tracing::info!("Done! Completed downloading history data");

    state
}

fn log_overview(job: &DownloadJob, state: &JobState) {
    match job.range {
        Some(range) => tracing::info!(
            "Downloading {} data {} ({})",
            job.kind,
            range.dates,
            range.indices
        ),
        None => tracing::info!("Downloading {} data", job.kind),
    }
    tracing::info!("Total files expected: {}", state.total);
    tracing::info!("Saving to {}", job.destination.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataKind;
    use crate::download::confirm::AssumeAnswer;
    use crate::download::job::test_support::job;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory transfer saving each URL under the name the server would use.
    struct ScriptedTransfer {
        names: HashMap<String, String>,
        failures: Mutex<HashMap<String, u32>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransfer {
        fn for_tasks(tasks: &[FileTask]) -> Self {
            Self {
                names: tasks
                    .iter()
                    .map(|t| (t.url.clone(), t.expected_name.clone()))
                    .collect(),
                failures: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn fail(self, url: &str, times: u32) -> Self {
            self.failures.lock().unwrap().insert(url.to_string(), times);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transfer for ScriptedTransfer {
        async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<FetchedFile> {
            self.calls.lock().unwrap().push(url.to_string());

            let failing = match self.failures.lock().unwrap().get_mut(url) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    true
                }
                _ => false,
            };
            if failing {
                return Err(Error::Timeout(5));
            }

            let name = self
                .names
                .get(url)
                .ok_or_else(|| Error::NotFound(url.to_string()))?;
            let path = dest_dir.join(name);
            std::fs::write(&path, b"data")?;
            Ok(FetchedFile { path, bytes: 4 })
        }
    }

    /// Answers questions from a queue, then says no.
    struct ScriptedConfirm {
        answers: Mutex<VecDeque<bool>>,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedConfirm {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().copied().collect()),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&self, question: &str) -> bool {
            self.asked.lock().unwrap().push(question.to_string());
            self.answers.lock().unwrap().pop_front().unwrap_or(false)
        }
    }

    fn tick_job(dir: PathBuf) -> DownloadJob {
        job(DataKind::Tick, "2023-03-03", "2023-03-10", dir)
    }

    #[tokio::test]
    async fn test_tick_only_example() {
        let dir = tempfile::tempdir().unwrap();
        let job = tick_job(dir.path().to_path_buf());
        let transfer = ScriptedTransfer::for_tasks(&plan_tasks(&job));

        let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;

        assert_eq!(state.phase, JobPhase::Done);
        assert_eq!(state.total, 6);
        assert_eq!(state.downloaded, 6);
        assert_eq!(transfer.calls().len(), 6);
        assert!(transfer.calls().iter().all(|u| u.ends_with("/WEBPXTICK_DT.zip")));
        assert!(dir.path().join("WEBPXTICK_DT-20230310.zip").exists());
        assert!(state.is_complete());
    }

    #[tokio::test]
    async fn test_rerun_over_complete_destination_makes_no_calls() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(DataKind::All, "2023-03-03", "2023-03-10", dir.path().to_path_buf());
        let tasks = plan_tasks(&job);
        for task in &tasks {
            std::fs::write(dir.path().join(&task.expected_name), b"data").unwrap();
        }
        let transfer = ScriptedTransfer::for_tasks(&tasks);

        let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;

        assert!(transfer.calls().is_empty());
        assert_eq!(state.already_present, state.total);
        assert_eq!(state.succeeded(), 14);
        assert!((state.completion() - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_transient_failure_recovered_on_retry() {
        let dir = tempfile::tempdir().unwrap();
        let job = tick_job(dir.path().to_path_buf());
        let tasks = plan_tasks(&job);
        let flaky = tasks[2].url.clone();
        let transfer = ScriptedTransfer::for_tasks(&tasks).fail(&flaky, 2);

        let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;

        assert!(state.ledger.is_empty());
        assert_eq!(state.downloaded, 5);
        assert_eq!(state.recovered, 1);
        assert_eq!(state.succeeded(), 6);
        // One failure in the main pass, then one failed and one good attempt.
        assert_eq!(transfer.calls().iter().filter(|u| **u == flaky).count(), 3);
        assert!(state.is_complete());
    }

    #[tokio::test]
    async fn test_exhausted_retries_stay_in_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = tick_job(dir.path().to_path_buf());
        job.max_retry = 2;
        let tasks = plan_tasks(&job);
        let broken = tasks[0].url.clone();
        let transfer = ScriptedTransfer::for_tasks(&tasks).fail(&broken, u32::MAX);

        let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;

        assert_eq!(state.phase, JobPhase::Done);
        assert_eq!(state.ledger.urls(), vec![broken.as_str()]);
        assert_eq!(state.succeeded(), 5);
        assert_eq!(transfer.calls().iter().filter(|u| **u == broken).count(), 3);
        assert!(!state.is_complete());
    }

    #[tokio::test]
    async fn test_retry_keeps_failure_order() {
        let dir = tempfile::tempdir().unwrap();
        let job = tick_job(dir.path().to_path_buf());
        let tasks = plan_tasks(&job);
        let transfer = ScriptedTransfer::for_tasks(&tasks)
            .fail(&tasks[1].url, u32::MAX)
            .fail(&tasks[3].url, 1)
            .fail(&tasks[5].url, u32::MAX);

        let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;

        assert_eq!(
            state.ledger.urls(),
            vec![tasks[1].url.as_str(), tasks[5].url.as_str()]
        );
        assert_eq!(state.recovered, 1);
    }

    #[tokio::test]
    async fn test_declined_start_makes_no_calls() {
        let dir = tempfile::tempdir().unwrap();
        let job = tick_job(dir.path().to_path_buf());
        let transfer = ScriptedTransfer::for_tasks(&plan_tasks(&job));

        let state = download_batch(&transfer, &AssumeAnswer(false), &job).await;

        assert_eq!(state.phase, JobPhase::Aborted);
        assert!(transfer.calls().is_empty());
        assert_eq!(state.attempted(), 0);
    }

    #[tokio::test]
    async fn test_declined_retry_keeps_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = tick_job(dir.path().to_path_buf());
        job.auto_retry = false;
        let tasks = plan_tasks(&job);
        let transfer = ScriptedTransfer::for_tasks(&tasks).fail(&tasks[0].url, 1);
        let confirm = ScriptedConfirm::new(&[true, false]);

        let state = download_batch(&transfer, &confirm, &job).await;

        assert_eq!(
            *confirm.asked.lock().unwrap(),
            vec![START_QUESTION.to_string(), RETRY_QUESTION.to_string()]
        );
        assert_eq!(state.phase, JobPhase::Done);
        assert_eq!(state.ledger.len(), 1);
        assert_eq!(transfer.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_auto_retry_skips_retry_question() {
        let dir = tempfile::tempdir().unwrap();
        let job = tick_job(dir.path().to_path_buf());
        let tasks = plan_tasks(&job);
        let transfer = ScriptedTransfer::for_tasks(&tasks).fail(&tasks[0].url, 1);
        let confirm = ScriptedConfirm::new(&[true]);

        let state = download_batch(&transfer, &confirm, &job).await;

        assert_eq!(confirm.asked.lock().unwrap().len(), 1);
        assert!(state.is_complete());
    }

    #[tokio::test]
    async fn test_hole_never_requested() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(DataKind::Both, "2020-11-12", "2020-11-16", dir.path().to_path_buf());
        let transfer = ScriptedTransfer::for_tasks(&plan_tasks(&job));

        let state = download_batch(&transfer, &AssumeAnswer(true), &job).await;

        // 4765, 4767 and 4768 around the hole, then 4769.
        assert_eq!(state.total, 8);
        assert_eq!(transfer.calls().len(), 8);
        assert!(!transfer.calls().iter().any(|u| u.contains("/4766/")));
    }

    #[tokio::test]
    async fn test_fetch_task_skips_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = tick_job(dir.path().to_path_buf());
        let tasks = plan_tasks(&job);
        std::fs::write(dir.path().join(&tasks[0].expected_name), b"data").unwrap();
        let transfer = ScriptedTransfer::for_tasks(&tasks);

        let outcome = fetch_task(&transfer, dir.path(), &tasks[0]).await;
        assert!(matches!(outcome, Ok(FetchOutcome::AlreadyPresent)));
        assert!(transfer.calls().is_empty());
    }
}
