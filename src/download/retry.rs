//! Retry pass over the failure ledger.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::download::batch::fetch_task;
use crate::download::job::DownloadJob;
use crate::download::state::{JobPhase, JobState};
use crate::transfer::Transfer;

/// Retry every ledger entry up to `job.max_retry` times.
///
/// Recovered files leave the ledger; the rest keep their failure order.
pub async fn retry_failed(transfer: &dyn Transfer, job: &DownloadJob, state: &mut JobState) {
    state.phase = JobPhase::RetryPass;
    tracing::info!("===== Redownload failed files =====");

    let pending = state.ledger.take();
    let n_fails = pending.len();

    for (i, task) in pending.into_iter().enumerate() {
        tracing::info!("{}/{}: Redownloading {}", i + 1, n_fails, task.expected_name);

        let mut recovered = false;
        for attempt in 1..=job.max_retry {
            match fetch_task(transfer, &job.destination, &task).await {
                Ok(_) => {
                    tracing::info!("\t{}/{} attempt succeeded", attempt, job.max_retry);
                    recovered = true;
                    break;
                }
                Err(e) => {
                    tracing::info!("\t{}/{} attempt failed: {}", attempt, job.max_retry, e);
                    if attempt < job.max_retry {
                        sleep(retry_delay(job.retry_delay)).await;
                    }
                }
            }
        }

        if recovered {
            state.recovered += 1;
        } else {
            state.ledger.record(task);
        }
    }

    tracing::info!(
        "Successfully redownloaded {} files; {} files still failed",
        n_fails - state.ledger.len(),
        state.ledger.len()
    );
}

/// Base delay plus up to half of it again as jitter.
fn retry_delay(base: Duration) -> Duration {
    let base_ms = base.as_millis() as u64;
    if base_ms == 0 {
        return Duration::ZERO;
    }
    let jitter_ms = rand::thread_rng().gen_range(0..=base_ms / 2);
    Duration::from_millis(base_ms + jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_bounds() {
        let base = Duration::from_millis(1000);
        for _ in 0..50 {
            let delay = retry_delay(base);
            assert!(delay >= base);
            assert!(delay <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        assert_eq!(retry_delay(Duration::ZERO), Duration::ZERO);
    }
}
