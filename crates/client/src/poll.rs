//! Waiting for a remote art job to finish.
//!
//! The job status is queried on a fixed interval until the service reports
//! [`JOB_STATUS_FINISHED`](crate::messages::JOB_STATUS_FINISHED). The wait
//! stops on the first failed query, on an optional overall timeout, or
//! when the [`CancellationToken`] is triggered.

use std::time::Duration;

use artbuilder_core::remote_id::RemoteId;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::ArtApiError;
use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::messages::ArtJob;
use crate::service::ArtService;

/// Shortest period accepted for the poll timer.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Tunable parameters for job polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Period of the status query timer. The first query happens one
    /// period after the wait starts.
    pub interval: Duration,
    /// Upper bound on the whole wait. `None` waits until the job finishes.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeout: None,
        }
    }
}

/// Why waiting for a job ended without a finished job.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// A status query failed. Polling never retries.
    #[error("wait for job failed: {0}")]
    Query(#[source] ArtApiError),

    #[error("Job {job_id} did not finish within {}s", timeout.as_secs())]
    TimedOut { job_id: RemoteId, timeout: Duration },

    #[error("Waiting for job {0} was cancelled")]
    Cancelled(RemoteId),
}

/// Poll `job_id` until it finishes and return the final job payload.
pub async fn wait_for_job<S: ArtService>(
    service: &S,
    job_id: &RemoteId,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<ArtJob, PollError> {
    let wait = poll_until_finished(service, job_id, config.interval, cancel);

    match config.timeout {
        Some(limit) => tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| PollError::TimedOut {
                job_id: job_id.clone(),
                timeout: limit,
            })?,
        None => wait.await,
    }
}

async fn poll_until_finished<S: ArtService>(
    service: &S,
    job_id: &RemoteId,
    interval: Duration,
    cancel: &CancellationToken,
) -> Result<ArtJob, PollError> {
    // Fixed period: a slow query does not push later queries back.
    let period = interval.max(MIN_POLL_INTERVAL);
    let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempt = 0u32;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled(job_id.clone())),
            _ = ticks.tick() => {}
        }

        attempt += 1;
        let job = tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled(job_id.clone())),
            result = service.query_art_job(job_id) => result.map_err(PollError::Query)?,
        };

        if job.is_finished() {
            tracing::info!(job_id = %job_id, attempt, "Art job finished");
            return Ok(job);
        }

        tracing::debug!(job_id = %job_id, attempt, status = %job.status, "Art job not finished yet");
    }
}
