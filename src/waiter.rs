use crate::{
    backoff::{BackoffOptions, ExponentialBackoff},
    error::{
        ApiError, AsyncFailed, Cancelled, InvalidResponse, JobFailed, Response, Submit, WaitError,
        WaitTimeout,
    },
    types::{AsyncResponse, JobId, JobState, SubmissionStatus, NUMERICAL_VALUE_NOT_SET},
};
use async_trait::async_trait;
use snafu::ResultExt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Query the current state of a remote job.
/// Implemented by the array management client; tests inject a fake.
#[async_trait]
pub trait JobStatusQuery: Send + Sync {
    /// Get the current state of the given job.
    /// An `Err` means the query itself failed, not that the job failed.
    async fn job_status(&self, job_id: JobId) -> Result<JobState, ApiError>;
}

/// Options for a single wait: the backoff budget and an optional cancellation
/// token so callers can abort without waiting out the full budget.
#[derive(Debug, Clone, Default)]
pub struct WaitOptions {
    pub(crate) backoff: BackoffOptions,
    pub(crate) cancel: CancellationToken,
}

impl WaitOptions {
    /// New options with the given maximum wait duration.
    #[must_use]
    pub fn new(max_wait: Duration) -> Self {
        Self {
            backoff: BackoffOptions::new(max_wait),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the backoff options.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffOptions) -> Self {
        self.backoff = backoff;
        self
    }

    /// Cancellation token which aborts the wait when triggered.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the backoff options.
    pub fn backoff(&self) -> &BackoffOptions {
        &self.backoff
    }
}

/// Wait for the asynchronous array operation behind `submission` to complete.
///
/// A failed submission is surfaced immediately without any status query. A
/// synchronously completed operation returns at once. An in-progress operation
/// is waited on via [`check_for_job_completion`] until it reaches a terminal
/// state, the wait budget is exhausted or the caller cancels.
pub async fn wait_for_async_response<R: AsyncResponse>(
    submission: Result<R, ApiError>,
    client: &impl JobStatusQuery,
    opts: &WaitOptions,
) -> Result<(), WaitError> {
    let response = submission.context(Submit)?;
    let result = response.async_result().context(Response)?;
    match result.status {
        SubmissionStatus::Failed => AsyncFailed {
            code: result.error_code.unwrap_or(NUMERICAL_VALUE_NOT_SET),
        }
        .fail(),
        SubmissionStatus::InProgress => {
            let Some(job_id) = result.job_id else {
                return Err(InvalidResponse {
                    kind: "in_progress reply without a job id".to_string(),
                })
                .context(Response);
            };
            check_for_job_completion(client, job_id, opts).await
        }
        _ => Ok(()),
    }
}

/// Poll the state of the given job with an exponential backoff until it
/// completes, fails, the wait budget is exhausted or the caller cancels.
///
/// A terminal failure state stops the polling immediately, regardless of the
/// remaining budget. A failed status query is retried like a job still in
/// progress: the job may outlive a transient management endpoint hiccup.
pub async fn check_for_job_completion(
    client: &impl JobStatusQuery,
    job_id: JobId,
    opts: &WaitOptions,
) -> Result<(), WaitError> {
    let mut backoff = ExponentialBackoff::new(opts.backoff.clone());
    loop {
        match client.job_status(job_id).await {
            Ok(state) if state.is_success() => {
                debug!(%job_id, "Job completed successfully");
                return Ok(());
            }
            Ok(state) if state.is_terminal_failure() => {
                return JobFailed { job_id, state }.fail();
            }
            Ok(state) => {
                debug!(%job_id, %state, "Job not yet completed, waiting");
            }
            Err(error) => {
                debug!(%job_id, %error, "Job status query failed, retrying");
            }
        }

        let Some(delay) = backoff.next_delay() else {
            let elapsed = backoff.elapsed();
            warn!(%job_id, ?elapsed, "Job not completed within the wait budget");
            return WaitTimeout { job_id, elapsed }.fail();
        };
        tokio::select! {
            _ = opts.cancel.cancelled() => return Cancelled { job_id }.fail(),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
