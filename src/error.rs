use crate::types::{JobId, JobState};
use snafu::Snafu;
use std::time::Duration;

/// Array internal error code, seen eg when the job status endpoint has lost
/// track of a job.
pub const EINTERNAL_ERROR: &str = "13114";

/// Error returned by the array management API when a call itself fails,
/// carrying the status, reason and error code reported by the array.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ApiError {
    status: String,
    reason: String,
    code: String,
}

impl ApiError {
    /// New `ApiError` from the fields reported by the array.
    pub fn new(
        status: impl Into<String>,
        reason: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            reason: reason.into(),
            code: code.into(),
        }
    }

    /// The call actually passed.
    pub fn is_passed(&self) -> bool {
        self.status == "passed"
    }
    /// The job status endpoint failed to load the job.
    /// Retryable: the job may simply not be visible yet.
    pub fn is_failed_to_load_job(&self) -> bool {
        self.code == EINTERNAL_ERROR && self.reason.contains("Failed to load job")
    }

    /// Status reported by the array.
    pub fn status(&self) -> &str {
        &self.status
    }
    /// Reason reported by the array.
    pub fn reason(&self) -> &str {
        &self.reason
    }
    /// Error code reported by the array.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_passed() {
            write!(f, "API status: passed")
        } else {
            write!(
                f,
                "API status: {}, Reason: {}, Code: {}",
                self.status, self.reason, self.code
            )
        }
    }
}

impl std::error::Error for ApiError {}

/// An array response whose shape carries no recognizable asynchronous result.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidResponse {
    /// Which response kind could not be unwrapped.
    pub kind: String,
}

impl std::fmt::Display for InvalidResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Response '{}' has no recognizable async result", self.kind)
    }
}

impl std::error::Error for InvalidResponse {}

/// Error waiting for an asynchronous array operation to complete.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
pub enum WaitError {
    /// The submission itself failed, no job was started.
    #[snafu(display("Asynchronous request submission failed"))]
    Submit {
        /// The array error which failed the submission.
        source: ApiError,
    },
    /// The submission response reported a terminal failure synchronously.
    #[snafu(display("Asynchronous request failed, error code: {code}"))]
    AsyncFailed {
        /// Error code reported by the array.
        code: i64,
    },
    /// The remote job reached a terminal failure state.
    #[snafu(display("Job '{job_id}' failed to complete, job state: {state}"))]
    JobFailed {
        /// Identifier of the failed job.
        job_id: JobId,
        /// The terminal state observed.
        state: JobState,
    },
    /// The wait budget was exhausted while the job stayed non-terminal.
    #[snafu(display("Job '{job_id}' not completed after {elapsed:?}"))]
    WaitTimeout {
        /// Identifier of the job which did not complete in time.
        job_id: JobId,
        /// How long we waited for it.
        elapsed: Duration,
    },
    /// The caller cancelled the wait.
    #[snafu(display("Wait for job '{job_id}' was cancelled"))]
    Cancelled {
        /// Identifier of the job which was being waited on.
        job_id: JobId,
    },
    /// The submission response shape was not recognized.
    #[snafu(display("Could not unwrap the submission response"))]
    Response {
        /// The unrecognized response.
        source: InvalidResponse,
    },
}

impl WaitError {
    /// The wait budget was exhausted, as opposed to the job itself failing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

/// Error reconciling the node access of an initiator group.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
pub enum ReconcileError {
    /// Could not list the current members of the group.
    #[snafu(display("Failed to list initiators of igroup '{igroup}'"))]
    ListInitiators {
        /// The initiator group being reconciled.
        igroup: String,
        /// The array error which failed the listing.
        source: ApiError,
    },
    /// Could not add a missing initiator.
    #[snafu(display("Failed to add initiator '{iqn}' to igroup '{igroup}'"))]
    AddInitiator {
        /// The initiator group being reconciled.
        igroup: String,
        /// The initiator which could not be added.
        iqn: String,
        /// The array error which failed the addition.
        source: ApiError,
    },
    /// Could not remove a stale initiator.
    #[snafu(display("Failed to remove initiator '{iqn}' from igroup '{igroup}'"))]
    RemoveInitiator {
        /// The initiator group being reconciled.
        igroup: String,
        /// The initiator which could not be removed.
        iqn: String,
        /// The array error which failed the removal.
        source: ApiError,
    },
}
