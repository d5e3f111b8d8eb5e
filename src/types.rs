use crate::error::InvalidResponse;
use strum_macros::{Display, EnumString};

/// Placeholder for a numeric field the array did not set.
pub const NUMERICAL_VALUE_NOT_SET: i64 = -1;

/// Identifier of a remote long-running job on the array.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct JobId(u64);

impl JobId {
    /// New `JobId` from the array's numeric job identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    /// The raw numeric identifier.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State reported by the array for a remote job.
/// Anything the array reports which we don't recognize is kept as `Other` and
/// treated as non-terminal while polling.
#[derive(Debug, Clone, Eq, PartialEq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum JobState {
    /// The job completed successfully.
    Success,
    /// The job failed.
    Failure,
    /// The job hit an error.
    Error,
    /// The job was aborted.
    Quit,
    /// The job is gone without completing.
    Dead,
    /// Any other state the array may report, eg: queued or running.
    #[strum(default)]
    Other(String),
}

impl JobState {
    /// The job completed successfully.
    pub fn is_success(&self) -> bool {
        self == &Self::Success
    }
    /// The job reached a terminal failure state and will never complete.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Failure | Self::Error | Self::Quit | Self::Dead)
    }

    /// Classify a state string reported by the array.
    /// Never fails: unrecognized strings classify as `Other`.
    pub fn classify(state: &str) -> Self {
        state
            .parse()
            .unwrap_or_else(|_| Self::Other(state.to_string()))
    }
}

/// Status of the submission itself, as reported synchronously by the array.
#[derive(Debug, Clone, Eq, PartialEq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    /// A remote job was started and must be waited on.
    InProgress,
    /// The operation completed synchronously.
    Succeeded,
    /// The submission itself failed.
    Failed,
    /// Any other status the array may report.
    #[strum(default)]
    Other(String),
}

impl SubmissionStatus {
    /// Classify a submission status string reported by the array.
    /// Never fails: unrecognized strings classify as `Other`.
    pub fn classify(status: &str) -> Self {
        status
            .parse()
            .unwrap_or_else(|_| Self::Other(status.to_string()))
    }
}

/// The asynchronous result extracted from an array response: which job was
/// started, in which state the submission is, and an error code if it failed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AsyncResult {
    /// Identifier of the remote job, when one was started.
    pub job_id: Option<JobId>,
    /// Synchronous status of the submission.
    pub status: SubmissionStatus,
    /// Error code reported with a failed submission.
    pub error_code: Option<i64>,
}

/// Capability implemented by every array response type which may carry an
/// asynchronous result.
/// Each response type extracts its own fields, so an unexpected response shape
/// is an explicit [`InvalidResponse`] rather than a runtime fault.
pub trait AsyncResponse {
    /// Extract the asynchronous result from this response.
    fn async_result(&self) -> Result<AsyncResult, InvalidResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_state_classification() {
        for state in ["failure", "error", "quit", "dead"] {
            assert!(JobState::classify(state).is_terminal_failure(), "{state}");
            assert!(!JobState::classify(state).is_success(), "{state}");
        }
        assert!(JobState::classify("success").is_success());
        assert!(!JobState::classify("success").is_terminal_failure());

        let running = JobState::classify("running");
        assert_eq!(running, JobState::Other("running".to_string()));
        assert!(!running.is_terminal_failure());
        assert!(!running.is_success());
    }

    #[test]
    fn job_state_display() {
        assert_eq!(JobState::Failure.to_string(), "failure");
        assert_eq!(JobState::classify("queued").to_string(), "queued");
    }

    #[test]
    fn submission_status_classification() {
        assert_eq!(
            SubmissionStatus::classify("in_progress"),
            SubmissionStatus::InProgress
        );
        assert_eq!(SubmissionStatus::classify("failed"), SubmissionStatus::Failed);
        assert_eq!(
            SubmissionStatus::classify("succeeded"),
            SubmissionStatus::Succeeded
        );
        assert_eq!(
            SubmissionStatus::classify("unknown_status"),
            SubmissionStatus::Other("unknown_status".to_string())
        );
    }
}
