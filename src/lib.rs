#![warn(missing_docs)]
//! Client-side primitives for driving a remote storage array whose management
//! API completes long-running operations asynchronously.
//!
//! An asynchronous array call returns a handle to a remote job rather than a
//! final result. The [`waiter`] module blocks the calling task until that job
//! reaches a terminal state, polling the array with an exponential backoff
//! bounded by a caller-supplied wait budget. The [`igroup`] module brings an
//! array-side initiator group's membership in line with the set of cluster
//! nodes which must have access to a volume.
//!
//! The array endpoints themselves are reached through narrow traits
//! ([`waiter::JobStatusQuery`], [`igroup::IgroupOps`]) so callers plug in
//! whichever management transport they use, and tests plug in fakes.

/// Bounded exponential backoff used between job status polls.
pub mod backoff;
/// Typed errors returned by the waiter and the reconciler.
pub mod error;
/// Initiator group membership reconciliation.
pub mod igroup;
/// Job identity, job states and asynchronous response unwrapping.
pub mod types;
/// The asynchronous completion waiter.
pub mod waiter;

pub use backoff::BackoffOptions;
pub use error::{ApiError, InvalidResponse, ReconcileError, WaitError};
pub use igroup::{reconcile_node_access, IgroupOps, NodeAccess};
pub use types::{AsyncResponse, AsyncResult, JobId, JobState, SubmissionStatus};
pub use waiter::{check_for_job_completion, wait_for_async_response, JobStatusQuery, WaitOptions};
