//! Job status sink trait.

use async_trait::async_trait;

use vtc_models::{JobId, JobStatus};

/// Destination for job lifecycle updates.
///
/// The supervisor only ever writes through this interface; it never reads job
/// state back. Implementations are expected to be safe to call repeatedly
/// with the same values and to handle their own retry/backoff — a sink call
/// must not block the supervisor indefinitely.
#[async_trait]
pub trait JobStatusSink: Send + Sync {
    /// Record a status transition for the job.
    async fn update_status(&self, job_id: &JobId, status: JobStatus);

    /// Record the job's percent complete (0-100).
    async fn update_percent_complete(&self, job_id: &JobId, percent: u8);

    /// Record a human-readable progress message.
    async fn update_message(&self, job_id: &JobId, message: &str);

    /// Record wall-clock seconds elapsed since the transcode started.
    async fn update_elapsed_time(&self, job_id: &JobId, seconds: u64);
}
