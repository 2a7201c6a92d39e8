use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::job::{Completed, JobBody, JobError, JobId};
use crate::queue::stats::QueueSnapshot;

/// A pushed job travelling from the handle to the scheduler.
pub(crate) struct JobEntry<T> {
    pub(crate) id: JobId,
    pub(crate) priority: u8,
    pub(crate) body: JobBody<T>,
    /// One-shot completion sink for the push ticket. Resolved on success;
    /// retained unresolved on failure.
    pub(crate) done_tx: oneshot::Sender<Completed<T>>,
}

/// Commands sent from queue handles to the scheduler task.
///
/// Variants that expect a response carry a `tokio::sync::oneshot::Sender`
/// for the reply; fire-and-forget variants omit it.
pub(crate) enum SchedulerCommand<T> {
    Push {
        entry: JobEntry<T>,
    },
    Start {
        reply: oneshot::Sender<()>,
    },
    Pause {
        reply: oneshot::Sender<()>,
    },
    Subscribe {
        tx: mpsc::UnboundedSender<QueueEvent<T>>,
    },
    Stats {
        reply: oneshot::Sender<QueueSnapshot>,
    },
}

/// Outcome of a spawned job body, reported back to the scheduler.
pub(crate) struct Completion<T> {
    pub(crate) id: JobId,
    pub(crate) outcome: Result<T, JobError>,
}

/// Lifecycle events delivered to subscribers, in order, one stream per
/// subscriber.
#[derive(Debug, Clone)]
pub enum QueueEvent<T> {
    /// A job finished successfully.
    Done { job_id: JobId, result: T },
    /// A job body failed. The corresponding push ticket stays unresolved.
    Error {
        job_id: JobId,
        error: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// No jobs pending and none in flight.
    Drain,
    /// Periodic throughput report: cumulative jobs per second since the
    /// stats clock was armed.
    Stats { jobs_per_second: f64 },
}
