use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TicketError;

/// Process-unique job identifier, assigned at push time. Ids increase
/// monotonically across every queue in the process.
pub type JobId = u64;

/// The failure type a job body may produce.
pub type JobError = Box<dyn std::error::Error + Send + Sync>;

/// A boxed job body: an opaque deferred computation producing either a
/// result value or a failure.
pub type JobBody<T> = Pin<Box<dyn Future<Output = Result<T, JobError>> + Send>>;

/// Most urgent priority a job can carry.
pub const HIGHEST_PRIORITY: u8 = 1;
/// Least urgent priority, and the default when none is given.
pub const LOWEST_PRIORITY: u8 = 10;

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_job_id() -> JobId {
    NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed)
}

/// Options for pushing a job onto the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOptions {
    /// Selection urgency in `1..=10`; 1 runs first. Never preempts a job
    /// that is already in flight.
    pub priority: u8,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            priority: LOWEST_PRIORITY,
        }
    }
}

impl PushOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

/// The resolved outcome of a successfully completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<T> {
    pub id: JobId,
    pub result: T,
}

/// Future returned by [`JobQueue::push`](crate::JobQueue::push).
///
/// Resolves with [`Completed`] when the job finishes successfully. If the
/// job body fails, the ticket stays pending for as long as the queue is
/// alive: failures are reported through the `error` event stream only, so
/// callers that care about failure must subscribe. Once the queue itself is
/// gone (shut down or dropped), a still-pending ticket resolves with
/// [`TicketError::QueueClosed`].
#[derive(Debug)]
pub struct JobTicket<T> {
    id: JobId,
    rx: oneshot::Receiver<Completed<T>>,
}

impl<T> JobTicket<T> {
    pub(crate) fn new(id: JobId, rx: oneshot::Receiver<Completed<T>>) -> Self {
        Self { id, rx }
    }

    /// The id assigned to this job at push time.
    pub fn id(&self) -> JobId {
        self.id
    }
}

impl<T> Future for JobTicket<T> {
    type Output = Result<Completed<T>, TicketError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map_err(|_| TicketError::QueueClosed)
    }
}
