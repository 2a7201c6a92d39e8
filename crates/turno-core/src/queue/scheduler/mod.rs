use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval};
use tracing::debug;

use crate::job::{Completed, JobBody, JobId};
use crate::queue::command::{Completion, QueueEvent, SchedulerCommand};
use crate::queue::config::QueueConfig;
use crate::queue::limiter::RateLimiter;

mod dispatch;
mod handlers;

/// A job waiting in the pending set.
struct PendingJob<T> {
    body: JobBody<T>,
    done_tx: oneshot::Sender<Completed<T>>,
}

/// Single-owner scheduler core. Owns every piece of mutable queue state
/// and processes commands, job completions, and timer ticks serially on
/// one task.
pub(crate) struct Scheduler<T> {
    commands: mpsc::UnboundedReceiver<SchedulerCommand<T>>,
    /// Cloned into each spawned job body so its outcome flows back here.
    completions_tx: mpsc::UnboundedSender<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    limiter: RateLimiter,
    stats_interval: Duration,
    /// Present iff throughput reporting is armed.
    stats_timer: Option<Interval>,
    /// Deadline for retrying a dispatch blocked on the rate window.
    retry_at: Option<Instant>,
    /// True between `start` and the next `pause`.
    started: bool,
    /// Pending jobs keyed by (priority, id): the first entry is the most
    /// urgent, oldest job.
    pending: BTreeMap<(u8, JobId), PendingJob<T>>,
    /// Completion sinks of dispatched jobs, by id.
    in_flight: HashMap<JobId, oneshot::Sender<Completed<T>>>,
    /// Completion sinks of failed jobs, kept open so their tickets stay
    /// pending while the queue lives.
    unresolved: Vec<oneshot::Sender<Completed<T>>>,
    subscribers: Vec<mpsc::UnboundedSender<QueueEvent<T>>>,
    /// Pause callers waiting for in-flight jobs to finish.
    pause_waiters: Vec<oneshot::Sender<()>>,
}

enum Wake<T> {
    Command(SchedulerCommand<T>),
    Completion(Completion<T>),
    StatsTick,
    RetryDue,
    HandlesGone,
}

impl<T: Clone + Send + 'static> Scheduler<T> {
    pub(crate) fn new(
        commands: mpsc::UnboundedReceiver<SchedulerCommand<T>>,
        completions_tx: mpsc::UnboundedSender<Completion<T>>,
        completions: mpsc::UnboundedReceiver<Completion<T>>,
        config: &QueueConfig,
    ) -> Self {
        Self {
            commands,
            completions_tx,
            completions,
            limiter: RateLimiter::new(config.admission()),
            stats_interval: config.stats_interval(),
            stats_timer: None,
            retry_at: None,
            started: false,
            pending: BTreeMap::new(),
            in_flight: HashMap::new(),
            unresolved: Vec::new(),
            subscribers: Vec::new(),
            pause_waiters: Vec::new(),
        }
    }

    /// Run the scheduler event loop until every handle is dropped and the
    /// last in-flight job has reported back.
    pub(crate) async fn run(mut self) {
        debug!("scheduler task started");
        let mut accepting = true;

        loop {
            if !accepting && self.limiter.is_idle() {
                break;
            }

            let wake = tokio::select! {
                cmd = self.commands.recv(), if accepting => match cmd {
                    Some(cmd) => Wake::Command(cmd),
                    None => Wake::HandlesGone,
                },
                Some(completion) = self.completions.recv() => Wake::Completion(completion),
                _ = stats_tick(&mut self.stats_timer) => Wake::StatsTick,
                _ = wake_at(self.retry_at) => Wake::RetryDue,
            };

            match wake {
                Wake::Command(cmd) => self.handle_command(cmd),
                Wake::Completion(completion) => self.handle_completion(completion),
                Wake::StatsTick => self.emit_stats(),
                Wake::RetryDue => {
                    self.retry_at = None;
                    self.dispatch();
                }
                Wake::HandlesGone => {
                    debug!(
                        running = self.limiter.running(),
                        "all queue handles dropped, finishing in-flight jobs"
                    );
                    accepting = false;
                    self.started = false;
                }
            }
        }

        debug!("scheduler task stopped");
    }
}

/// Resolves on the next stats tick; pends forever while reporting is
/// disarmed.
async fn stats_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Resolves at `deadline`; pends forever when there is none.
async fn wake_at(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests;
