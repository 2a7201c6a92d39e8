mod command;
pub mod config;
pub mod limiter;
mod scheduler;
pub mod stats;

use std::future::Future;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::{ConfigError, ControlError, PushError, ShutdownError};
use crate::job::{self, JobError, JobTicket, PushOptions, HIGHEST_PRIORITY, LOWEST_PRIORITY};

pub use command::QueueEvent;
pub use config::QueueConfig;
pub use limiter::RateLimit;
pub use stats::QueueSnapshot;

use command::{JobEntry, SchedulerCommand};
use scheduler::Scheduler;

/// Handle to an asynchronous job queue.
///
/// The handle owns a dedicated scheduler task that makes every dispatch
/// decision; methods here only exchange messages with it. Jobs are futures
/// producing `Result<T, JobError>`; `T` is cloned into each subscriber's
/// `done` event as well as the push ticket.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) stops
/// dispatch, lets in-flight jobs finish, and winds the scheduler down.
pub struct JobQueue<T> {
    commands: mpsc::UnboundedSender<SchedulerCommand<T>>,
    scheduler: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + 'static> JobQueue<T> {
    /// Create a queue and spawn its scheduler task. Must be called inside
    /// a Tokio runtime.
    #[tracing::instrument(skip_all, fields(rate_limit = ?config.rate_limit))]
    pub fn new(config: QueueConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(command_rx, completion_tx, completion_rx, &config);
        let handle = tokio::spawn(scheduler.run());

        info!("job queue created");
        Ok(Self {
            commands: command_tx,
            scheduler: Some(handle),
        })
    }

    /// Push a job with the default (lowest) priority.
    ///
    /// Never blocks and never applies back-pressure: intake is unbounded.
    /// The returned ticket resolves with the job's result on success; see
    /// [`JobTicket`] for how failures behave.
    pub fn push<F>(&self, body: F) -> Result<JobTicket<T>, PushError>
    where
        F: Future<Output = Result<T, JobError>> + Send + 'static,
    {
        self.push_with(body, PushOptions::default())
    }

    /// Push a job with explicit options. Priorities outside
    /// `1..=10` are rejected.
    pub fn push_with<F>(&self, body: F, options: PushOptions) -> Result<JobTicket<T>, PushError>
    where
        F: Future<Output = Result<T, JobError>> + Send + 'static,
    {
        if !(HIGHEST_PRIORITY..=LOWEST_PRIORITY).contains(&options.priority) {
            return Err(PushError::InvalidPriority(options.priority));
        }

        let id = job::next_job_id();
        let (done_tx, done_rx) = oneshot::channel();
        let entry = JobEntry {
            id,
            priority: options.priority,
            body: Box::pin(body),
            done_tx,
        };
        self.commands
            .send(SchedulerCommand::Push { entry })
            .map_err(|_| PushError::Closed)?;

        Ok(JobTicket::new(id, done_rx))
    }

    /// Enable dispatch. Resolves once the scheduler has armed throughput
    /// reporting and run the dispatch loop; it does not wait for jobs to
    /// finish. Idempotent.
    #[tracing::instrument(skip_all)]
    pub async fn start(&self) -> Result<(), ControlError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(SchedulerCommand::Start { reply: reply_tx })
            .map_err(|_| ControlError::Closed)?;
        reply_rx.await.map_err(|_| ControlError::Closed)
    }

    /// Disable dispatch and wait for in-flight jobs to finish. Jobs pushed
    /// while paused are accepted but held. Idempotent once resolved.
    #[tracing::instrument(skip_all)]
    pub async fn pause(&self) -> Result<(), ControlError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(SchedulerCommand::Pause { reply: reply_tx })
            .map_err(|_| ControlError::Closed)?;
        reply_rx.await.map_err(|_| ControlError::Closed)
    }

    /// Register a lifecycle event subscriber. Each subscriber receives
    /// every subsequent event in order; dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<QueueEvent<T>>, ControlError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.commands
            .send(SchedulerCommand::Subscribe { tx })
            .map_err(|_| ControlError::Closed)?;
        Ok(rx)
    }

    /// Point-in-time snapshot of queue state.
    pub async fn stats(&self) -> Result<QueueSnapshot, ControlError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(SchedulerCommand::Stats { reply: reply_tx })
            .map_err(|_| ControlError::Closed)?;
        reply_rx.await.map_err(|_| ControlError::Closed)
    }

    /// Graceful teardown: stop dispatching, let in-flight jobs finish, and
    /// wait for the scheduler task to exit. Pending jobs that never
    /// dispatched are discarded.
    #[tracing::instrument(skip_all)]
    pub async fn shutdown(mut self) -> Result<(), ShutdownError> {
        info!("initiating queue shutdown");
        let handle = self.scheduler.take();
        // Dropping the last command sender is the shutdown signal.
        drop(self);
        if let Some(handle) = handle {
            handle
                .await
                .map_err(|_| ShutdownError::SchedulerPanicked)?;
        }
        info!("queue shutdown complete");
        Ok(())
    }
}
