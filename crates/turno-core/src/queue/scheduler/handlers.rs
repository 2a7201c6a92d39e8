use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{PendingJob, Scheduler};
use crate::job::Completed;
use crate::queue::command::{Completion, JobEntry, QueueEvent, SchedulerCommand};
use crate::queue::stats::QueueSnapshot;

impl<T: Clone + Send + 'static> Scheduler<T> {
    pub(super) fn handle_command(&mut self, cmd: SchedulerCommand<T>) {
        match cmd {
            SchedulerCommand::Push { entry } => self.handle_push(entry),
            SchedulerCommand::Start { reply } => {
                self.handle_start();
                let _ = reply.send(());
            }
            SchedulerCommand::Pause { reply } => self.handle_pause(reply),
            SchedulerCommand::Subscribe { tx } => {
                debug!("subscriber registered");
                self.subscribers.push(tx);
            }
            SchedulerCommand::Stats { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn handle_push(&mut self, entry: JobEntry<T>) {
        debug!(job_id = entry.id, priority = entry.priority, "job pushed");
        let previous = self.pending.insert(
            (entry.priority, entry.id),
            PendingJob {
                body: entry.body,
                done_tx: entry.done_tx,
            },
        );
        assert!(previous.is_none(), "job id reused in the pending set");

        if self.started {
            // A push into a drained-but-started queue revives reporting.
            self.arm_stats();
            self.dispatch();
        }
    }

    fn handle_start(&mut self) {
        if self.started {
            return;
        }
        info!("queue started");
        self.started = true;
        self.arm_stats();
        self.dispatch();
    }

    /// First pause phase: dispatch stops immediately. The reply is held
    /// until in-flight jobs reach zero (second phase), at which point the
    /// stats timer is disarmed as well.
    fn handle_pause(&mut self, reply: oneshot::Sender<()>) {
        if self.started {
            info!("queue pausing");
        }
        self.started = false;
        if self.limiter.is_idle() {
            self.disarm_stats();
            let _ = reply.send(());
        } else {
            debug!(
                running = self.limiter.running(),
                "pause waiting for in-flight jobs"
            );
            self.pause_waiters.push(reply);
        }
    }

    pub(super) fn handle_completion(&mut self, completion: Completion<T>) {
        let now = Instant::now();
        self.limiter.job_ended(now);
        let done_tx = self
            .in_flight
            .remove(&completion.id)
            .expect("completion reported for a job that is not in flight");

        match completion.outcome {
            Ok(result) => {
                debug!(job_id = completion.id, "job finished");
                self.emit(QueueEvent::Done {
                    job_id: completion.id,
                    result: result.clone(),
                });
                let _ = done_tx.send(Completed {
                    id: completion.id,
                    result,
                });
            }
            Err(error) => {
                let error: Arc<dyn std::error::Error + Send + Sync> = Arc::from(error);
                warn!(job_id = completion.id, error = %error, "job failed");
                self.emit(QueueEvent::Error {
                    job_id: completion.id,
                    error,
                });
                // Failures surface through the event stream only; the push
                // ticket stays pending while the queue lives.
                self.unresolved.push(done_tx);
            }
        }

        if self.limiter.is_idle() {
            for waiter in self.pause_waiters.drain(..) {
                let _ = waiter.send(());
            }
            if !self.started {
                self.disarm_stats();
            }
        }

        self.dispatch();
    }

    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            pending: self.pending.len(),
            running: self.limiter.running(),
            started: self.started,
            jobs_per_second: self.limiter.jobs_per_second(Instant::now()),
        }
    }
}
