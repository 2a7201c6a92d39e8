use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::Scheduler;
use crate::queue::command::{Completion, QueueEvent};

impl<T: Clone + Send + 'static> Scheduler<T> {
    /// Run the dispatch selection loop: while admission allows, pop the
    /// most urgent pending job (FIFO within a priority) and launch it.
    ///
    /// Invoked on push, on start, after every completion, and when the
    /// rate-window retry deadline fires. Emits `Drain` when it observes
    /// quiescence.
    pub(super) fn dispatch(&mut self) {
        self.retry_at = None;
        if !self.started {
            return;
        }

        loop {
            if self.pending.is_empty() {
                if self.limiter.is_idle() {
                    debug!("queue drained");
                    self.emit(QueueEvent::Drain);
                    self.disarm_stats();
                }
                return;
            }

            let now = Instant::now();
            if !self.limiter.may_admit(now) {
                // A completion re-enters this loop; in rate-limited mode
                // the window expiry is the other wake-up.
                self.retry_at = self.limiter.next_admission(now);
                return;
            }

            let ((priority, id), job) = self
                .pending
                .pop_first()
                .expect("pending set is non-empty here");
            self.limiter.job_started();
            self.in_flight.insert(id, job.done_tx);
            debug!(
                job_id = id,
                priority,
                running = self.limiter.running(),
                "job dispatched"
            );

            let completions = self.completions_tx.clone();
            let body = job.body;
            tokio::spawn(async move {
                let outcome = body.await;
                // The scheduler outlives every job it spawned, but the send
                // can race its teardown; a lost completion only matters to
                // a queue that no longer exists.
                let _ = completions.send(Completion { id, outcome });
            });
        }
    }

    /// Deliver an event to every live subscriber, dropping the ones that
    /// hung up.
    pub(super) fn emit(&mut self, event: QueueEvent<T>) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Arm throughput reporting. No-op while armed.
    pub(super) fn arm_stats(&mut self) {
        if self.stats_timer.is_some() {
            return;
        }
        let now = Instant::now();
        self.limiter.arm_stats(now);
        let mut interval = tokio::time::interval_at(now + self.stats_interval, self.stats_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.stats_timer = Some(interval);
        trace!("throughput reporting armed");
    }

    /// Disarm throughput reporting. No-op while disarmed.
    pub(super) fn disarm_stats(&mut self) {
        if self.stats_timer.take().is_some() {
            self.limiter.disarm_stats();
            trace!("throughput reporting disarmed");
        }
    }

    pub(super) fn emit_stats(&mut self) {
        let jobs_per_second = self.limiter.jobs_per_second(Instant::now());
        trace!(jobs_per_second, "throughput report");
        self.emit(QueueEvent::Stats { jobs_per_second });
    }
}
