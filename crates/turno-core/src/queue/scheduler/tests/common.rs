use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::*;
use crate::job::{self, JobError, JobId};
use crate::queue::command::JobEntry;

pub(super) fn test_setup(
    config: QueueConfig,
) -> (
    mpsc::UnboundedSender<SchedulerCommand<u32>>,
    Scheduler<u32>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();
    let scheduler = Scheduler::new(command_rx, completion_tx, completion_rx, &config);
    (command_tx, scheduler)
}

/// Helper: push a job that sleeps `job_ms` then succeeds with `value`.
/// Returns the job's id. The ticket receiver is dropped; these tests
/// observe events, not tickets.
pub(super) fn send_sleep_job(
    tx: &mpsc::UnboundedSender<SchedulerCommand<u32>>,
    priority: u8,
    job_ms: u64,
    value: u32,
) -> JobId {
    let id = job::next_job_id();
    let (done_tx, _done_rx) = oneshot::channel();
    tx.send(SchedulerCommand::Push {
        entry: JobEntry {
            id,
            priority,
            body: Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(job_ms)).await;
                Ok(value)
            }),
            done_tx,
        },
    })
    .unwrap();
    id
}

/// Helper: push a job that fails immediately with `message`.
pub(super) fn send_failing_job(
    tx: &mpsc::UnboundedSender<SchedulerCommand<u32>>,
    priority: u8,
    message: &'static str,
) -> JobId {
    let id = job::next_job_id();
    let (done_tx, _done_rx) = oneshot::channel();
    tx.send(SchedulerCommand::Push {
        entry: JobEntry {
            id,
            priority,
            body: Box::pin(async move { Err::<u32, JobError>(message.into()) }),
            done_tx,
        },
    })
    .unwrap();
    id
}

/// Helper: send a Start command and process it, asserting the reply.
pub(super) fn start_queue(
    tx: &mpsc::UnboundedSender<SchedulerCommand<u32>>,
    scheduler: &mut Scheduler<u32>,
) {
    let (reply_tx, mut reply_rx) = oneshot::channel();
    tx.send(SchedulerCommand::Start { reply: reply_tx }).unwrap();
    scheduler.handle_all_pending();
    reply_rx.try_recv().expect("start reply");
}

/// Helper: register a subscriber and process the command.
pub(super) fn subscribe(
    tx: &mpsc::UnboundedSender<SchedulerCommand<u32>>,
    scheduler: &mut Scheduler<u32>,
) -> mpsc::UnboundedReceiver<QueueEvent<u32>> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    tx.send(SchedulerCommand::Subscribe { tx: event_tx }).unwrap();
    scheduler.handle_all_pending();
    event_rx
}

/// Let spawned job bodies run (and, under the paused clock, let their
/// timers fire) before draining completions.
pub(super) async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Drain every event currently buffered for a subscriber.
pub(super) fn drain_events(rx: &mut mpsc::UnboundedReceiver<QueueEvent<u32>>) -> Vec<QueueEvent<u32>> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Helper: drain all buffered commands, then all buffered completions.
impl<T: Clone + Send + 'static> Scheduler<T> {
    pub(super) fn handle_all_pending(&mut self) {
        while let Ok(cmd) = self.commands.try_recv() {
            self.handle_command(cmd);
        }
        while let Ok(completion) = self.completions.try_recv() {
            self.handle_completion(completion);
        }
    }
}
