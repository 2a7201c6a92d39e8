#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use turno_core::{JobError, QueueEvent};

/// Route scheduler tracing through the test binary. Only the first
/// installation wins; every test can call this.
pub fn init_test_tracing() {
    let _ = turno_core::telemetry::init_tracing("turno_core=debug");
}

/// A job body that sleeps `ms` then succeeds with `value`.
pub fn sleep_job(ms: u64, value: u32) -> impl Future<Output = Result<u32, JobError>> + Send {
    async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(value)
    }
}

/// A job body that fails immediately.
pub fn failing_job(message: &'static str) -> impl Future<Output = Result<u32, JobError>> + Send {
    async move { Err(message.into()) }
}

/// Collect events up to and including the next `Drain`. Panics if no drain
/// arrives within a generous (virtual) timeout.
pub async fn wait_for_drain(events: &mut UnboundedReceiver<QueueEvent<u32>>) -> Vec<QueueEvent<u32>> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(60), events.recv())
            .await
            .expect("timed out waiting for drain")
            .expect("event stream closed before drain");
        let is_drain = matches!(event, QueueEvent::Drain);
        seen.push(event);
        if is_drain {
            return seen;
        }
    }
}

/// Successful results in delivery order.
pub fn done_results(events: &[QueueEvent<u32>]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            QueueEvent::Done { result, .. } => Some(*result),
            _ => None,
        })
        .collect()
}

pub fn count_done(events: &[QueueEvent<u32>]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, QueueEvent::Done { .. }))
        .count()
}

pub fn count_errors(events: &[QueueEvent<u32>]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, QueueEvent::Error { .. }))
        .count()
}

pub fn count_drains(events: &[QueueEvent<u32>]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, QueueEvent::Drain))
        .count()
}

pub fn stats_rates(events: &[QueueEvent<u32>]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|event| match event {
            QueueEvent::Stats { jobs_per_second } => Some(*jobs_per_second),
            _ => None,
        })
        .collect()
}

/// Drain whatever is buffered right now without waiting.
pub fn buffered_events(events: &mut UnboundedReceiver<QueueEvent<u32>>) -> Vec<QueueEvent<u32>> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}
