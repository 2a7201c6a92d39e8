use crate::job::{HIGHEST_PRIORITY, LOWEST_PRIORITY};

/// Errors from [`QueueConfig`](crate::QueueConfig) validation. Construction
/// is the only place configuration can fail; a running queue never
/// re-validates.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate limit must be at least 1 job per second")]
    ZeroRateLimit,

    #[error("stats interval must be non-zero")]
    ZeroStatsInterval,
}

/// Errors from [`JobQueue::push`](crate::JobQueue::push).
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("priority {0} is outside the accepted range {HIGHEST_PRIORITY}..={LOWEST_PRIORITY}")]
    InvalidPriority(u8),

    #[error("queue has been shut down")]
    Closed,
}

/// Errors from queue control operations (`start`, `pause`, `subscribe`,
/// `stats`).
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("queue has been shut down")]
    Closed,
}

/// Errors from [`JobQueue::shutdown`](crate::JobQueue::shutdown).
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("scheduler task panicked")]
    SchedulerPanicked,
}

/// Error produced by awaiting a [`JobTicket`](crate::JobTicket) whose queue
/// went away before the job produced a result.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("queue was dropped before the job produced a result")]
    QueueClosed,
}
