//! In-process asynchronous job queue.
//!
//! Jobs are futures pushed with a priority in `1..=10` (1 is most urgent).
//! A scheduler task dispatches them in priority order, FIFO within a
//! priority, subject to a rate limit expressed in jobs per rolling second
//! (or serial mode: one job in flight at a time). Lifecycle events
//! (completion, failure, drain, and periodic throughput reports) fan out
//! to any number of subscribers.
//!
//! ```no_run
//! use turno_core::{JobQueue, QueueConfig, QueueEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Optional: route the queue's tracing output somewhere visible.
//! turno_core::telemetry::init_tracing("info").ok();
//!
//! let queue: JobQueue<u64> = JobQueue::new(QueueConfig::rate_limited(50))?;
//! let mut events = queue.subscribe()?;
//!
//! let ticket = queue.push(async { Ok(42) })?;
//! queue.start().await?;
//!
//! let completed = ticket.await?;
//! assert_eq!(completed.result, 42);
//!
//! while let Some(event) = events.recv().await {
//!     if let QueueEvent::Drain = event {
//!         break;
//!     }
//! }
//! queue.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod job;
pub mod queue;
pub mod telemetry;

pub use error::{ConfigError, ControlError, PushError, ShutdownError, TicketError};
pub use job::{Completed, JobBody, JobError, JobId, JobTicket, PushOptions};
pub use queue::{JobQueue, QueueConfig, QueueEvent, QueueSnapshot, RateLimit};
