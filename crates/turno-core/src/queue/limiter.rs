use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Length of the trailing window that completed jobs count against.
pub const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Admission discipline for the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    /// At most one job in flight at a time.
    Serial,
    /// At most `n` jobs started within any rolling one-second window.
    PerSecond(u32),
}

/// Admission control and throughput accounting for the scheduler.
///
/// A job may start when the in-flight count plus the number of completions
/// inside the trailing window leaves room under the limit. This bounds
/// steady-state throughput at the limit per rolling second while allowing a
/// cold queue to burst up to the limit concurrently. Serial mode ignores
/// the window and admits only when nothing is in flight.
///
/// Owned by the single scheduler task, so no synchronization. Time is
/// passed in so tests control the clock.
pub struct RateLimiter {
    limit: RateLimit,
    running: u32,
    /// Completion timestamps inside the trailing window, oldest first.
    /// Pruned lazily on access.
    recent: VecDeque<Instant>,
    /// Jobs started since the stats clock was last armed.
    processed: u64,
    /// When the stats clock was armed; `None` while disarmed.
    armed_at: Option<Instant>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        if let RateLimit::PerSecond(n) = limit {
            assert!(n > 0, "per-second rate limit must be positive");
        }
        Self {
            limit,
            running: 0,
            recent: VecDeque::new(),
            processed: 0,
            armed_at: None,
        }
    }

    /// Whether a new job may start now.
    pub fn may_admit(&mut self, now: Instant) -> bool {
        self.evict(now);
        match self.limit {
            RateLimit::Serial => self.running == 0,
            RateLimit::PerSecond(n) => self.running + (self.recent.len() as u32) < n,
        }
    }

    /// Record a dispatched job. The caller must have seen `may_admit`
    /// return true for the same instant.
    pub fn job_started(&mut self) {
        self.running += 1;
        self.processed += 1;
        let cap = match self.limit {
            RateLimit::Serial => 1,
            RateLimit::PerSecond(n) => n,
        };
        assert!(
            self.running <= cap,
            "in-flight count {} exceeded the admission cap {cap}",
            self.running
        );
    }

    /// Record a completed job (success or failure alike) at `now`.
    pub fn job_ended(&mut self, now: Instant) {
        assert!(self.running > 0, "job ended with nothing in flight");
        self.running -= 1;
        self.evict(now);
        self.recent.push_back(now);
    }

    /// Number of dispatched jobs whose completion has not been reported.
    pub fn running(&self) -> u32 {
        self.running
    }

    pub fn is_idle(&self) -> bool {
        self.running == 0
    }

    /// Earliest instant at which a currently-blocked admission could
    /// succeed, or `None` when only a completion can unblock it (serial
    /// mode, or the window is already empty).
    pub fn next_admission(&mut self, now: Instant) -> Option<Instant> {
        match self.limit {
            RateLimit::Serial => None,
            RateLimit::PerSecond(_) => {
                self.evict(now);
                self.recent.front().map(|&t| t + RATE_WINDOW)
            }
        }
    }

    /// Drop completion timestamps that have aged out of the window. An
    /// entry is evicted once a full window has elapsed, so a wake-up
    /// scheduled at exactly `t + RATE_WINDOW` observes the freed slot.
    fn evict(&mut self, now: Instant) {
        while let Some(&t) = self.recent.front() {
            if now.duration_since(t) >= RATE_WINDOW {
                self.recent.pop_front();
            } else {
                break;
            }
        }
    }

    /// Arm the stats clock. No-op when already armed.
    pub fn arm_stats(&mut self, now: Instant) {
        if self.armed_at.is_none() {
            self.armed_at = Some(now);
            self.processed = 0;
        }
    }

    /// Disarm the stats clock. No-op when already disarmed.
    pub fn disarm_stats(&mut self) {
        self.armed_at = None;
    }

    pub fn stats_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Cumulative throughput since the stats clock was armed: jobs started
    /// divided by elapsed seconds. Early reports after a burst can exceed
    /// the configured limit. Returns 0.0 while disarmed.
    pub fn jobs_per_second(&self, now: Instant) -> f64 {
        let Some(armed_at) = self.armed_at else {
            return 0.0;
        };
        let elapsed = now.duration_since(armed_at).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.processed as f64 / elapsed
    }
}
