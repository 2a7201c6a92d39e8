use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::queue::limiter::RateLimit;

/// Queue construction options, deserializable from TOML for embedding
/// applications.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum jobs started per rolling second. `None` runs the queue
    /// serially: at most one job in flight.
    pub rate_limit: Option<u32>,
    /// Milliseconds between throughput reports while the queue is active.
    pub stats_interval_ms: u64,
}

impl QueueConfig {
    /// Default throughput reporting cadence: 500 ms.
    pub const DEFAULT_STATS_INTERVAL_MS: u64 = 500;

    /// Serial mode with the default stats cadence.
    pub fn serial() -> Self {
        Self::default()
    }

    /// Rate-limited mode: at most `jobs_per_second` starts in any rolling
    /// second.
    pub fn rate_limited(jobs_per_second: u32) -> Self {
        Self {
            rate_limit: Some(jobs_per_second),
            ..Self::default()
        }
    }

    pub fn with_stats_interval(mut self, interval_ms: u64) -> Self {
        self.stats_interval_ms = interval_ms;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit == Some(0) {
            return Err(ConfigError::ZeroRateLimit);
        }
        if self.stats_interval_ms == 0 {
            return Err(ConfigError::ZeroStatsInterval);
        }
        Ok(())
    }

    pub(crate) fn admission(&self) -> RateLimit {
        match self.rate_limit {
            None => RateLimit::Serial,
            Some(n) => RateLimit::PerSecond(n),
        }
    }

    pub(crate) fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            rate_limit: None,
            stats_interval_ms: Self::DEFAULT_STATS_INTERVAL_MS,
        }
    }
}
