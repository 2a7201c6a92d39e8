/// Point-in-time view of queue state, answered by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    /// Jobs accepted but not yet dispatched.
    pub pending: usize,
    /// Jobs dispatched whose completion has not been reported.
    pub running: u32,
    /// Whether dispatch is currently enabled.
    pub started: bool,
    /// Cumulative throughput since the stats clock was armed; 0.0 while
    /// the queue is quiescent.
    pub jobs_per_second: f64,
}
