//! Dispatcher metrics for observability
//!
//! Counters for monitoring dispatcher health: how many events were
//! submitted, delivered, dropped while paused, and how many appender calls
//! failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use taglog::DispatcherMetrics;
///
/// let metrics = DispatcherMetrics::new();
///
/// metrics.record_submitted();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.submitted(), 1);
/// assert_eq!(metrics.delivered(), 1);
/// ```
#[derive(Debug)]
pub struct DispatcherMetrics {
    /// Events accepted onto the queue
    submitted: AtomicU64,

    /// Events the worker finished offering to every appender
    delivered: AtomicU64,

    /// Events discarded because the dispatcher was paused
    dropped: AtomicU64,

    /// Appender calls that returned an error or panicked
    appender_failures: AtomicU64,

    /// Drain barriers completed
    barriers: AtomicU64,
}

impl DispatcherMetrics {
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
            barriers: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn barriers(&self) -> u64 {
        self.barriers.load(Ordering::Relaxed)
    }

    /// Record an accepted submission, returning the previous count
    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_barrier(&self) -> u64 {
        self.barriers.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of offered events that were dropped, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been offered.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped() as f64;
        let total = self.submitted() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
        self.barriers.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatcherMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatcherMetrics {
    /// Snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            submitted: AtomicU64::new(self.submitted()),
            delivered: AtomicU64::new(self.delivered()),
            dropped: AtomicU64::new(self.dropped()),
            appender_failures: AtomicU64::new(self.appender_failures()),
            barriers: AtomicU64::new(self.barriers()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = DispatcherMetrics::new();
        assert_eq!(metrics.submitted(), 0);
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.dropped(), 0);
        assert_eq!(metrics.appender_failures(), 0);
        assert_eq!(metrics.barriers(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = DispatcherMetrics::new();
        assert_eq!(metrics.record_dropped(), 0);
        assert_eq!(metrics.dropped(), 1);
        metrics.record_dropped();
        assert_eq!(metrics.dropped(), 2);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = DispatcherMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_submitted();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = DispatcherMetrics::new();
        metrics.record_submitted();
        metrics.record_appender_failure();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.submitted(), 0);
        assert_eq!(metrics.appender_failures(), 0);
        assert_eq!(snapshot.submitted(), 1);
        assert_eq!(snapshot.appender_failures(), 1);
    }
}
