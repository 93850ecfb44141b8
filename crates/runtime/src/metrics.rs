//! Resolve metrics and statistics.
//!
//! Tracks how many plans the runner resolved, how many came back empty, and
//! how long requests stayed in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Resolve metrics tracked by [`GoapRunner`](crate::GoapRunner).
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct RunnerMetrics {
    /// Requests handed to a resolver
    submitted: AtomicU64,

    /// Completed requests that produced at least one action
    resolved: AtomicU64,

    /// Completed requests that produced an empty plan
    empty: AtomicU64,

    /// Requests rejected at submission or lost before completion
    failed: AtomicU64,

    /// Requests submitted but not yet collected
    in_flight: AtomicU64,

    /// Peak number of requests in flight at once
    peak_in_flight: AtomicU64,

    /// Sum of submit-to-collect latencies, in nanoseconds
    total_resolve_time_nanos: AtomicU64,
}

impl RunnerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request handed to a resolver.
    pub fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        let depth = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;

        let mut current_peak = self.peak_in_flight.load(Ordering::Relaxed);
        while depth > current_peak {
            match self.peak_in_flight.compare_exchange_weak(
                current_peak,
                depth,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current_peak = actual,
            }
        }
    }

    /// Records a collected plan of `steps` actions.
    pub fn record_completed(&self, steps: usize, latency: Duration) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        if steps == 0 {
            self.empty.fetch_add(1, Ordering::Relaxed);
        } else {
            self.resolved.fetch_add(1, Ordering::Relaxed);
        }
        self.total_resolve_time_nanos
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Records a request the resolver refused to start.
    pub fn record_rejected(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a submitted request whose result never arrived.
    pub fn record_lost(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn resolved(&self) -> u64 {
        self.resolved.load(Ordering::Relaxed)
    }

    pub fn empty(&self) -> u64 {
        self.empty.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn peak_in_flight(&self) -> u64 {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Average submit-to-collect latency over completed requests.
    pub fn avg_resolve_time(&self) -> Duration {
        let completed = self.resolved() + self.empty();
        if completed == 0 {
            Duration::ZERO
        } else {
            let total_nanos = self.total_resolve_time_nanos.load(Ordering::Relaxed);
            Duration::from_nanos(total_nanos / completed)
        }
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Note: individual fields are read atomically but the snapshot as a whole
    /// may be inconsistent while a tick is in progress.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submitted: self.submitted(),
            resolved: self.resolved(),
            empty: self.empty(),
            failed: self.failed(),
            in_flight: self.in_flight(),
            peak_in_flight: self.peak_in_flight(),
            avg_resolve_time: self.avg_resolve_time(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub submitted: u64,
    pub resolved: u64,
    pub empty: u64,
    pub failed: u64,
    pub in_flight: u64,
    pub peak_in_flight: u64,
    pub avg_resolve_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_peak_in_flight() {
        let metrics = RunnerMetrics::new();
        metrics.record_submitted();
        metrics.record_submitted();
        metrics.record_submitted();
        metrics.record_completed(2, Duration::from_millis(3));
        metrics.record_submitted();

        assert_eq!(metrics.in_flight(), 3);
        assert_eq!(metrics.peak_in_flight(), 3);
        assert_eq!(metrics.submitted(), 4);
    }

    #[test]
    fn separates_empty_plans_from_failures() {
        let metrics = RunnerMetrics::new();
        metrics.record_submitted();
        metrics.record_submitted();
        metrics.record_submitted();
        metrics.record_completed(0, Duration::from_millis(2));
        metrics.record_completed(3, Duration::from_millis(4));
        metrics.record_lost();
        metrics.record_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resolved, 1);
        assert_eq!(snapshot.empty, 1);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(snapshot.in_flight, 0);
        assert_eq!(snapshot.avg_resolve_time, Duration::from_millis(3));
    }
}
