//! Pipeline metrics for observability
//!
//! Counters for monitoring delivery health: enqueued and delivered volumes,
//! overflow drops, fallback activity, and swallowed send failures.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct PipelineMetrics {
    /// Envelopes accepted by the delivery queue
    enqueued: AtomicU64,

    /// Envelopes fully dispatched to the destination set
    delivered: AtomicU64,

    /// Envelopes evicted by the drop-oldest overflow policy
    dropped: AtomicU64,

    /// Envelopes additionally routed to the fallback destination
    fallback_deliveries: AtomicU64,

    /// Destination send calls that returned an error (swallowed)
    send_failures: AtomicU64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            fallback_deliveries: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
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
    pub fn fallback_deliveries(&self) -> u64 {
        self.fallback_deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn send_failures(&self) -> u64 {
        self.send_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
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
    pub fn record_fallback_delivery(&self) -> u64 {
        self.fallback_deliveries.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_send_failure(&self) -> u64 {
        self.send_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of accepted envelopes later evicted, as a percentage
    /// (0.0 - 100.0); 0.0 when nothing has been produced yet.
    pub fn drop_rate(&self) -> f64 {
        let total = self.enqueued() as f64;
        if total == 0.0 {
            0.0
        } else {
            (self.dropped() as f64 / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.fallback_deliveries.store(0, Ordering::Relaxed);
        self.send_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PipelineMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            delivered: AtomicU64::new(self.delivered()),
            dropped: AtomicU64::new(self.dropped()),
            fallback_deliveries: AtomicU64::new(self.fallback_deliveries()),
            send_failures: AtomicU64::new(self.send_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.dropped(), 0);
        assert_eq!(metrics.fallback_deliveries(), 0);
        assert_eq!(metrics.send_failures(), 0);
    }

    #[test]
    fn test_record_and_read() {
        let metrics = PipelineMetrics::new();
        metrics.record_enqueued();
        metrics.record_enqueued();
        metrics.record_delivered();
        metrics.record_dropped();
        metrics.record_fallback_delivery();

        assert_eq!(metrics.enqueued(), 2);
        assert_eq!(metrics.delivered(), 1);
        assert_eq!(metrics.dropped(), 1);
        assert_eq!(metrics.fallback_deliveries(), 1);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        // Every dropped envelope was first accepted
        for _ in 0..100 {
            metrics.record_enqueued();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "drop rate was {}", rate);
    }

    #[test]
    fn test_reset() {
        let metrics = PipelineMetrics::new();
        metrics.record_enqueued();
        metrics.record_dropped();

        metrics.reset();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.dropped(), 0);
    }

    #[test]
    fn test_clone_snapshot_independent() {
        let metrics = PipelineMetrics::new();
        metrics.record_dropped();

        let snapshot = metrics.clone();
        metrics.record_dropped();

        assert_eq!(metrics.dropped(), 2);
        assert_eq!(snapshot.dropped(), 1);
    }
}
