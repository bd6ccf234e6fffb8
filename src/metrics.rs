//! Contact form counters, reported by the health endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Contact submission counters for one server instance.
#[derive(Debug, Default)]
pub struct ContactMetrics {
    /// Submissions that reached the handler with a parseable body
    received: AtomicUsize,

    /// Submissions rejected by validation
    rejected: AtomicUsize,

    /// Messages handed to the mailer successfully
    delivered: AtomicUsize,

    /// Messages the mailer failed to deliver
    delivery_failures: AtomicUsize,
}

impl ContactMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery_failure(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the current counters.
    pub fn report(&self) -> MetricsReport {
        let delivered = self.delivered.load(Ordering::Relaxed);
        let failures = self.delivery_failures.load(Ordering::Relaxed);
        let attempts = delivered + failures;

        let delivery_success_rate = if attempts > 0 {
            (delivered as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            received: self.received.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            delivered,
            delivery_failures: failures,
            delivery_success_rate,
        }
    }
}

/// Point-in-time view of `ContactMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub received: usize,
    pub rejected: usize,
    pub delivered: usize,
    pub delivery_failures: usize,

    /// Delivered / (delivered + failed) as a percentage (0-100)
    pub delivery_success_rate: f64,
}
