//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    sweeps_completed: AtomicU64,
    endpoints_checked: AtomicU64,
    schema_changes: AtomicU64,
    check_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep_completed(&self) {
        self.sweeps_completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "sweeps_completed", "Metric incremented");
    }

    pub fn endpoint_checked(&self) {
        self.endpoints_checked.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "endpoints_checked", "Metric incremented");
    }

    pub fn schema_change_detected(&self) {
        self.schema_changes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "schema_changes", "Metric incremented");
    }

    pub fn check_failed(&self) {
        self.check_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "check_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sweeps_completed: self.sweeps_completed.load(Ordering::Relaxed),
            endpoints_checked: self.endpoints_checked.load(Ordering::Relaxed),
            schema_changes: self.schema_changes.load(Ordering::Relaxed),
            check_failures: self.check_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub sweeps_completed: u64,
    pub endpoints_checked: u64,
    pub schema_changes: u64,
    pub check_failures: u64,
}
