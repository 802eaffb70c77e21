//! Sweep activity counters.
//!
//! Thread-safe metrics for the deletion scheduler using atomic counters,
//! shared across clones of the owning reaper.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe counters for scheduler activity.
#[derive(Debug, Clone, Default)]
pub struct ReaperMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    sweeps: AtomicUsize,
    files_deleted: AtomicUsize,
    delete_failures: AtomicUsize,
}

impl ReaperMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sweep pass over the pending queue.
    pub(crate) fn record_sweep(&self) {
        self.inner.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully removed file.
    pub(crate) fn record_deleted(&self) {
        self.inner.files_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed deletion attempt (the record is requeued).
    pub(crate) fn record_failure(&self) {
        self.inner.delete_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of sweep passes completed.
    pub fn sweeps(&self) -> usize {
        self.inner.sweeps.load(Ordering::Relaxed)
    }

    /// Number of files removed by the scheduler.
    pub fn files_deleted(&self) -> usize {
        self.inner.files_deleted.load(Ordering::Relaxed)
    }

    /// Number of deletion attempts that failed and were requeued.
    pub fn delete_failures(&self) -> usize {
        self.inner.delete_failures.load(Ordering::Relaxed)
    }
}
