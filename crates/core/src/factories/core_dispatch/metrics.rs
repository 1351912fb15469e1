use courier_api::dispatch::DispatchStats;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters shared between the dispatcher and its workers.
#[derive(Debug, Default)]
pub(super) struct DispatchMetrics {
    active: AtomicUsize,
    max_active: AtomicUsize,
    dispatched: AtomicU64,
    completed: AtomicU64,
    delivered: AtomicU64,
    admission_dropped: AtomicU64,
    completion_overflow: AtomicU64,
    worker_start_failures: AtomicU64,
    worker_panics: AtomicU64,
}

impl DispatchMetrics {
    /// A permit was granted. Returns the number of active workers.
    pub fn record_acquire(&self) -> usize {
        let active = self.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.max_active.fetch_max(active, Ordering::AcqRel);
        active
    }

    /// A permit was returned. Returns the number of active workers.
    pub fn record_release(&self) -> usize {
        self.active.fetch_sub(1, Ordering::AcqRel) - 1
    }

    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completion(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivered(&self, count: usize) {
        self.delivered.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_admission_dropped(&self) {
        self.admission_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completion_overflow(&self) {
        self.completion_overflow.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_start_failure(&self) {
        self.worker_start_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_panic(&self) {
        self.worker_panics.fetch_add(1, Ordering::Relaxed);
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    pub fn snapshot(&self, queued: usize) -> DispatchStats {
        DispatchStats {
            queued,
            active: self.active(),
            max_active: self.max_active.load(Ordering::Acquire),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            admission_dropped: self.admission_dropped.load(Ordering::Relaxed),
            completion_overflow: self
                .completion_overflow
                .load(Ordering::Relaxed),
            worker_start_failures: self
                .worker_start_failures
                .load(Ordering::Relaxed),
            worker_panics: self.worker_panics.load(Ordering::Relaxed),
        }
    }
}
