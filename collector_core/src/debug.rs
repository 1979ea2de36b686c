pub use std::sync::atomic::{AtomicUsize, Ordering};

pub static DEBUG: DebugMetrics = DebugMetrics::new();

pub struct DebugMetrics {
    series_fetched: AtomicUsize,
    series_dropped: AtomicUsize,
    series_filtered: AtomicUsize,
    records_emitted: AtomicUsize,
    records_malformed: AtomicUsize,
    tags_malformed: AtomicUsize,
}

impl DebugMetrics {
    pub const fn new() -> Self {
        DebugMetrics {
            series_fetched: AtomicUsize::new(0),
            series_dropped: AtomicUsize::new(0),
            series_filtered: AtomicUsize::new(0),
            records_emitted: AtomicUsize::new(0),
            records_malformed: AtomicUsize::new(0),
            tags_malformed: AtomicUsize::new(0),
        }
    }

    pub fn series_fetched(&self, n: usize) {
        self.series_fetched.fetch_add(n, Ordering::Relaxed);
    }

    pub fn series_dropped(&self) {
        self.series_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn series_filtered(&self) {
        self.series_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn records_emitted(&self, n: usize) {
        self.records_emitted.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.records_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tag_malformed(&self) {
        self.tags_malformed.fetch_add(1, Ordering::Relaxed);
    }

    // Log the current metrics and reset the counters
    pub fn publish(&self) {
        let series_fetched = self.series_fetched.swap(0, Ordering::Relaxed);
        let series_dropped = self.series_dropped.swap(0, Ordering::Relaxed);
        let series_filtered = self.series_filtered.swap(0, Ordering::Relaxed);
        let records_emitted = self.records_emitted.swap(0, Ordering::Relaxed);
        let records_malformed = self.records_malformed.swap(0, Ordering::Relaxed);
        let tags_malformed = self.tags_malformed.swap(0, Ordering::Relaxed);
        tracing::debug!(
            "series {} (unnamed {}) | filtered {} | records {} (malformed {}, bad tags {})",
            series_fetched,
            series_dropped,
            series_filtered,
            records_emitted,
            records_malformed,
            tags_malformed
        );
    }
}
