use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one grouping run.
///
/// All operations use `Ordering::Relaxed`; the values are only read for
/// reporting once every task has been joined, and the join itself provides
/// the happens-before edge.
#[derive(Debug, Default)]
pub struct RunMetrics {
    lines_read: AtomicU64,
    lines_matched: AtomicU64,
    lines_unmatched: AtomicU64,
    bad_timestamps: AtomicU64,
    sources_completed: AtomicU64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_matched(&self) {
        self.lines_matched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_unmatched(&self) {
        self.lines_unmatched.fetch_add(1, Ordering::Relaxed);
    }

    /// A bad timestamp routed to the unmatched bucket counts as unmatched too.
    pub fn record_bad_timestamp(&self) {
        self.bad_timestamps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_done(&self) {
        self.sources_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            lines_matched: self.lines_matched.load(Ordering::Relaxed),
            lines_unmatched: self.lines_unmatched.load(Ordering::Relaxed),
            bad_timestamps: self.bad_timestamps.load(Ordering::Relaxed),
            sources_completed: self.sources_completed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lines_read: u64,
    pub lines_matched: u64,
    pub lines_unmatched: u64,
    pub bad_timestamps: u64,
    pub sources_completed: u64,
}

impl MetricsSnapshot {
    /// Matched ratio in percent, 0 when nothing was read.
    pub fn match_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            (self.lines_matched as f64 / self.lines_read as f64) * 100.0
        }
    }
}
