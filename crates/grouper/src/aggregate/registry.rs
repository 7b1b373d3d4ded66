use std::sync::Arc;

use chrono::{DateTime, Local};
use dashmap::DashMap;

use super::snapshot::AggregateSnapshot;
use super::window::TimeWindow;

/// Two-level concurrent counter: window start -> key -> count.
///
/// Window creation goes through the map's entry API, so the lookup and the
/// insert happen under one shard lock and exactly one `TimeWindow` is ever
/// registered per start instant. The shard lock is released before the
/// per-window lock is taken.
#[derive(Debug, Default)]
pub struct Aggregator {
    windows: DashMap<DateTime<Local>, Arc<TimeWindow>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Count one event for `key` in the window starting at `start`.
    pub fn record_event(&self, start: DateTime<Local>, key: &str) {
        self.window(start).record(key);
    }

    /// Get the window starting at `start`, creating it if absent.
    pub fn window(&self, start: DateTime<Local>) -> Arc<TimeWindow> {
        let entry = self
            .windows
            .entry(start)
            .or_insert_with(|| Arc::new(TimeWindow::new(start)));
        Arc::clone(entry.value())
    }

    pub fn get(&self, start: &DateTime<Local>) -> Option<Arc<TimeWindow>> {
        self.windows.get(start).map(|w| Arc::clone(w.value()))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Copy every window out, sorted by start instant.
    ///
    /// Only consistent once all writers have stopped; taken concurrently it
    /// is a per-window point-in-time view.
    pub fn snapshot(&self) -> AggregateSnapshot {
        let windows: Vec<Arc<TimeWindow>> = self
            .windows
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut windows: Vec<_> = windows.iter().map(|w| w.snapshot()).collect();
        windows.sort_by_key(|w| w.start);

        AggregateSnapshot { windows }
    }
}
