use std::collections::HashMap;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use super::snapshot::{GroupCount, WindowSnapshot};

/// One classification key inside a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCounter {
    pub key: String,
    pub count: u64,
}

/// Counters of a window, guarded together so the total can never drift
/// from the sum of the per-key counts.
#[derive(Debug, Default)]
struct WindowGroups {
    total: u64,
    /// key -> position in `counters`
    index: HashMap<String, usize>,
    /// In first-discovery order.
    counters: Vec<GroupCounter>,
}

/// A fixed-width time bucket.
///
/// Each window carries its own lock, so events landing in different windows
/// never contend with each other.
#[derive(Debug)]
pub struct TimeWindow {
    start: DateTime<Local>,
    groups: Mutex<WindowGroups>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            start,
            groups: Mutex::new(WindowGroups::default()),
        }
    }

    /// Count one event for `key`, creating its counter on first sight.
    /// Lookup, insert and both increments happen under one lock.
    pub fn record(&self, key: &str) {
        let mut groups = self.groups.lock();

        if let Some(&slot) = groups.index.get(key) {
            groups.counters[slot].count += 1;
        } else {
            let slot = groups.counters.len();
            groups.counters.push(GroupCounter {
                key: key.to_string(),
                count: 1,
            });
            groups.index.insert(key.to_string(), slot);
        }

        groups.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.groups.lock().total
    }

    pub fn group_count(&self, key: &str) -> Option<u64> {
        let groups = self.groups.lock();
        groups.index.get(key).map(|&slot| groups.counters[slot].count)
    }

    pub fn len(&self) -> usize {
        self.groups.lock().counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the counters out, ranked by descending count. Equal counts keep
    /// first-discovery order.
    pub fn snapshot(&self) -> WindowSnapshot {
        let (total, mut groups) = {
            let guard = self.groups.lock();
            let groups: Vec<GroupCount> = guard
                .counters
                .iter()
                .map(|c| GroupCount {
                    key: c.key.clone(),
                    count: c.count,
                })
                .collect();
            (guard.total, groups)
        };

        groups.sort_by(|a, b| b.count.cmp(&a.count));

        WindowSnapshot {
            start: self.start,
            total,
            groups,
        }
    }
}
