//! Snapshot — owned, read-only copy of the aggregation state.

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowSnapshot {
    pub start: DateTime<Local>,
    pub total: u64,
    /// Ranked by descending count, ties in first-discovery order.
    pub groups: Vec<GroupCount>,
}

impl WindowSnapshot {
    /// The `limit` highest-ranked keys.
    pub fn top(&self, limit: usize) -> &[GroupCount] {
        &self.groups[..limit.min(self.groups.len())]
    }

    pub fn count_of(&self, key: &str) -> Option<u64> {
        self.groups.iter().find(|g| g.key == key).map(|g| g.count)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateSnapshot {
    /// Sorted by start instant.
    pub windows: Vec<WindowSnapshot>,
}

impl AggregateSnapshot {
    pub fn window(&self, start: DateTime<Local>) -> Option<&WindowSnapshot> {
        self.windows.iter().find(|w| w.start == start)
    }

    /// Σ window totals, i.e. the number of matched events.
    pub fn total_events(&self) -> u64 {
        self.windows.iter().map(|w| w.total).sum()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot_with(groups: &[(&str, u64)]) -> WindowSnapshot {
        WindowSnapshot {
            start: Utc::now().with_timezone(&Local),
            total: groups.iter().map(|(_, c)| c).sum(),
            groups: groups
                .iter()
                .map(|(k, c)| GroupCount { key: k.to_string(), count: *c })
                .collect(),
        }
    }

    #[test]
    fn test_top_clamps_to_available() {
        let w = snapshot_with(&[("a", 3), ("b", 2), ("c", 1)]);
        assert_eq!(w.top(2).len(), 2);
        assert_eq!(w.top(10).len(), 3);
        assert!(w.top(0).is_empty());
    }

    #[test]
    fn test_count_of() {
        let w = snapshot_with(&[("a", 3), ("b", 2)]);
        assert_eq!(w.count_of("b"), Some(2));
        assert_eq!(w.count_of("z"), None);
    }

    #[test]
    fn test_total_events() {
        let snap = AggregateSnapshot {
            windows: vec![snapshot_with(&[("a", 3)]), snapshot_with(&[("b", 2), ("c", 4)])],
        };
        assert_eq!(snap.total_events(), 9);
        assert_eq!(snap.len(), 2);
    }
}
