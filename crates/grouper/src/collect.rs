//! Collect — append-only record of lines the pattern did not classify.

use parking_lot::Mutex;

/// Lines are kept in arrival order per producer; there is no ordering
/// between producers.
#[derive(Debug, Default)]
pub struct UnmatchedCollector {
    lines: Mutex<Vec<String>>,
}

impl UnmatchedCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, line: String) {
        self.lines.lock().push(line);
    }

    /// Point-in-time count while a run is in flight, exact afterwards.
    pub fn count(&self) -> usize {
        self.lines.lock().len()
    }

    /// Copy of every line recorded so far.
    pub fn all(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_and_read_back() {
        let collector = UnmatchedCollector::new();
        collector.record("first".to_string());
        collector.record("second".to_string());

        assert_eq!(collector.count(), 2);
        assert_eq!(collector.all(), vec!["first", "second"]);
        assert_eq!(collector.into_lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_concurrent_producers_keep_their_order() {
        let collector = Arc::new(UnmatchedCollector::new());

        std::thread::scope(|scope| {
            for producer in 0..4 {
                let collector = Arc::clone(&collector);
                scope.spawn(move || {
                    for i in 0..500 {
                        collector.record(format!("{}:{}", producer, i));
                    }
                });
            }
        });

        let lines = collector.all();
        assert_eq!(lines.len(), 2_000);

        for producer in 0..4 {
            let prefix = format!("{}:", producer);
            let seq: Vec<usize> = lines
                .iter()
                .filter_map(|l| l.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..500).collect::<Vec<_>>());
        }
    }
}
