//! Worker — one member of the classification pool.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::classify::{Classification, Classifier};
use crate::aggregate::Aggregator;
use crate::collect::UnmatchedCollector;
use crate::conf::TimestampPolicy;
use crate::error::{GrouperError, GrouperResult};
use crate::metrics::RunMetrics;

/// Receiving end of the intake queue, shared by the whole pool.
pub type SharedIntake = Arc<Mutex<mpsc::Receiver<String>>>;

pub struct Worker {
    pub id: usize,
    pub intake: SharedIntake,
    pub classifier: Arc<Classifier>,
    pub aggregator: Arc<Aggregator>,
    pub unmatched: Arc<UnmatchedCollector>,
    pub metrics: Arc<RunMetrics>,
    pub policy: TimestampPolicy,
    pub cancel: CancellationToken,
}

impl Worker {
    /// Consume lines until the queue is closed and drained.
    /// Returns the number of lines processed.
    pub async fn run(self) -> GrouperResult<u64> {
        let mut processed: u64 = 0;

        loop {
            let next = {
                let mut intake = tokio::select! {
                    _ = self.cancel.cancelled() => return Err(GrouperError::Cancelled),
                    guard = self.intake.lock() => guard,
                };
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(GrouperError::Cancelled),
                    line = intake.recv() => line,
                }
            };

            let Some(line) = next else {
                break;
            };

            self.process(line)?;
            processed += 1;
        }

        debug!(worker = self.id, processed, "worker drained");
        Ok(processed)
    }

    fn process(&self, line: String) -> GrouperResult<()> {
        let bad_timestamp = match self.classifier.classify(&line) {
            Classification::Matched { window, group } => {
                self.aggregator.record_event(window, group);
                self.metrics.record_matched();
                return Ok(());
            }
            Classification::NoMatch => None,
            Classification::BadTimestamp(error) => Some(error),
        };

        if let Some(error) = bad_timestamp {
            match self.policy {
                TimestampPolicy::Abort => {
                    return Err(GrouperError::Timestamp { line, error });
                }
                TimestampPolicy::Unmatched => {
                    warn!(worker = self.id, %error, "timestamp not parseable, counting line as unmatched");
                    self.metrics.record_bad_timestamp();
                }
            }
        }

        self.metrics.record_unmatched();
        self.unmatched.record(line);
        Ok(())
    }
}
