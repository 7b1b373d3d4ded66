//! Pipeline — readers -> bounded intake queue -> worker pool -> aggregator.
//!
//! Control flow of a run:
//! 1. spawn the fixed worker pool, all waiting on the shared queue;
//! 2. spawn one reader per source, each holding a clone of the sender;
//! 3. drop the original sender, so the queue closes exactly when the last
//!    reader finishes;
//! 4. join the readers, then the workers (which drain whatever is left);
//! 5. only then read the aggregator.
//!
//! The first fatal error cancels a child of the caller's token so every task
//! stops at its next suspension point.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::classify::{Classification, Classifier};
use super::reader::read_source;
use super::source::Source;
use super::worker::Worker;
use crate::aggregate::Aggregator;
use crate::collect::UnmatchedCollector;
use crate::conf::{format_interval, GrouperConfig, ProfileRegistry, TimestampPolicy};
use crate::error::{ConfigError, GrouperError, GrouperResult};
use crate::metrics::RunMetrics;
use crate::report::GroupingReport;

#[derive(Debug)]
pub struct LogGrouper {
    classifier: Arc<Classifier>,
    interval: Duration,
    workers: usize,
    queue_capacity: usize,
    policy: TimestampPolicy,
}

impl LogGrouper {
    /// Validate `config` and compile the pattern. Nothing is opened yet.
    pub fn new(config: &GrouperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let interval = config.interval_duration()?;
        let classifier = Classifier::new(&config.pattern, &config.time_layout, interval)?;

        Ok(Self {
            classifier: Arc::new(classifier),
            interval,
            workers: config.workers,
            queue_capacity: config.queue_capacity,
            policy: config.on_bad_timestamp,
        })
    }

    /// Like [`LogGrouper::new`], resolving `config.profile` first.
    pub fn with_profiles(config: &GrouperConfig, registry: &ProfileRegistry) -> Result<Self, ConfigError> {
        let mut resolved = config.clone();
        resolved.apply_profile(registry)?;
        Self::new(&resolved)
    }

    /// Classify a single line exactly as a worker would.
    pub fn classify<'a>(&self, line: &'a str) -> Classification<'a> {
        self.classifier.classify(line)
    }

    /// Open `paths` (none, or `-`, means stdin) and run them.
    pub async fn analyze_paths(
        &self,
        paths: &[String],
        cancel: CancellationToken,
    ) -> GrouperResult<GroupingReport> {
        let sources = Source::open_all(paths).await?;
        self.analyze(sources, cancel).await
    }

    /// Run every source through the pool and return the finished report.
    pub async fn analyze(
        &self,
        sources: Vec<Source>,
        cancel: CancellationToken,
    ) -> GrouperResult<GroupingReport> {
        let run_token = cancel.child_token();
        let aggregator = Arc::new(Aggregator::new());
        let unmatched = Arc::new(UnmatchedCollector::new());
        let metrics = Arc::new(RunMetrics::new());

        info!(
            sources = sources.len(),
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            interval = %format_interval(self.interval),
            "Starting grouping run"
        );

        let (tx, rx) = mpsc::channel::<String>(self.queue_capacity);
        let intake = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for id in 0..self.workers {
            let worker = Worker {
                id,
                intake: Arc::clone(&intake),
                classifier: Arc::clone(&self.classifier),
                aggregator: Arc::clone(&aggregator),
                unmatched: Arc::clone(&unmatched),
                metrics: Arc::clone(&metrics),
                policy: self.policy,
                cancel: run_token.clone(),
            };
            let abort = run_token.clone();
            workers.spawn(async move {
                let result = worker.run().await;
                if result.is_err() {
                    abort.cancel();
                }
                result
            });
        }
        // Workers hold the only receivers from here on.
        drop(intake);

        let mut readers = JoinSet::new();
        for source in sources {
            readers.spawn(read_source(
                source,
                tx.clone(),
                run_token.clone(),
                Arc::clone(&metrics),
            ));
        }
        drop(tx);

        let mut failure: Option<GrouperError> = None;

        while let Some(joined) = readers.join_next().await {
            if let Err(e) = flatten(joined) {
                keep_first(&mut failure, e, &run_token);
            }
        }
        debug!("All readers finished, intake queue closed");

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = flatten(joined) {
                keep_first(&mut failure, e, &run_token);
            }
        }
        debug!("All workers drained");

        if cancel.is_cancelled() {
            info!("Grouping run cancelled");
            return Err(GrouperError::Cancelled);
        }
        if let Some(e) = failure {
            error!("Grouping run failed: {}", e);
            return Err(e);
        }

        let metrics = metrics.snapshot();
        let snapshot = aggregator.snapshot();
        let unmatched = match Arc::try_unwrap(unmatched) {
            Ok(collector) => collector.into_lines(),
            Err(shared) => shared.all(),
        };

        info!(
            windows = snapshot.len(),
            lines = metrics.lines_read,
            matched = metrics.lines_matched,
            unmatched = metrics.lines_unmatched,
            bad_timestamps = metrics.bad_timestamps,
            match_rate = format_args!("{:.1}%", metrics.match_rate()),
            "Grouping run finished"
        );

        Ok(GroupingReport {
            interval: self.interval,
            snapshot,
            unmatched,
            metrics,
        })
    }
}

fn flatten(joined: Result<GrouperResult<u64>, JoinError>) -> GrouperResult<u64> {
    joined.map_err(|e| GrouperError::Task(e.to_string()))?
}

/// Remember the first real failure; `Cancelled` from tasks torn down by
/// that failure must not replace it.
fn keep_first(failure: &mut Option<GrouperError>, err: GrouperError, run_token: &CancellationToken) {
    run_token.cancel();
    let replace = match failure {
        None => true,
        Some(GrouperError::Cancelled) => !matches!(err, GrouperError::Cancelled),
        Some(_) => false,
    };
    if replace {
        *failure = Some(err);
    }
}
