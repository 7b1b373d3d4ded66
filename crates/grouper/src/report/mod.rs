//! Report — the finished result of a run and its text/JSON renderings.

pub mod render;

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::aggregate::AggregateSnapshot;
use crate::conf::format_interval;
use crate::metrics::MetricsSnapshot;

pub use render::{render_json, render_text, ReportOptions};

/// Everything a run produced, frozen after every task has been joined.
#[derive(Debug, Clone, Serialize)]
pub struct GroupingReport {
    #[serde(serialize_with = "serialize_interval")]
    pub interval: Duration,
    pub snapshot: AggregateSnapshot,
    /// In arrival order per source.
    pub unmatched: Vec<String>,
    pub metrics: MetricsSnapshot,
}

fn serialize_interval<S: Serializer>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_interval(*interval))
}
