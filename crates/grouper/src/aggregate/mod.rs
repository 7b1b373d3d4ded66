//! Aggregate — window registry, per-window key counters, frozen snapshots.

pub mod registry;
pub mod snapshot;
pub mod window;

pub use registry::Aggregator;
pub use snapshot::{AggregateSnapshot, GroupCount, WindowSnapshot};
pub use window::TimeWindow;
