//! Ingest — sources, stream readers, the classification worker pool, and the
//! pipeline that wires them to the aggregator.

pub mod classify;
pub mod pipeline;
pub mod reader;
pub mod source;
pub mod worker;

pub use classify::{Classification, Classifier};
pub use pipeline::LogGrouper;
pub use source::{Source, STDIN_SENTINEL};
