// Domain-driven module structure for loggrouper.

// Core infrastructure
pub mod error;
pub mod metrics;

// Domain modules
pub mod conf;
pub mod extract;
pub mod time;
pub mod aggregate;
pub mod collect;
pub mod ingest;
pub mod report;
pub mod runtime;

pub use conf::{GrouperConfig, ProfileRegistry};
pub use error::{ConfigError, GrouperError, GrouperResult};
pub use ingest::{LogGrouper, Source};
pub use report::GroupingReport;
