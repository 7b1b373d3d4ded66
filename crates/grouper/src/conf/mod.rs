//! Conf module — configuration model, loading, interval parsing, and presets.

pub mod model;
pub mod load;
pub mod interval;
pub mod profile;

pub use model::{GrouperConfig, OutputFormat, TimestampPolicy};
pub use interval::{format_interval, parse_interval};
pub use profile::{Profile, ProfileRegistry};
