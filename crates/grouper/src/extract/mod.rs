//! Extract — pulls the `timestamp` and `group` captures out of a raw line.

pub mod pattern;

pub use pattern::{Extracted, PatternExtractor, GROUP_CAPTURE, TIMESTAMP_CAPTURE};
