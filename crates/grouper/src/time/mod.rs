//! Time — timestamp parsing and window truncation.

pub mod normalize;

pub use normalize::{NormalizeError, TimeNormalizer};
