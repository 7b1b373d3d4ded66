use grep_matcher::{Captures, Matcher};
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

use crate::conf::profile::APACHE_ACCESS_PATTERN;
use crate::error::ConfigError;

/// Name of the capture group holding the event timestamp.
pub const TIMESTAMP_CAPTURE: &str = "timestamp";
/// Name of the capture group holding the classification key.
pub const GROUP_CAPTURE: &str = "group";

/// The two captures of a matching line, borrowed from the line itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub timestamp: &'a str,
    pub group: &'a str,
}

/// Compiled line pattern.
///
/// Validation happens once in [`PatternExtractor::new`]; matching afterwards
/// only reads the compiled matcher, so one extractor can be shared by every
/// worker behind an `Arc`.
#[derive(Debug)]
pub struct PatternExtractor {
    matcher: RegexMatcher,
    timestamp_index: usize,
    group_index: usize,
}

impl PatternExtractor {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let matcher = RegexMatcherBuilder::new()
            .multi_line(false)
            .build(pattern)
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;

        let timestamp_index = Self::require_capture(&matcher, TIMESTAMP_CAPTURE)?;
        let group_index = Self::require_capture(&matcher, GROUP_CAPTURE)?;

        Ok(Self {
            matcher,
            timestamp_index,
            group_index,
        })
    }

    fn require_capture(matcher: &RegexMatcher, name: &'static str) -> Result<usize, ConfigError> {
        matcher
            .capture_index(name)
            .ok_or(ConfigError::MissingCaptureGroup {
                name,
                example: APACHE_ACCESS_PATTERN,
            })
    }

    /// Apply the pattern to `line`.
    ///
    /// Returns `None` when the line does not match, or when either named
    /// group did not take part in the match.
    pub fn extract<'a>(&self, line: &'a str) -> Option<Extracted<'a>> {
        let mut caps = self.matcher.new_captures().ok()?;
        if !self.matcher.captures(line.as_bytes(), &mut caps).unwrap_or(false) {
            return None;
        }

        let timestamp = caps.get(self.timestamp_index)?;
        let group = caps.get(self.group_index)?;

        Some(Extracted {
            timestamp: line.get(timestamp.start()..timestamp.end())?,
            group: line.get(group.start()..group.end())?,
        })
    }
}
