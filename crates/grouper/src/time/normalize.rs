//! Normalize — parse a captured timestamp and floor it onto its window.
//!
//! Truncation is done on the absolute instant, measured from the Unix epoch,
//! and only then shown in the process's local zone. Logs written in
//! different zones therefore collapse into shared windows. Two consequences
//! are kept as-is:
//! - a width that does not divide 24h produces boundaries that drift from
//!   day to day;
//! - boundaries are aligned to UTC, so with a local offset that is not a
//!   multiple of the width (e.g. `+05:30` with `1h`) windows start at
//!   `:30` local time.
//!
//! Layouts without a UTC offset are read as UTC.
//!
//! Truncation works in i64 nanoseconds, so instants outside roughly
//! 1677..=2262 fail with [`NormalizeError::Truncate`] and are handled like
//! any other bad timestamp.

use std::time::Duration;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, DurationRound, Local, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::conf::format_interval;
use crate::error::ConfigError;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("cannot parse {text:?} with layout {layout:?}: {source}")]
    Parse {
        text: String,
        layout: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("cannot truncate {instant} to {width}: {reason}")]
    Truncate {
        instant: DateTime<Utc>,
        width: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct TimeNormalizer {
    layout: String,
    width: TimeDelta,
    interval: Duration,
}

impl TimeNormalizer {
    pub fn new(layout: &str, interval: Duration) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidInterval {
            input: format_interval(interval),
            reason: reason.to_string(),
        };
        if interval.is_zero() {
            return Err(invalid("interval must be greater than zero"));
        }
        let width = TimeDelta::from_std(interval).map_err(|_| invalid("interval is too large"))?;

        Ok(Self {
            layout: layout.to_string(),
            width,
            interval,
        })
    }

    /// Parse `text` into an absolute instant.
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, NormalizeError> {
        let parsed = match DateTime::parse_from_str(text, &self.layout) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(e) if e.kind() == ParseErrorKind::NotEnough => {
                NaiveDateTime::parse_from_str(text, &self.layout).map(|naive| naive.and_utc())
            }
            Err(e) => Err(e),
        };

        parsed.map_err(|source| NormalizeError::Parse {
            text: text.to_string(),
            layout: self.layout.clone(),
            source,
        })
    }

    /// Floor an instant to the start of its window, in local time.
    pub fn truncate(&self, instant: DateTime<Utc>) -> Result<DateTime<Local>, NormalizeError> {
        instant
            .duration_trunc(self.width)
            .map(|start| start.with_timezone(&Local))
            .map_err(|e| NormalizeError::Truncate {
                instant,
                width: format_interval(self.interval),
                reason: e.to_string(),
            })
    }

    /// Parse and truncate in one step.
    pub fn normalize(&self, text: &str) -> Result<DateTime<Local>, NormalizeError> {
        self.truncate(self.parse(text)?)
    }
}
