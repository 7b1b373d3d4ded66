use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::ConfigError;
use crate::extract::PatternExtractor;
use crate::time::{NormalizeError, TimeNormalizer};

/// Result of running one line through extractor and normalizer.
#[derive(Debug)]
pub enum Classification<'a> {
    /// Window start and classification key.
    Matched {
        window: DateTime<Local>,
        group: &'a str,
    },
    NoMatch,
    /// The pattern matched but the timestamp did not fit the layout.
    BadTimestamp(NormalizeError),
}

/// Stateless line classifier shared by every worker.
#[derive(Debug)]
pub struct Classifier {
    extractor: PatternExtractor,
    normalizer: TimeNormalizer,
}

impl Classifier {
    pub fn new(pattern: &str, time_layout: &str, interval: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            extractor: PatternExtractor::new(pattern)?,
            normalizer: TimeNormalizer::new(time_layout, interval)?,
        })
    }

    pub fn classify<'a>(&self, line: &'a str) -> Classification<'a> {
        let Some(extracted) = self.extractor.extract(line) else {
            return Classification::NoMatch;
        };

        match self.normalizer.normalize(extracted.timestamp) {
            Ok(window) => Classification::Matched {
                window,
                group: extracted.group,
            },
            Err(e) => Classification::BadTimestamp(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::profile::{APACHE_ACCESS_PATTERN, APACHE_TIME_LAYOUT};
    use chrono::{TimeZone, Utc};

    fn classifier() -> Classifier {
        Classifier::new(APACHE_ACCESS_PATTERN, APACHE_TIME_LAYOUT, Duration::from_secs(900)).unwrap()
    }

    #[test]
    fn test_classify_matched() {
        let line = r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326"#;
        match classifier().classify(line) {
            Classification::Matched { window, group } => {
                assert_eq!(group, "GET /apache_pb.gif");
                assert_eq!(window, Utc.with_ymd_and_hms(2000, 10, 10, 20, 45, 0).unwrap());
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_no_match() {
        assert!(matches!(classifier().classify("just some text"), Classification::NoMatch));
    }

    #[test]
    fn test_classify_bad_timestamp() {
        let line = r#"127.0.0.1 - - [not a date] "GET /x HTTP/1.0" 200 1"#;
        assert!(matches!(classifier().classify(line), Classification::BadTimestamp(_)));
    }

    #[test]
    fn test_bad_config_rejected() {
        assert!(Classifier::new("(?P<group>x)", APACHE_TIME_LAYOUT, Duration::from_secs(60)).is_err());
        assert!(Classifier::new(APACHE_ACCESS_PATTERN, APACHE_TIME_LAYOUT, Duration::ZERO).is_err());
    }
}
