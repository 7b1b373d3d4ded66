//! Model — configuration structs with defaults and validation.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::interval::parse_interval;
use super::profile::{ProfileRegistry, APACHE_ACCESS_PATTERN, APACHE_TIME_LAYOUT};
use crate::error::ConfigError;

/// What to do with a line whose pattern matched but whose timestamp text
/// does not fit the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Count the line as unmatched and keep going.
    #[default]
    Unmatched,
    /// Fail the whole run on the first such line.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrouperConfig {
    /// Named preset; overrides `pattern` and `time_layout` when set.
    pub profile: Option<String>,
    /// Line regex with `timestamp` and `group` named captures.
    pub pattern: String,
    /// chrono strftime layout for the `timestamp` capture.
    pub time_layout: String,
    /// Window width, e.g. `15m`.
    pub interval: String,
    pub workers: usize,
    /// Bound of the intake queue between readers and workers.
    pub queue_capacity: usize,
    /// Max keys shown per window.
    pub limit: usize,
    /// Dump unmatched lines after the report.
    pub verbose: bool,
    pub on_bad_timestamp: TimestampPolicy,
    pub output: OutputFormat,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            profile: None,
            pattern: APACHE_ACCESS_PATTERN.to_string(),
            time_layout: APACHE_TIME_LAYOUT.to_string(),
            interval: "15m".to_string(),
            workers: 10,
            queue_capacity: 10_000,
            limit: 20,
            verbose: false,
            on_bad_timestamp: TimestampPolicy::default(),
            output: OutputFormat::default(),
        }
    }
}

impl GrouperConfig {
    /// Replace `pattern` and `time_layout` with the selected profile, if any.
    pub fn apply_profile(&mut self, registry: &ProfileRegistry) -> Result<(), ConfigError> {
        if let Some(name) = &self.profile {
            let profile = registry.get(name)?;
            self.pattern = profile.pattern.clone();
            self.time_layout = profile.time_layout.clone();
        }
        Ok(())
    }

    pub fn interval_duration(&self) -> Result<Duration, ConfigError> {
        parse_interval(&self.interval)
    }

    /// Cheap sanity checks; the pattern itself is validated when the
    /// extractor is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue("workers must be > 0".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue("queue_capacity must be > 0".to_string()));
        }
        if self.pattern.is_empty() {
            return Err(ConfigError::InvalidValue("pattern must not be empty".to_string()));
        }
        if self.time_layout.is_empty() {
            return Err(ConfigError::InvalidValue("time_layout must not be empty".to_string()));
        }
        self.interval_duration()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::profile::APACHE_ACCESS_DIR_PATTERN;

    // ── Validation ──────────────────────────────────────────────

    #[test]
    fn test_defaults_are_valid() {
        let config = GrouperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workers, 10);
        assert_eq!(config.queue_capacity, 10_000);
        assert_eq!(config.limit, 20);
        assert_eq!(config.interval_duration().unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = GrouperConfig { workers: 0, ..GrouperConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_validate_zero_queue_capacity() {
        let config = GrouperConfig { queue_capacity: 0, ..GrouperConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("queue_capacity"));
    }

    #[test]
    fn test_validate_bad_interval() {
        let config = GrouperConfig { interval: "fortnight".to_string(), ..GrouperConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidInterval { .. })));
    }

    // ── Profiles ────────────────────────────────────────────────

    #[test]
    fn test_apply_profile_overrides_pattern() {
        let registry = ProfileRegistry::builtin();
        let mut config = GrouperConfig {
            profile: Some("apache-access-dir".to_string()),
            pattern: "custom".to_string(),
            ..GrouperConfig::default()
        };
        config.apply_profile(&registry).unwrap();
        assert_eq!(config.pattern, APACHE_ACCESS_DIR_PATTERN);
        assert_eq!(config.time_layout, APACHE_TIME_LAYOUT);
    }

    #[test]
    fn test_apply_profile_none_keeps_pattern() {
        let registry = ProfileRegistry::builtin();
        let mut config = GrouperConfig { pattern: "custom".to_string(), ..GrouperConfig::default() };
        config.apply_profile(&registry).unwrap();
        assert_eq!(config.pattern, "custom");
    }

    #[test]
    fn test_apply_unknown_profile() {
        let registry = ProfileRegistry::builtin();
        let mut config = GrouperConfig { profile: Some("iis".to_string()), ..GrouperConfig::default() };
        assert!(matches!(config.apply_profile(&registry), Err(ConfigError::UnknownProfile(_))));
    }

    #[test]
    fn test_policy_serde_names() {
        let config: GrouperConfig = toml::from_str(
            "on_bad_timestamp = \"abort\"\noutput = \"json\"\n",
        )
        .unwrap();
        assert_eq!(config.on_bad_timestamp, TimestampPolicy::Abort);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.workers, 10);
    }
}
