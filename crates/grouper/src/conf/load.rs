//! Load — config loading from file and environment variables.

use std::path::Path;

use super::model::{GrouperConfig, OutputFormat, TimestampPolicy};
use crate::error::ConfigError;

pub const CONFIG_FILE_ENV: &str = "LOGGROUPER_CONFIG_FILE";

impl GrouperConfig {
    /// Load configuration from file and environment variables.
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// An explicit `path` must exist; the path from `LOGGROUPER_CONFIG_FILE`
    /// is used only when present on disk.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => match std::env::var(CONFIG_FILE_ENV) {
                Ok(env_path) if Path::new(&env_path).exists() => {
                    tracing::info!("Loading configuration from: {}", env_path);
                    Self::from_file(Path::new(&env_path))?
                }
                _ => {
                    tracing::debug!("No config file, using defaults and environment variables");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override settings from `LOGGROUPER_*` variables. Values that do not
    /// parse are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // A custom pattern or layout from the environment outranks a profile
        // chosen in the file; an explicit LOGGROUPER_PROFILE still wins.
        match lookup("LOGGROUPER_PROFILE") {
            Some(profile) => self.profile = Some(profile),
            None => {
                if lookup("LOGGROUPER_PATTERN").is_some() || lookup("LOGGROUPER_TIME_LAYOUT").is_some() {
                    self.profile = None;
                }
            }
        }
        if let Some(pattern) = lookup("LOGGROUPER_PATTERN") {
            self.pattern = pattern;
        }
        if let Some(layout) = lookup("LOGGROUPER_TIME_LAYOUT") {
            self.time_layout = layout;
        }
        if let Some(interval) = lookup("LOGGROUPER_INTERVAL") {
            self.interval = interval;
        }
        if let Some(workers) = parse_env(&lookup, "LOGGROUPER_WORKERS") {
            self.workers = workers;
        }
        if let Some(capacity) = parse_env(&lookup, "LOGGROUPER_QUEUE_CAPACITY") {
            self.queue_capacity = capacity;
        }
        if let Some(limit) = parse_env(&lookup, "LOGGROUPER_LIMIT") {
            self.limit = limit;
        }
        if let Some(verbose) = parse_env(&lookup, "LOGGROUPER_VERBOSE") {
            self.verbose = verbose;
        }
        if let Some(policy) = lookup("LOGGROUPER_ON_BAD_TIMESTAMP") {
            match policy.to_lowercase().as_str() {
                "unmatched" => self.on_bad_timestamp = TimestampPolicy::Unmatched,
                "abort" => self.on_bad_timestamp = TimestampPolicy::Abort,
                other => tracing::warn!("Ignoring LOGGROUPER_ON_BAD_TIMESTAMP={}", other),
            }
        }
        if let Some(output) = lookup("LOGGROUPER_OUTPUT") {
            match output.to_lowercase().as_str() {
                "text" => self.output = OutputFormat::Text,
                "json" => self.output = OutputFormat::Json,
                other => tracing::warn!("Ignoring LOGGROUPER_OUTPUT={}", other),
            }
        }
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::ProfileRegistry;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_toml_partial() {
        let config = GrouperConfig::from_toml("interval = \"1h\"\nworkers = 4\n").unwrap();
        assert_eq!(config.interval, "1h");
        assert_eq!(config.workers, 4);
        assert_eq!(config.limit, 20); // Default
    }

    #[test]
    fn test_from_toml_malformed() {
        let result = GrouperConfig::from_toml("workers = \"many\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "profile = \"apache-access-dir\"").unwrap();
        writeln!(file, "limit = 5").unwrap();

        let config = GrouperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.profile.as_deref(), Some("apache-access-dir"));
        assert_eq!(config.limit, 5);
    }

    #[test]
    fn test_from_missing_file() {
        let result = GrouperConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::File { .. })));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = GrouperConfig::from_toml("workers = 4\ninterval = \"1h\"").unwrap();
        config.apply_env_overrides(env(&[
            ("LOGGROUPER_WORKERS", "16"),
            ("LOGGROUPER_ON_BAD_TIMESTAMP", "ABORT"),
            ("LOGGROUPER_VERBOSE", "true"),
        ]));

        assert_eq!(config.workers, 16);
        assert_eq!(config.interval, "1h"); // Unchanged
        assert_eq!(config.on_bad_timestamp, TimestampPolicy::Abort);
        assert!(config.verbose);
    }

    #[test]
    fn test_env_pattern_drops_file_profile() {
        let custom = r"^(?P<timestamp>\S+) (?P<group>\S+)";
        let mut config = GrouperConfig::from_toml("profile = \"apache-access-dir\"").unwrap();
        config.apply_env_overrides(env(&[("LOGGROUPER_PATTERN", custom)]));
        config.apply_profile(&ProfileRegistry::builtin()).unwrap();

        assert_eq!(config.profile, None);
        assert_eq!(config.pattern, custom);
    }

    #[test]
    fn test_env_layout_drops_file_profile() {
        let mut config = GrouperConfig::from_toml("profile = \"apache-access\"").unwrap();
        config.apply_env_overrides(env(&[("LOGGROUPER_TIME_LAYOUT", "%Y-%m-%dT%H:%M:%S%z")]));
        config.apply_profile(&ProfileRegistry::builtin()).unwrap();

        assert_eq!(config.time_layout, "%Y-%m-%dT%H:%M:%S%z");
    }

    #[test]
    fn test_env_profile_outranks_env_pattern() {
        let mut config = GrouperConfig::default();
        config.apply_env_overrides(env(&[
            ("LOGGROUPER_PROFILE", "apache-access-dir"),
            ("LOGGROUPER_PATTERN", r"^(?P<timestamp>\S+) (?P<group>\S+)"),
        ]));
        config.apply_profile(&ProfileRegistry::builtin()).unwrap();

        assert_eq!(config.pattern, crate::conf::profile::APACHE_ACCESS_DIR_PATTERN);
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = GrouperConfig::default();
        config.apply_env_overrides(env(&[
            ("LOGGROUPER_WORKERS", "lots"),
            ("LOGGROUPER_OUTPUT", "xml"),
        ]));

        assert_eq!(config.workers, 10);
        assert_eq!(config.output, OutputFormat::Text);
    }
}
