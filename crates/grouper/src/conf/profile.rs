//! Profile — named presets bundling a line pattern with a timestamp layout.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ConfigError;

/// Apache/Nginx access logs (common and combined). Groups by method and full
/// path without the query string, e.g. `GET /apache_pb.gif`.
pub const APACHE_ACCESS_PATTERN: &str =
    r#"^.*\[(?P<timestamp>[^\]]+)\] "(?P<group>\S+ [^ ?"]+)[^"]*".*$"#;

/// Apache/Nginx access logs grouped by method and first path segment,
/// e.g. `GET /test123/`.
pub const APACHE_ACCESS_DIR_PATTERN: &str =
    r#"^.*\[(?P<timestamp>.+)\].*"(?P<group>.+ [/\*].*?[/?\ ]).*".*$"#;

/// `10/Oct/2000:13:55:36 -0700`
pub const APACHE_TIME_LAYOUT: &str = "%d/%b/%Y:%H:%M:%S %z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub pattern: String,
    pub time_layout: String,
}

impl Profile {
    fn builtin(name: &str, description: &str, pattern: &str, time_layout: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            pattern: pattern.to_string(),
            time_layout: time_layout.to_string(),
        }
    }
}

/// Immutable catalog of presets, built once at startup and handed around by
/// reference.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileRegistry {
    pub const DEFAULT_PROFILE: &'static str = "apache-access";

    pub fn builtin() -> Self {
        Self::from_profiles([
            Profile::builtin(
                "apache-access",
                "Apache/Nginx access log, grouped by method and path",
                APACHE_ACCESS_PATTERN,
                APACHE_TIME_LAYOUT,
            ),
            Profile::builtin(
                "apache-access-dir",
                "Apache/Nginx access log, grouped by method and first path segment",
                APACHE_ACCESS_DIR_PATTERN,
                APACHE_TIME_LAYOUT,
            ),
        ])
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PatternExtractor;

    #[test]
    fn test_builtin_patterns_compile() {
        let registry = ProfileRegistry::builtin();
        assert!(!registry.is_empty());

        for profile in registry.iter() {
            assert!(
                PatternExtractor::new(&profile.pattern).is_ok(),
                "profile {} pattern does not compile",
                profile.name
            );
        }
    }

    #[test]
    fn test_default_profile_exists() {
        let registry = ProfileRegistry::builtin();
        let profile = registry.get(ProfileRegistry::DEFAULT_PROFILE).unwrap();
        assert_eq!(profile.pattern, APACHE_ACCESS_PATTERN);
        assert_eq!(profile.time_layout, APACHE_TIME_LAYOUT);
    }

    #[test]
    fn test_unknown_profile() {
        let registry = ProfileRegistry::builtin();
        assert!(matches!(
            registry.get("nope"),
            Err(ConfigError::UnknownProfile(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_custom_registry() {
        let registry = ProfileRegistry::from_profiles([Profile::builtin(
            "syslog",
            "",
            r"^(?P<timestamp>\S+) \S+ (?P<group>\w+)",
            "%Y-%m-%dT%H:%M:%S%z",
        )]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("syslog").is_ok());
        assert!(registry.get(ProfileRegistry::DEFAULT_PROFILE).is_err());
    }
}
