//! Boot — logging init and layered configuration.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::cli::Cli;
use crate::conf::{GrouperConfig, ProfileRegistry};
use crate::error::ConfigError;

/// Initialise the tracing / logging subsystem. Logs go to stderr so the
/// report on stdout stays clean.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loggrouper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the effective configuration: defaults, then the TOML file, then
/// `LOGGROUPER_*` variables, then flags. The selected profile is resolved
/// last and the result validated.
pub fn load_config(cli: &Cli, registry: &ProfileRegistry) -> Result<GrouperConfig, ConfigError> {
    let mut config = GrouperConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.apply_profile(registry)?;
    config.validate()?;

    info!(
        profile = config.profile.as_deref().unwrap_or("custom"),
        interval = %config.interval,
        workers = config.workers,
        queue_capacity = config.queue_capacity,
        limit = config.limit,
        "Loaded configuration"
    );
    info!("Pattern: {}", config.pattern);
    info!("Time layout: {}", config.time_layout);

    Ok(config)
}

/// `--list-profiles` output.
pub fn describe_profiles(registry: &ProfileRegistry) -> String {
    let mut out = String::new();
    for profile in registry.iter() {
        let marker = if profile.name == ProfileRegistry::DEFAULT_PROFILE { " (default)" } else { "" };
        out.push_str(&format!("{}{}\n", profile.name, marker));
        out.push_str(&format!("    {}\n", profile.description));
        out.push_str(&format!("    pattern:     {}\n", profile.pattern));
        out.push_str(&format!("    time layout: {}\n", profile.time_layout));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_load_config_layers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 3\nlimit = 7\nprofile = \"apache-access-dir\"").unwrap();
        let path = file.path().display().to_string();

        let cli = Cli::try_parse_from(["loggrouper", "-c", &path, "-l", "2"]).unwrap();
        let config = load_config(&cli, &ProfileRegistry::builtin()).unwrap();

        assert_eq!(config.workers, 3);
        assert_eq!(config.limit, 2);
        assert_eq!(config.pattern, crate::conf::profile::APACHE_ACCESS_DIR_PATTERN);
    }

    #[test]
    fn test_load_config_rejects_unknown_profile() {
        let cli = Cli::try_parse_from(["loggrouper", "-p", "iis"]).unwrap();
        let result = load_config(&cli, &ProfileRegistry::builtin());
        assert!(matches!(result, Err(ConfigError::UnknownProfile(_))));
    }

    #[test]
    fn test_load_config_rejects_bad_interval() {
        let cli = Cli::try_parse_from(["loggrouper", "-i", "soon"]).unwrap();
        let result = load_config(&cli, &ProfileRegistry::builtin());
        assert!(matches!(result, Err(ConfigError::InvalidInterval { .. })));
    }

    #[test]
    fn test_describe_profiles() {
        let text = describe_profiles(&ProfileRegistry::builtin());
        assert!(text.contains("apache-access (default)"));
        assert!(text.contains("apache-access-dir\n"));
        assert!(text.contains("time layout: %d/%b/%Y:%H:%M:%S %z"));
    }
}
