//! CLI — command-line flags layered over the loaded configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::conf::{GrouperConfig, OutputFormat, TimestampPolicy};

#[derive(Parser, Debug, Default)]
#[command(
    name = "loggrouper",
    version,
    about = "Group log lines by time window and occurrence",
    after_help = "Use file name \"-\" or give no file name to read from stdin."
)]
pub struct Cli {
    /// Files to read
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Show unparsed lines after the report
    #[arg(short, long)]
    pub verbose: bool,

    /// Limit output per time window
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Interval to group by, e.g. 15m (units: ns, us, µs, ms, s, m, h)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Line regex; named groups "timestamp" and "group" have to exist
    #[arg(short = 'f', long = "format", value_name = "REGEX")]
    pub pattern: Option<String>,

    /// strftime layout of the "timestamp" group, e.g. %d/%b/%Y:%H:%M:%S %z
    #[arg(short = 't', long = "time-format", value_name = "LAYOUT")]
    pub time_layout: Option<String>,

    /// Named preset (see --list-profiles)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Number of classification workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Bound of the queue between readers and workers
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// What to do with lines whose timestamp does not parse
    #[arg(long, value_enum)]
    pub on_bad_timestamp: Option<TimestampPolicy>,

    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,

    /// TOML config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the built-in presets and exit
    #[arg(long)]
    pub list_profiles: bool,
}

impl Cli {
    /// Flags win over file and environment. An explicit `--format` or
    /// `--time-format` drops a profile chosen by a lower layer, so the
    /// custom pattern is not overwritten when profiles are applied.
    pub fn apply_to(&self, config: &mut GrouperConfig) {
        if self.pattern.is_some() || self.time_layout.is_some() {
            config.profile = None;
        }
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(layout) = &self.time_layout {
            config.time_layout = layout.clone();
        }
        if let Some(profile) = &self.profile {
            config.profile = Some(profile.clone());
        }
        if let Some(interval) = &self.interval {
            config.interval = interval.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(policy) = self.on_bad_timestamp {
            config.on_bad_timestamp = policy;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.verbose {
            config.verbose = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "loggrouper", "-v", "-l", "5", "-i", "1h", "-w", "4",
            "--on-bad-timestamp", "abort", "--output", "json", "a.log", "-",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.limit, Some(5));
        assert_eq!(cli.interval.as_deref(), Some("1h"));
        assert_eq!(cli.workers, Some(4));
        assert_eq!(cli.on_bad_timestamp, Some(TimestampPolicy::Abort));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.files, vec!["a.log", "-"]);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["loggrouper", "-l", "3", "--queue-capacity", "16"]).unwrap();
        let mut config = GrouperConfig { workers: 7, ..GrouperConfig::default() };
        cli.apply_to(&mut config);

        assert_eq!(config.limit, 3);
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.workers, 7); // Untouched
        assert!(!config.verbose);
    }

    #[test]
    fn test_custom_format_drops_file_profile() {
        let cli = Cli::try_parse_from(["loggrouper", "-f", r"(?P<timestamp>\S+) (?P<group>\S+)"]).unwrap();
        let mut config = GrouperConfig {
            profile: Some("apache-access-dir".to_string()),
            ..GrouperConfig::default()
        };
        cli.apply_to(&mut config);

        assert_eq!(config.profile, None);
        assert_eq!(config.pattern, r"(?P<timestamp>\S+) (?P<group>\S+)");
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["loggrouper", "--on-bad-timestamp", "ignore"]).is_err());
    }
}
