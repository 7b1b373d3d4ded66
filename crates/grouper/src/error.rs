use thiserror::Error;

use crate::time::NormalizeError;

/// Problems detected while building the engine, before any source is opened.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(String),

    #[error("Pattern does not declare match group {name:?} (it has to look like: {example})")]
    MissingCaptureGroup { name: &'static str, example: &'static str },

    #[error("Invalid interval {input:?}: {reason}")]
    InvalidInterval { input: String, reason: String },

    #[error("Invalid setting: {0}")]
    InvalidValue(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Cannot read config file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors that end a grouping run.
#[derive(Debug, Error)]
pub enum GrouperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Error opening {source_name}: {source}")]
    SourceOpen {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {source_name}: {source}")]
    SourceRead {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error during timestamp parsing: {error}\nwith line\n{line}")]
    Timestamp { line: String, error: NormalizeError },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Task failed: {0}")]
    Task(String),
}

pub type GrouperResult<T> = Result<T, GrouperError>;
