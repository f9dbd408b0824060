//! Error types for the gridmind crate

use thiserror::Error;

/// Main error type for the gridmind crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("search exhausted the frontier without reaching a goal ({expanded} states expanded)")]
    SearchExhausted { expanded: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid layout at line {line}: {message}")]
    InvalidLayout { line: usize, message: String },

    #[error("unknown {kind} '{name}'. Expected one of: {expected}")]
    UnknownName {
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error("no legal actions available from state {state}")]
    NoLegalActions { state: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid progress bar template: {message}")]
    ProgressBarTemplate { message: String },

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
