//! Error types for lsifnav-core.

use thiserror::Error;

/// Failure to normalize a graph identifier.
#[derive(Error, Debug)]
pub enum IdError {
    #[error("identifier is negative: {0}")]
    Negative(i64),

    #[error("identifier is not a decimal number: {0:?}")]
    NotNumeric(String),

    #[error("identifier has the wrong type: {0}")]
    WrongType(&'static str),
}

/// Failure to decode one graph entry.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed {label} entry: {source}")]
    Json {
        label: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    pub(crate) fn json(label: &str, source: serde_json::Error) -> Self {
        Self::Json {
            label: label.to_string(),
            source,
        }
    }
}

/// Failure to load a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
