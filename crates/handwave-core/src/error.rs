//! Error types for handwave operations.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, HandwaveError>;

/// Errors surfaced by configuration loading and frame decoding.
///
/// The per-frame recognition path never returns these: malformed input there
/// degrades to "no hand this frame".
#[derive(Debug, thiserror::Error)]
pub enum HandwaveError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Expected {expected} landmarks, found {found}")]
    MalformedLandmarks { expected: usize, found: usize },

    #[error("Invalid frame record on line {line}: {source}")]
    Frame {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

impl HandwaveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
