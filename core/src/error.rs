//! Error types for phase configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors during phase sequence loading.
///
/// The engine's control surface itself never errors (invalid operations
/// degrade to no-ops); loading configuration is the one fallible step.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("failed to read phase file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse phase TOML")]
    ParseToml {
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid phase definition: {reason}")]
    InvalidDefinition { reason: String },
}
