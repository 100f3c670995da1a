//! Error types for schema synthesis and invocation.

use programmify_core::ValidationError;
use thiserror::Error;

/// Error raised by a wrapped callable.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the synthesizer and the command-line adapter.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The declared signature cannot be mapped onto a command line.
    #[error("invalid signature for `{command}`: {}", join_errors(.errors))]
    InvalidSignature {
        command: String,
        errors: Vec<ValidationError>,
    },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The wrapped callable failed; its message is passed through unchanged.
    #[error("{0}")]
    Invocation(BoxError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`SynthError`].
pub type Result<T> = std::result::Result<T, SynthError>;
