//! Error types for source and icon detection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by detection and icon conversion.
#[derive(Debug, Error)]
pub enum DetectError {
    /// No entry point could be picked in the folder.
    #[error("could not detect a main file in {}", .0.display())]
    NotFound(PathBuf),

    /// Several files qualify and none is an obvious entry point.
    #[error("several candidate main files in {}: {}", .folder.display(), join_paths(.candidates))]
    Ambiguous {
        folder: PathBuf,
        candidates: Vec<PathBuf>,
    },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Icon edge length outside what the ICO format stores.
    #[error("icon size must be between 1 and 256, got {0}")]
    InvalidIconSize(u32),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for results with [`DetectError`].
pub type Result<T> = std::result::Result<T, DetectError>;
