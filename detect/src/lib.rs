//! Project inspection helpers: entry-point detection and icon handling.
//!
//! - [`detect_main_file`]: the source file a project should be run from.
//! - [`detect_icon`]: the icon a project ships, converting a lone PNG.
//! - [`png_to_ico`]: PNG to single-size ICO conversion.

mod error;
mod icon;
mod main_file;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::{DetectError, Result};
pub use icon::{DEFAULT_ICON_SIZE, MAX_ICON_SIZE, detect_icon, png_to_ico};
pub use main_file::{SourceRules, detect_main_file};

/// Regular files directly inside `dir` with extension `ext`, sorted.
pub(crate) fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
