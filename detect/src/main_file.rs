//! Main source file detection.
//!
//! Picks the entry point of a project folder:
//!
//! 1. the only source file in the folder (ignored stems excluded);
//! 2. else the first existing entry file (`main`, `__main__`, then the
//!    folder's own name);
//! 3. else, when `src/` exists, the result for `src/` itself if it holds
//!    source files directly, or the single subdirectory of `src/` where
//!    detection succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DetectError, Result};

/// Which files count as source files and which names mark an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRules {
    /// Extension without the dot, e.g. `py`.
    pub extension: String,
    /// Entry file stems, in priority order. The folder's own name is tried
    /// after these.
    pub entry_stems: Vec<String>,
    /// Stems that never count as a program on their own.
    pub ignored_stems: Vec<String>,
}

impl SourceRules {
    pub fn python() -> Self {
        Self {
            extension: "py".into(),
            entry_stems: vec!["main".into(), "__main__".into()],
            ignored_stems: vec!["__init__".into()],
        }
    }

    pub fn rust() -> Self {
        Self {
            extension: "rs".into(),
            entry_stems: vec!["main".into()],
            ignored_stems: vec!["build".into(), "mod".into()],
        }
    }

    fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
            && path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| !self.ignored_stems.iter().any(|s| s == stem))
    }
}

impl Default for SourceRules {
    fn default() -> Self {
        Self::python()
    }
}

/// Finds the main source file of `folder`.
///
/// Returned paths are absolute.
///
/// # Errors
///
/// [`DetectError::Ambiguous`] when several files qualify without an entry
/// file, [`DetectError::NotFound`] when nothing qualifies.
///
/// # Examples
///
/// ```
/// use programmify_detect::{SourceRules, detect_main_file};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("tool.py"), "print('hi')").unwrap();
/// std::fs::write(dir.path().join("__init__.py"), "").unwrap();
///
/// let main = detect_main_file(dir.path(), &SourceRules::python()).unwrap();
/// assert!(main.ends_with("tool.py"));
/// ```
pub fn detect_main_file(folder: &Path, rules: &SourceRules) -> Result<PathBuf> {
    let folder = fs::canonicalize(folder).map_err(|_| DetectError::NotFound(folder.to_path_buf()))?;

    let sources = source_files(&folder, rules)?;
    if let [only] = sources.as_slice() {
        debug!(folder = %folder.display(), file = %only.display(), "Single source file");
        return Ok(only.clone());
    }

    let own_name = folder
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| rules.file_name(name));
    let entries = rules
        .entry_stems
        .iter()
        .map(|stem| rules.file_name(stem))
        .chain(own_name);
    for entry in entries {
        let path = folder.join(&entry);
        if path.is_file() {
            debug!(folder = %folder.display(), file = %entry, "Entry file");
            return Ok(path);
        }
    }

    let src = folder.join("src");
    if src.is_dir() {
        if !source_files(&src, rules)?.is_empty() {
            return detect_main_file(&src, rules);
        }

        let mut found = Vec::new();
        for package in subdirectories(&src)? {
            match detect_main_file(&package, rules) {
                Ok(path) => found.push(path),
                Err(err) => debug!(package = %package.display(), error = %err, "No main file in package"),
            }
        }
        match found.len() {
            0 => {}
            1 => return Ok(found.remove(0)),
            _ => {
                return Err(DetectError::Ambiguous {
                    folder: src,
                    candidates: found,
                });
            }
        }
    }

    if sources.len() > 1 {
        return Err(DetectError::Ambiguous {
            folder,
            candidates: sources,
        });
    }
    Err(DetectError::NotFound(folder))
}

/// Source files directly inside `dir`, sorted by name.
fn source_files(dir: &Path, rules: &SourceRules) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = crate::files_with_extension(dir, &rules.extension)?
        .into_iter()
        .filter(|path| rules.is_source(path))
        .collect();
    files.sort();
    Ok(files)
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
