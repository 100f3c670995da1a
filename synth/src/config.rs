//! Adapter configuration.
//!
//! Controls how a callable is exposed on the command line: the program name,
//! default overrides, whether the built-in `--quiet`/`--<level>` switches are
//! injected, and the severity order used to pick a log level.
//!
//! # Example YAML
//!
//! ```yaml
//! command: build
//! defaults:
//!   mode: console
//!   cleanup: false
//! augment: true
//! log_levels: [critical, error, warning, info, debug]
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use programmify_core::Overrides;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::LogLevel;

/// Settings for a [`CommandLineAdapter`](crate::CommandLineAdapter).
///
/// # Examples
///
/// ```
/// use programmify_synth::AdapterConfig;
///
/// let config: AdapterConfig = serde_yaml::from_str("defaults: {size: 32}").unwrap();
/// assert!(config.augment);
/// assert_eq!(config.defaults["size"], 32);
/// assert_eq!(config.log_levels.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Program name for usage text; the signature name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Default overrides applied on top of declared defaults.
    #[serde(default)]
    pub defaults: Overrides,
    /// Inject `--quiet` and the log-level switches.
    #[serde(default = "default_augment")]
    pub augment: bool,
    /// Severity switches to inject, in selection priority order.
    #[serde(default = "default_log_levels")]
    pub log_levels: Vec<LogLevel>,
}

fn default_augment() -> bool {
    true
}

fn default_log_levels() -> Vec<LogLevel> {
    LogLevel::ALL.to_vec()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            command: None,
            defaults: Overrides::new(),
            augment: default_augment(),
            log_levels: default_log_levels(),
        }
    }
}

impl AdapterConfig {
    /// Loads configuration from a YAML (or JSON) file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SynthError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::SynthError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SynthError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::SynthError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Configuration without the injected switches.
    pub fn plain() -> Self {
        Self {
            augment: false,
            ..Self::default()
        }
    }
}
